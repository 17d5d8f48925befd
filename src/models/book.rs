//! Book model and related types.
//!
//! `NewBook` is the insert shape produced by the seed loader, `Book` is what the
//! catalog API returns (author resolved to a name).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Fixed number of books per catalog page
pub const PAGE_SIZE: i64 = 10;

/// Full book as served by the catalog API
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub book_id: String,
    pub title: String,
    pub series: Option<String>,
    /// Author name ("Unknown" when the author row is gone)
    pub author: String,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub isbn: String,
    pub genres: Option<String>,
    pub characters: Option<String>,
    pub book_format: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub first_publish_date: Option<NaiveDate>,
    pub awards: Option<String>,
    pub num_ratings: Option<i32>,
    pub ratings_by_stars: Option<String>,
    pub liked_percent: Option<f64>,
    pub setting: Option<String>,
    pub cover_img: Option<String>,
    pub bbe_score: Option<f64>,
    pub bbe_votes: Option<i32>,
    pub price: Option<f64>,
}

/// Book ready to be inserted, with its author already resolved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewBook {
    pub book_id: String,
    pub title: String,
    pub series: Option<String>,
    pub author_id: Uuid,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub isbn: String,
    pub genres: Option<String>,
    pub characters: Option<String>,
    pub book_format: Option<String>,
    pub edition: Option<String>,
    pub pages: Option<i32>,
    pub publisher: Option<String>,
    pub publish_date: Option<NaiveDate>,
    pub first_publish_date: Option<NaiveDate>,
    pub awards: Option<String>,
    pub num_ratings: Option<i32>,
    pub ratings_by_stars: Option<String>,
    pub liked_percent: Option<f64>,
    pub setting: Option<String>,
    pub cover_img: Option<String>,
    pub bbe_score: Option<f64>,
    pub bbe_votes: Option<i32>,
    pub price: Option<f64>,
}

/// Catalog search parameters. `author` may be repeated.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive title substring
    pub q: Option<String>,
    /// Exact author names; a book matches if its author is any of them
    #[serde(default)]
    pub author: Vec<String>,
    /// 1-based page number; unparseable values fall back to 1
    pub page: Option<String>,
}

impl BookQuery {
    /// Requested page, defaulting to 1
    pub fn requested_page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
    }

    /// Title filter, ignoring blank input
    pub fn title_filter(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl Pagination {
    /// Compute page counts and clamp the requested page into `1..=total_pages`.
    /// With no results the current page is 1.
    pub fn new(requested_page: i64, total_items: i64, page_size: i64) -> Self {
        let total_pages = (total_items + page_size - 1) / page_size;
        let current_page = requested_page.min(total_pages).max(1);
        Self {
            current_page,
            total_pages,
            total_items,
        }
    }

    /// Row offset of the current page
    pub fn offset(&self, page_size: i64) -> i64 {
        (self.current_page - 1) * page_size
    }
}

/// One page of the catalog
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}
