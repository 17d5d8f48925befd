//! Storage seam used by the seed loader

use async_trait::async_trait;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{author::Author, book::NewBook},
};

/// Write operations the bulk loader needs from the catalog store.
///
/// Books reference authors, so `delete_all_books` must run before
/// `delete_all_authors`. `create_author` fails with `AppError::Conflict`
/// when the name is already taken.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn delete_all_books(&self) -> AppResult<u64>;

    async fn delete_all_authors(&self) -> AppResult<u64>;

    async fn create_author(&self, name: &str) -> AppResult<Author>;

    async fn create_book(&self, book: &NewBook) -> AppResult<Uuid>;
}

#[async_trait]
impl CatalogStore for Repository {
    async fn delete_all_books(&self) -> AppResult<u64> {
        self.books.delete_all().await
    }

    async fn delete_all_authors(&self) -> AppResult<u64> {
        self.authors.delete_all().await
    }

    async fn create_author(&self, name: &str) -> AppResult<Author> {
        self.authors.create(name).await
    }

    async fn create_book(&self, book: &NewBook) -> AppResult<Uuid> {
        self.books.create(book).await
    }
}
