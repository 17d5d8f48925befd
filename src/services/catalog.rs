//! Catalog read service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, BookPage, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with title/author filters, one page at a time
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<BookPage> {
        let page = self.repository.books.search(query).await?;
        tracing::debug!(
            "Catalog search returned {} of {} books (page {}/{})",
            page.books.len(),
            page.pagination.total_items,
            page.pagination.current_page,
            page.pagination.total_pages
        );
        Ok(page)
    }

    /// Get one book with its author name
    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Names of every author, for the author filter
    pub async fn author_names(&self) -> AppResult<Vec<String>> {
        self.repository.authors.list_names().await
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
