//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod seed_report;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookPage, BookQuery, NewBook, Pagination};
pub use seed_report::{RowOutcome, SeedReport};
