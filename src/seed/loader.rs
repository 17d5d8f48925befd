//! Bulk loader: reset the catalog and load a parsed book table into it.
//!
//! A run goes through four phases:
//!
//! 1. **Reset** - delete every book, then every author.
//! 2. **Author resolution** - create one author per distinct trimmed name
//!    found on rows that carry an ISBN. Each name is created exactly once, so
//!    concurrent creates can never race on the unique name constraint.
//! 3. **Book insertion** - one future per row, at most `concurrency` of them
//!    with an outstanding storage call at any time. A failing row is logged
//!    and never affects the others.
//! 4. **Report** - the returned [`SeedReport`] counts what was really inserted.
//!
//! All futures are polled on the caller's task; nothing is spawned.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use futures::stream::{self, StreamExt};
use uuid::Uuid;

use super::record::{author_name, build_book, isbn};
use super::table::{read_table, RowRecord};
use crate::{
    config::SeedConfig,
    error::AppResult,
    models::seed_report::{RowOutcome, SeedReport},
    repository::CatalogStore,
};

/// Default cap on in-flight row tasks
pub const DEFAULT_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    /// Maximum number of rows with an outstanding storage operation
    pub concurrency: usize,
    /// Load only the first `row_limit` rows when set
    pub row_limit: Option<usize>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            row_limit: None,
        }
    }
}

impl From<&SeedConfig> for SeedOptions {
    fn from(config: &SeedConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            row_limit: config.row_limit,
        }
    }
}

/// Per-run author cache: trimmed name to id, plus the names that could not
/// be created and why. Dropped when the run ends.
#[derive(Debug, Default)]
pub struct AuthorDirectory {
    resolved: HashMap<String, Uuid>,
    failed: HashMap<String, String>,
}

impl AuthorDirectory {
    pub fn get(&self, name: &str) -> Option<Uuid> {
        self.resolved.get(name).copied()
    }

    pub fn failure(&self, name: &str) -> Option<&str> {
        self.failed.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

pub struct Seeder<'a, S: CatalogStore + ?Sized> {
    store: &'a S,
    options: SeedOptions,
}

impl<'a, S: CatalogStore + ?Sized> Seeder<'a, S> {
    pub fn new(store: &'a S, options: SeedOptions) -> Self {
        if options.concurrency == 0 {
            tracing::warn!("Seed concurrency of 0 requested, using 1");
        }
        let options = SeedOptions {
            concurrency: options.concurrency.max(1),
            ..options
        };
        Self { store, options }
    }

    pub fn options(&self) -> &SeedOptions {
        &self.options
    }

    /// Read the CSV file at `path` and load it. The file is read before
    /// anything is deleted, so an unreadable file leaves the catalog intact.
    pub async fn seed_file(&self, path: &Path) -> AppResult<SeedReport> {
        let rows = read_table(path).await?;
        self.seed_rows(rows).await
    }

    /// Reset the catalog and load `rows` into it.
    ///
    /// Only a failure of the reset is returned as an error; row failures are
    /// logged and counted in the report.
    pub async fn seed_rows(&self, rows: Vec<RowRecord>) -> AppResult<SeedReport> {
        let mut report = SeedReport {
            rows_read: rows.len(),
            ..Default::default()
        };

        let rows: Vec<RowRecord> = match self.options.row_limit {
            Some(limit) => rows.into_iter().take(limit).collect(),
            None => rows,
        };
        report.rows_attempted = rows.len();

        self.reset().await?;

        let authors = self.resolve_authors(&rows).await;
        report.authors_created = authors.len();

        let outcomes: Vec<RowOutcome> = stream::iter(rows.iter().enumerate())
            .map(|(index, row)| self.insert_row(index, row, &authors))
            .buffer_unordered(self.options.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            report.record(outcome);
        }

        tracing::info!(
            "Seeded {} books ({} rows attempted, {} skipped without ISBN, {} failed, {} authors)",
            report.inserted,
            report.rows_attempted,
            report.skipped_missing_isbn,
            report.failed(),
            report.authors_created
        );

        Ok(report)
    }

    /// Delete books, then authors. Books reference authors, so the order is fixed.
    async fn reset(&self) -> AppResult<()> {
        let books = self.store.delete_all_books().await?;
        let authors = self.store.delete_all_authors().await?;
        tracing::info!("Cleared catalog: {} books, {} authors removed", books, authors);
        Ok(())
    }

    /// Create every distinct author needed by the rows that will be inserted.
    async fn resolve_authors(&self, rows: &[RowRecord]) -> AuthorDirectory {
        let mut seen = HashSet::new();
        let names: Vec<&str> = rows
            .iter()
            .filter(|row| isbn(row).is_some())
            .filter_map(author_name)
            .filter(|name| seen.insert(*name))
            .collect();

        tracing::debug!("Resolving {} distinct authors", names.len());

        let store = self.store;
        let results: Vec<(&str, AppResult<Uuid>)> = stream::iter(names)
            .map(move |name| async move {
                let created = store.create_author(name).await.map(|author| author.id);
                (name, created)
            })
            .buffer_unordered(self.options.concurrency)
            .collect()
            .await;

        let mut directory = AuthorDirectory::default();
        for (name, result) in results {
            match result {
                Ok(id) => {
                    directory.resolved.insert(name.to_string(), id);
                }
                Err(e) => {
                    tracing::error!("Failed to create author '{}': {}", name, e);
                    directory.failed.insert(name.to_string(), e.to_string());
                }
            }
        }
        directory
    }

    async fn insert_row(&self, index: usize, row: &RowRecord, authors: &AuthorDirectory) -> RowOutcome {
        if isbn(row).is_none() {
            tracing::warn!("Skipping book at index {} due to missing ISBN", index);
            return RowOutcome::SkippedMissingIsbn;
        }

        let Some(name) = author_name(row) else {
            tracing::error!("Failed to create author for book at index {}: missing author column", index);
            return RowOutcome::AuthorFailed;
        };

        let Some(author_id) = authors.get(name) else {
            let reason = authors.failure(name).unwrap_or("author was not resolved");
            tracing::error!("Failed to create author for book at index {}: {}", index, reason);
            return RowOutcome::AuthorFailed;
        };

        let book = build_book(row, author_id);
        match self.store.create_book(&book).await {
            Ok(_) => RowOutcome::Inserted,
            Err(e) => {
                tracing::error!("Failed to create book at index {}: {}", index, e);
                RowOutcome::BookFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::author::Author;
    use crate::repository::store::MockCatalogStore;
    use crate::seed::record::columns::{AUTHOR, ISBN, TITLE};
    use mockall::Sequence;
    use std::sync::{Arc, Mutex};

    fn row(title: &str, author: &str, isbn: &str) -> RowRecord {
        [(TITLE, title), (AUTHOR, author), (ISBN, isbn)].into_iter().collect()
    }

    fn expect_reset(store: &mut MockCatalogStore) {
        store.expect_delete_all_books().times(1).returning(|| Ok(0));
        store.expect_delete_all_authors().times(1).returning(|| Ok(0));
    }

    fn author_ok(name: &str) -> AppResult<Author> {
        Ok(Author {
            id: Uuid::new_v4(),
            name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn test_reset_deletes_books_before_authors() {
        let mut store = MockCatalogStore::new();
        let mut seq = Sequence::new();
        store
            .expect_delete_all_books()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(3));
        store
            .expect_delete_all_authors()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(2));

        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(Vec::new())
            .await
            .unwrap();
        assert_eq!(report, SeedReport::default());
    }

    #[tokio::test]
    async fn test_reset_failure_aborts_run() {
        let mut store = MockCatalogStore::new();
        store
            .expect_delete_all_books()
            .times(1)
            .returning(|| Err(AppError::Internal("connection refused".to_string())));
        store.expect_delete_all_authors().times(0);
        store.expect_create_author().times(0);
        store.expect_create_book().times(0);

        let result = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![row("Dune", "Frank Herbert", "9780441013593")])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_missing_isbn_skips_author_and_book() {
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store.expect_create_author().times(0);
        store.expect_create_book().times(0);

        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![row("Untitled", "Nobody", "")])
            .await
            .unwrap();
        assert_eq!(report.skipped_missing_isbn, 1);
        assert_eq!(report.inserted, 0);
        assert_eq!(report.authors_created, 0);
    }

    #[tokio::test]
    async fn test_author_created_once_per_name() {
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store
            .expect_create_author()
            .times(2)
            .returning(|name| author_ok(name));
        store
            .expect_create_book()
            .times(3)
            .returning(|_| Ok(Uuid::new_v4()));

        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![
                row("Emma", "Jane Austen", "1"),
                row("Persuasion", "  Jane Austen", "2"),
                row("Dune", "Frank Herbert", "3"),
            ])
            .await
            .unwrap();
        assert_eq!(report.inserted, 3);
        assert_eq!(report.authors_created, 2);
    }

    #[tokio::test]
    async fn test_author_failure_abandons_rows() {
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store
            .expect_create_author()
            .times(1)
            .returning(|_| Err(AppError::Conflict("Author 'Jane Austen' already exists".to_string())));
        store.expect_create_book().times(0);

        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![
                row("Emma", "Jane Austen", "1"),
                row("Persuasion", "Jane Austen", "2"),
            ])
            .await
            .unwrap();
        assert_eq!(report.author_failures, 2);
        assert_eq!(report.inserted, 0);
    }

    #[tokio::test]
    async fn test_blank_author_is_created_as_empty_name() {
        let created = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&created);
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store
            .expect_create_author()
            .times(2)
            .returning(move |name| {
                seen.lock().unwrap().push(name.to_string());
                author_ok(name)
            });
        store
            .expect_create_book()
            .times(3)
            .returning(|_| Ok(Uuid::new_v4()));

        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![
                row("Anonymous", "  ", "1"),
                row("Beowulf", "", "2"),
                row("Emma", "Jane Austen", "3"),
            ])
            .await
            .unwrap();
        assert_eq!(report.author_failures, 0);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.authors_created, 2);

        let mut names = created.lock().unwrap().clone();
        names.sort();
        assert_eq!(names, vec!["".to_string(), "Jane Austen".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_author_column_fails_row_only() {
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store
            .expect_create_author()
            .times(1)
            .returning(|name| author_ok(name));
        store
            .expect_create_book()
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let no_author: RowRecord = [(TITLE, "Anonymous"), (ISBN, "1")].into_iter().collect();
        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![no_author, row("Emma", "Jane Austen", "2")])
            .await
            .unwrap();
        assert_eq!(report.author_failures, 1);
        assert_eq!(report.inserted, 1);
    }

    #[tokio::test]
    async fn test_book_failure_does_not_stop_batch() {
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store
            .expect_create_author()
            .returning(|name| author_ok(name));
        store.expect_create_book().times(3).returning(|book| {
            if book.isbn == "bad" {
                Err(AppError::Internal("value too long".to_string()))
            } else {
                Ok(Uuid::new_v4())
            }
        });

        let report = Seeder::new(&store, SeedOptions::default())
            .seed_rows(vec![
                row("One", "A", "1"),
                row("Two", "A", "bad"),
                row("Three", "B", "3"),
            ])
            .await
            .unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.book_failures, 1);
        assert_eq!(report.rows_attempted, 3);
    }

    #[tokio::test]
    async fn test_row_limit() {
        let mut store = MockCatalogStore::new();
        expect_reset(&mut store);
        store
            .expect_create_author()
            .times(1)
            .returning(|name| author_ok(name));
        store
            .expect_create_book()
            .times(2)
            .returning(|_| Ok(Uuid::new_v4()));

        let options = SeedOptions {
            concurrency: 2,
            row_limit: Some(2),
        };
        let report = Seeder::new(&store, options)
            .seed_rows(vec![
                row("One", "A", "1"),
                row("Two", "A", "2"),
                row("Three", "B", "3"),
            ])
            .await
            .unwrap();
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_attempted, 2);
        assert_eq!(report.inserted, 2);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let store = MockCatalogStore::new();
        let seeder = Seeder::new(
            &store,
            SeedOptions {
                concurrency: 0,
                row_limit: None,
            },
        );
        assert_eq!(seeder.options().concurrency, 1);
    }
}
