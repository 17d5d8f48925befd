//! Outcome models for a seed run.

use serde::{Deserialize, Serialize};

/// What happened to one input row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowOutcome {
    Inserted,
    SkippedMissingIsbn,
    AuthorFailed,
    BookFailed,
}

/// Totals for a whole run, logged at the end and returned to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedReport {
    /// Rows produced by the table parser
    pub rows_read: usize,
    /// Rows dispatched after applying the row limit
    pub rows_attempted: usize,
    pub inserted: usize,
    pub skipped_missing_isbn: usize,
    pub author_failures: usize,
    pub book_failures: usize,
    pub authors_created: usize,
}

impl SeedReport {
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.inserted += 1,
            RowOutcome::SkippedMissingIsbn => self.skipped_missing_isbn += 1,
            RowOutcome::AuthorFailed => self.author_failures += 1,
            RowOutcome::BookFailed => self.book_failures += 1,
        }
    }

    /// Rows that did not end up as a book
    pub fn failed(&self) -> usize {
        self.author_failures + self.book_failures
    }
}
