//! Header-keyed CSV table parsing.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::AppResult;

/// One data row keyed by header name, in header order.
///
/// Columns missing from a short row are absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowRecord {
    fields: IndexMap<String, String>,
}

impl RowRecord {
    /// Raw value of a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Raw value of a column, treating an empty string as absent
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RowRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse CSV text whose first line is the header.
///
/// Extra trailing fields in a long row are dropped. Records the tokenizer
/// rejects are logged and skipped.
pub fn parse_table(text: &str) -> Vec<RowRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("Could not read CSV header: {}", e);
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(headers.iter().zip(record.iter()).collect()),
            Err(e) => tracing::warn!("Skipping unreadable CSV record {}: {}", index, e),
        }
    }

    rows
}

/// Read and parse a CSV file. Failing to read the file is fatal.
pub async fn read_table(path: &Path) -> AppResult<Vec<RowRecord>> {
    tracing::info!("Reading book table from {}", path.display());
    let text = tokio::fs::read_to_string(path).await?;
    let rows = parse_table(&text);
    tracing::debug!("Parsed {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
