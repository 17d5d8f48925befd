//! CSV seeding of the book catalog

pub mod date;
pub mod loader;
pub mod record;
pub mod table;

pub use date::is_valid_date;
pub use loader::{SeedOptions, Seeder, DEFAULT_CONCURRENCY};
pub use table::{parse_table, read_table, RowRecord};
