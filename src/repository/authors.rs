//! Authors repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::author::Author,
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All author names, alphabetically
    pub async fn list_names(&self) -> AppResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM authors ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    /// Create an author. A name that already exists yields `AppError::Conflict`.
    pub async fn create(&self, name: &str) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "INSERT INTO authors (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_insert(e, &format!("Author '{}'", name)))
    }

    /// Remove every author. Books must be deleted first.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM authors").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
