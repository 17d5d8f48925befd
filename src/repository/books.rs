//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPage, BookQuery, NewBook, Pagination, PAGE_SIZE},
};

const BOOK_COLUMNS: &str = r#"
    b.id, b.book_id, b.title, b.series,
    COALESCE(a.name, 'Unknown') AS author,
    b.rating, b.description, b.language, b.isbn, b.genres, b.characters,
    b.book_format, b.edition, b.pages, b.publisher,
    b.publish_date, b.first_publish_date, b.awards,
    b.num_ratings, b.ratings_by_stars, b.liked_percent, b.setting,
    b.cover_img, b.bbe_score, b.bbe_votes, b.price
"#;

/// Catalog order: newest first, undated books last, then by title
const LIST_ORDER: &str = " ORDER BY b.publish_date DESC NULLS LAST, b.title";

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    builder.push(" WHERE 1=1");

    if let Some(title) = query.title_filter() {
        builder
            .push(" AND b.title ILIKE ")
            .push_bind(format!("%{}%", escape_like(title)));
    }

    if !query.author.is_empty() {
        builder
            .push(" AND a.name = ANY(")
            .push_bind(query.author.clone())
            .push(")");
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Search books by title and author names, newest publications first
    pub async fn search(&self, query: &BookQuery) -> AppResult<BookPage> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM books b LEFT JOIN authors a ON a.id = b.author_id",
        );
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let pagination = Pagination::new(query.requested_page(), total, PAGE_SIZE);

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id",
            BOOK_COLUMNS
        ));
        push_filters(&mut select, query);
        select
            .push(LIST_ORDER)
            .push(" LIMIT ")
            .push_bind(PAGE_SIZE)
            .push(" OFFSET ")
            .push_bind(pagination.offset(PAGE_SIZE));

        let books = select
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;

        Ok(BookPage { books, pagination })
    }

    /// Get a single book with its author name
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        let query = format!(
            "SELECT {} FROM books b LEFT JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_COLUMNS
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with ID {} not found", id)))
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a book and return its generated id
    pub async fn create(&self, book: &NewBook) -> AppResult<Uuid> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO books (
                id, book_id, title, series, author_id, rating, description,
                language, isbn, genres, characters, book_format, edition,
                pages, publisher, publish_date, first_publish_date, awards,
                num_ratings, ratings_by_stars, liked_percent, setting,
                cover_img, bbe_score, bbe_votes, price
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26
            )
            "#,
        )
        .bind(id)
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.series)
        .bind(book.author_id)
        .bind(book.rating)
        .bind(&book.description)
        .bind(&book.language)
        .bind(&book.isbn)
        .bind(&book.genres)
        .bind(&book.characters)
        .bind(&book.book_format)
        .bind(&book.edition)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(book.publish_date)
        .bind(book.first_publish_date)
        .bind(&book.awards)
        .bind(book.num_ratings)
        .bind(&book.ratings_by_stars)
        .bind(book.liked_percent)
        .bind(&book.setting)
        .bind(&book.cover_img)
        .bind(book.bbe_score)
        .bind(book.bbe_votes)
        .bind(book.price)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::from_insert(e, &format!("Book {}", book.book_id)))?;

        Ok(id)
    }

    /// Remove every book
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM books").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
