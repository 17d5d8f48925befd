//! Row to `NewBook` coercion.

use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use super::date::valid_date;
use super::table::RowRecord;
use crate::models::book::NewBook;

/// Column names of the book table
pub mod columns {
    pub const BOOK_ID: &str = "bookId";
    pub const TITLE: &str = "title";
    pub const SERIES: &str = "series";
    pub const AUTHOR: &str = "author";
    pub const RATING: &str = "rating";
    pub const DESCRIPTION: &str = "description";
    pub const LANGUAGE: &str = "language";
    pub const ISBN: &str = "isbn";
    pub const GENRES: &str = "genres";
    pub const CHARACTERS: &str = "characters";
    pub const BOOK_FORMAT: &str = "bookFormat";
    pub const EDITION: &str = "edition";
    pub const PAGES: &str = "pages";
    pub const PUBLISHER: &str = "publisher";
    pub const PUBLISH_DATE: &str = "publishDate";
    pub const FIRST_PUBLISH_DATE: &str = "firstPublishDate";
    pub const AWARDS: &str = "awards";
    pub const NUM_RATINGS: &str = "numRatings";
    pub const RATINGS_BY_STARS: &str = "ratingsByStars";
    pub const LIKED_PERCENT: &str = "likedPercent";
    pub const SETTING: &str = "setting";
    pub const COVER_IMG: &str = "coverImg";
    pub const BBE_SCORE: &str = "bbeScore";
    pub const BBE_VOTES: &str = "bbeVotes";
    pub const PRICE: &str = "price";
}

use columns::*;

/// ISBN of the row, if present and non-empty
pub fn isbn(row: &RowRecord) -> Option<&str> {
    row.non_empty(ISBN)
}

/// Author name of the row, trimmed. A blank name is kept as `""`; `None` only
/// when the row has no `author` column.
pub fn author_name(row: &RowRecord) -> Option<&str> {
    row.get(AUTHOR).map(str::trim)
}

fn text(row: &RowRecord, column: &str) -> Option<String> {
    row.non_empty(column).map(str::to_string)
}

fn number<T: FromStr>(row: &RowRecord, column: &str) -> Option<T> {
    row.non_empty(column)
        .and_then(|raw| raw.trim().parse::<T>().ok())
}

fn float(row: &RowRecord, column: &str) -> Option<f64> {
    number::<f64>(row, column).filter(|v| v.is_finite())
}

fn date(row: &RowRecord, column: &str) -> Option<NaiveDate> {
    row.non_empty(column).and_then(valid_date)
}

/// Build the insert shape for a row whose author is already resolved.
///
/// Empty or unparseable numeric fields and implausible dates become `None`.
pub fn build_book(row: &RowRecord, author_id: Uuid) -> NewBook {
    NewBook {
        book_id: row.get(BOOK_ID).unwrap_or_default().to_string(),
        title: row.get(TITLE).unwrap_or_default().to_string(),
        series: text(row, SERIES),
        author_id,
        rating: float(row, RATING),
        description: text(row, DESCRIPTION),
        language: text(row, LANGUAGE),
        isbn: row.get(ISBN).unwrap_or_default().to_string(),
        genres: text(row, GENRES),
        characters: text(row, CHARACTERS),
        book_format: text(row, BOOK_FORMAT),
        edition: text(row, EDITION),
        pages: number(row, PAGES),
        publisher: text(row, PUBLISHER),
        publish_date: date(row, PUBLISH_DATE),
        first_publish_date: date(row, FIRST_PUBLISH_DATE),
        awards: text(row, AWARDS),
        num_ratings: number(row, NUM_RATINGS),
        ratings_by_stars: text(row, RATINGS_BY_STARS),
        liked_percent: float(row, LIKED_PERCENT),
        setting: text(row, SETTING),
        cover_img: text(row, COVER_IMG),
        bbe_score: float(row, BBE_SCORE),
        bbe_votes: number(row, BBE_VOTES),
        price: float(row, PRICE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RowRecord {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_pages_empty_is_absent() {
        let book = build_book(&row(&[(PAGES, "")]), Uuid::nil());
        assert_eq!(book.pages, None);
    }

    #[test]
    fn test_pages_parsed() {
        let book = build_book(&row(&[(PAGES, "312")]), Uuid::nil());
        assert_eq!(book.pages, Some(312));
    }

    #[test]
    fn test_malformed_numbers_are_absent() {
        let book = build_book(
            &row(&[(PAGES, "312 pages"), (RATING, "NaN"), (PRICE, "n/a")]),
            Uuid::nil(),
        );
        assert_eq!(book.pages, None);
        assert_eq!(book.rating, None);
        assert_eq!(book.price, None);
    }

    #[test]
    fn test_full_row() {
        let author_id = Uuid::new_v4();
        let book = build_book(
            &row(&[
                (BOOK_ID, "2767052-the-hunger-games"),
                (TITLE, "The Hunger Games"),
                (SERIES, "The Hunger Games #1"),
                (AUTHOR, "Suzanne Collins"),
                (RATING, "4.33"),
                (LANGUAGE, "English"),
                (ISBN, "9780439023481"),
                (PAGES, "374"),
                (PUBLISH_DATE, "09/14/08"),
                (FIRST_PUBLISH_DATE, ""),
                (NUM_RATINGS, "6376780"),
                (LIKED_PERCENT, "96"),
                (BBE_VOTES, "30516"),
                (PRICE, "5.09"),
                (EDITION, ""),
            ]),
            author_id,
        );

        assert_eq!(book.book_id, "2767052-the-hunger-games");
        assert_eq!(book.title, "The Hunger Games");
        assert_eq!(book.series.as_deref(), Some("The Hunger Games #1"));
        assert_eq!(book.author_id, author_id);
        assert_eq!(book.rating, Some(4.33));
        assert_eq!(book.isbn, "9780439023481");
        assert_eq!(book.pages, Some(374));
        assert_eq!(book.publish_date, NaiveDate::from_ymd_opt(2008, 9, 14));
        assert_eq!(book.first_publish_date, None);
        assert_eq!(book.num_ratings, Some(6_376_780));
        assert_eq!(book.liked_percent, Some(96.0));
        assert_eq!(book.bbe_votes, Some(30516));
        assert_eq!(book.price, Some(5.09));
        assert_eq!(book.edition, None);
        assert_eq!(book.description, None);
    }

    #[test]
    fn test_out_of_range_dates_are_absent() {
        let book = build_book(
            &row(&[(PUBLISH_DATE, "1850-01-01"), (FIRST_PUBLISH_DATE, "garbage")]),
            Uuid::nil(),
        );
        assert_eq!(book.publish_date, None);
        assert_eq!(book.first_publish_date, None);
    }

    #[test]
    fn test_author_name_is_trimmed() {
        assert_eq!(author_name(&row(&[(AUTHOR, "  Jane Austen ")])), Some("Jane Austen"));
        assert_eq!(author_name(&row(&[(AUTHOR, "   ")])), Some(""));
        assert_eq!(author_name(&row(&[])), None);
    }
}
