//! Author endpoints

use axum::{extract::State, Json};

use crate::error::AppResult;

/// List every author name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Author names", body = Vec<String>)
    )
)]
pub async fn list_authors(State(state): State<crate::AppState>) -> AppResult<Json<Vec<String>>> {
    let names = state.services.catalog.author_names().await?;
    Ok(Json(names))
}
