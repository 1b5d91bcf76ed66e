use crate::handlers::catalog_handler::*;
use axum::{routing::get, Router};

use crate::config::AppState;

// Catalogs are world-readable; rows only change through seeding.
pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags_handler))
        .route("/{id}", get(get_tag_handler))
}

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_ingredients_handler))
        .route("/{id}", get(get_ingredient_handler))
}
