use crate::config::AppState;
use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub mod catalog_route;
pub mod recipe_route;
pub mod user_route;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/tags", catalog_route::tag_routes())
        .nest("/api/ingredients", catalog_route::ingredient_routes())
        .nest("/api/recipes", recipe_route::recipe_routes(state.clone()))
        .nest("/api/users", user_route::user_routes(state.clone()))
        // Stored recipe images are served straight off disk
        .nest_service("/media", ServeDir::new(&state.config.media_root))
        .route(
            "/api/health",
            axum::routing::get(crate::handlers::health_check_handler),
        )
        .layer(cors)
}
