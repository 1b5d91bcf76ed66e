use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::config::AppState;
use crate::handlers::recipe_handler::*;
use crate::middleware::auth_middleware::{optional_auth, require_auth};

pub fn recipe_routes(state: AppState) -> Router<AppState> {
    // Reads work anonymously but still resolve the viewer for the
    // per-viewer flags; writes require a bearer token.
    let public = Router::new()
        .route("/", get(list_recipes_handler))
        .route("/{id}", get(get_recipe_handler))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected = Router::new()
        .route("/", post(create_recipe_handler))
        .route(
            "/{id}",
            put(update_recipe_handler)
                .patch(update_recipe_handler)
                .delete(delete_recipe_handler),
        )
        .route(
            "/{id}/favorite",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route(
            "/{id}/shopping_cart",
            post(add_to_cart_handler).delete(remove_from_cart_handler),
        )
        .route(
            "/download_shopping_cart",
            get(download_shopping_cart_handler),
        )
        .layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}
