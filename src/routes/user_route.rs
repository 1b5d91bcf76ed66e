use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::config::AppState;
use crate::handlers::user_handler::*;
use crate::middleware::auth_middleware::{optional_auth, require_auth};

pub fn user_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/{id}", get(get_user_handler))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected = Router::new()
        .route("/me", get(me_handler))
        .route("/subscriptions", get(list_subscriptions_handler))
        .route(
            "/{id}/subscribe",
            post(subscribe_handler).delete(unsubscribe_handler),
        )
        .layer(middleware::from_fn_with_state(state, require_auth));

    public.merge(protected)
}
