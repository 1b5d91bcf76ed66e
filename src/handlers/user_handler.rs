use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension,
};

use crate::config::AppState;
use crate::models::user_model::{CurrentUser, SubscriptionParams, Viewer};
use crate::services::subscription_service::SubscriptionService;
use crate::services::user_service::UserService;
use crate::utils::api_response::ResponseBuilder;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    match UserService::get_profile(&*state.db, user.id, Some(user.id)).await {
        Ok(res) => ResponseBuilder::success("PROFILE_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match UserService::get_profile(&*state.db, id, viewer.user_id()).await {
        Ok(res) => ResponseBuilder::success("PROFILE_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn subscribe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Query(params): Query<SubscriptionParams>,
) -> impl IntoResponse {
    match SubscriptionService::subscribe(&state.db, user.id, id, params.recipes_limit).await {
        Ok(res) => ResponseBuilder::created("SUBSCRIBED", "Subscription created", res)
            .into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn unsubscribe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match SubscriptionService::unsubscribe(&state.db, user.id, id).await {
        Ok(()) => {
            ResponseBuilder::no_content("UNSUBSCRIBED", "Subscription removed").into_response()
        }
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SubscriptionParams>,
) -> impl IntoResponse {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(state.config.page_size).max(1);

    match SubscriptionService::list_subscriptions(
        &state.db,
        user.id,
        page,
        limit,
        params.recipes_limit,
    )
    .await
    {
        Ok(res) => {
            ResponseBuilder::success("SUBSCRIPTIONS_FETCHED", "Success", res).into_response()
        }
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}
