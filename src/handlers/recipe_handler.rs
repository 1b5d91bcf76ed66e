use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::config::AppState;
use crate::entities::membership::MembershipKind;
use crate::models::recipe_model::{RecipeFilterParams, RecipePayload};
use crate::models::user_model::{CurrentUser, Viewer};
use crate::services::membership_service::MembershipService;
use crate::services::recipe_service::RecipeService;
use crate::services::shopping_list_service::ShoppingListService;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::validated_wrapper::ValidatedJson;

pub async fn list_recipes_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(params): Query<RecipeFilterParams>,
) -> impl IntoResponse {
    match RecipeService::list_recipes(&state.db, params, viewer.user_id(), state.config.page_size)
        .await
    {
        Ok(res) => ResponseBuilder::success("RECIPES_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn get_recipe_handler(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::get_recipe(&state.db, id, viewer.user_id()).await {
        Ok(res) => ResponseBuilder::success("RECIPE_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn create_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RecipePayload>,
) -> impl IntoResponse {
    match RecipeService::create_recipe(&state.db, &state.media_service, &user, payload).await {
        Ok(res) => ResponseBuilder::created("RECIPE_CREATED", "Recipe created", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn update_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RecipePayload>,
) -> impl IntoResponse {
    match RecipeService::update_recipe(&state.db, &state.media_service, &user, id, payload).await {
        Ok(res) => ResponseBuilder::success("RECIPE_UPDATED", "Recipe updated", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn delete_recipe_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match RecipeService::delete_recipe(&state.db, &state.media_service, &user, id).await {
        Ok(()) => ResponseBuilder::no_content("RECIPE_DELETED", "Recipe deleted").into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn add_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match MembershipService::add(&state.db, user.id, id, MembershipKind::Favourite).await {
        Ok(res) => {
            ResponseBuilder::created("FAVORITE_ADDED", "Recipe added to favourites", res)
                .into_response()
        }
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match MembershipService::remove(&state.db, user.id, id, MembershipKind::Favourite).await {
        Ok(()) => ResponseBuilder::no_content("FAVORITE_REMOVED", "Recipe removed from favourites")
            .into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn add_to_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match MembershipService::add(&state.db, user.id, id, MembershipKind::ShoppingCart).await {
        Ok(res) => {
            ResponseBuilder::created("CART_ADDED", "Recipe added to shopping cart", res)
                .into_response()
        }
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn remove_from_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match MembershipService::remove(&state.db, user.id, id, MembershipKind::ShoppingCart).await {
        Ok(()) => ResponseBuilder::no_content("CART_REMOVED", "Recipe removed from shopping cart")
            .into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

/// The aggregated shopping list as a plain-text download.
pub async fn download_shopping_cart_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    match ShoppingListService::render_text(&state.db, user.id).await {
        Ok(text) => {
            let filename = format!("{}_shopping_list.txt", user.username);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                text,
            )
                .into_response()
        }
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}
