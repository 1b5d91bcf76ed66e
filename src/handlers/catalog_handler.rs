use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::config::AppState;
use crate::models::catalog_model::IngredientFilterParams;
use crate::services::catalog_service::CatalogService;
use crate::utils::api_response::ResponseBuilder;

pub async fn list_tags_handler(State(state): State<AppState>) -> impl IntoResponse {
    match CatalogService::list_tags(&state.db).await {
        Ok(res) => ResponseBuilder::success("TAGS_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn get_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match CatalogService::get_tag(&state.db, id).await {
        Ok(res) => ResponseBuilder::success("TAG_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn list_ingredients_handler(
    State(state): State<AppState>,
    Query(params): Query<IngredientFilterParams>,
) -> impl IntoResponse {
    match CatalogService::list_ingredients(&state.db, params.name.as_deref()).await {
        Ok(res) => ResponseBuilder::success("INGREDIENTS_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}

pub async fn get_ingredient_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match CatalogService::get_ingredient(&state.db, id).await {
        Ok(res) => ResponseBuilder::success("INGREDIENT_FETCHED", "Success", res).into_response(),
        Err(e) => ResponseBuilder::service_error::<()>(&e).into_response(),
    }
}
