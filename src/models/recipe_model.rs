use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::catalog_model::TagResponse;
use crate::models::user_model::UserResponse;

/// Full recipe body. Used for both create and replace: updates carry the
/// complete recipe, there is no partial-field merge.
#[derive(Deserialize, Validate)]
pub struct RecipePayload {
    #[validate(length(min = 1, max = 200, message = "Recipe name must be 1-200 characters"))]
    pub name: String,

    /// Inline image, "data:image/...;base64,..." or raw base64.
    pub image: String,

    #[serde(rename = "text")]
    pub description: String,

    pub cooking_time: i32,

    pub ingredients: Vec<IngredientAmountPayload>,

    pub tags: Vec<i64>,
}

#[derive(Deserialize, Clone)]
pub struct IngredientAmountPayload {
    pub id: i64,
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct IngredientLineResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub author: UserResponse,
    pub name: String,
    pub image: String,
    pub ingredients: Vec<IngredientLineResponse>,
    #[serde(rename = "text")]
    pub description: String,
    pub tags: Vec<TagResponse>,
    pub cooking_time: i32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Compact representation returned by the membership toggles and embedded in
/// subscription projections.
#[derive(Debug, Serialize)]
pub struct ShortRecipeResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Deserialize)]
pub struct RecipeFilterParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i64>,
    /// Comma-separated tag slugs; a recipe matches if it carries any of them.
    pub tags: Option<String>,
    /// 1 = only recipes the viewer favourited.
    pub is_favorited: Option<u8>,
    /// 1 = only recipes in the viewer's shopping cart.
    pub is_in_shopping_cart: Option<u8>,
}
