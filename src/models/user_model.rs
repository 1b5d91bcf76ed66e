use serde::{Deserialize, Serialize};

use crate::models::recipe_model::ShortRecipeResponse;

/// Authenticated caller, injected by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}

/// Possibly-anonymous caller for read endpoints. Anonymous is a valid state,
/// never an error; derived flags simply come back false.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<CurrentUser>);

impl Viewer {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub iat: usize,
}

/// Public profile with the per-viewer subscription flag.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// Author profile enriched with their recipes, as returned by the
/// subscription endpoints.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<ShortRecipeResponse>,
    /// Total for the author, unaffected by `recipes_limit` truncation.
    pub recipes_count: u64,
}

#[derive(Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<u64>,
}
