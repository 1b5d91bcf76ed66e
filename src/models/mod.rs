pub mod catalog_model;
pub mod common_model;
pub mod recipe_model;
pub mod user_model;
