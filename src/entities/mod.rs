pub mod ingredient;
pub mod membership;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_tag;
pub mod subscription;
pub mod tag;
pub mod user;
