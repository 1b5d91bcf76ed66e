//! Domain-wide bounds shared by validation, entities and the migration schema.

pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 32_000;

pub const MIN_INGREDIENT_AMOUNT: i32 = 1;

pub const DEFAULT_PAGE_SIZE: u64 = 6;
