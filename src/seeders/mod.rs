pub mod ingredient_seeder;
pub mod tag_seeder;

use sea_orm::DatabaseConnection;

pub async fn run_seeders(db: &DatabaseConnection) -> Result<(), String> {
    tag_seeder::seed_tags(db).await?;
    ingredient_seeder::seed_ingredients(db).await?;
    Ok(())
}
