pub use sea_orm_migration::prelude::*;

mod m20260829_000001_create_users;
mod m20260829_000002_create_catalogs;
mod m20260829_000003_create_recipes;
mod m20260829_000004_create_relations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260829_000001_create_users::Migration),
            Box::new(m20260829_000002_create_catalogs::Migration),
            Box::new(m20260829_000003_create_recipes::Migration),
            Box::new(m20260829_000004_create_relations::Migration),
        ]
    }
}
