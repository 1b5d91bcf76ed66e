use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::ingredient;

/// Starter catalog so a fresh database is usable straight away. The real
/// catalog is loaded operationally; this list only covers common staples.
const STARTER_INGREDIENTS: &[(&str, &str)] = &[
    ("wheat flour", "g"),
    ("sugar", "g"),
    ("salt", "g"),
    ("butter", "g"),
    ("milk", "ml"),
    ("water", "ml"),
    ("egg", "pcs"),
    ("chicken fillet", "g"),
    ("potato", "g"),
    ("onion", "pcs"),
    ("garlic", "cloves"),
    ("olive oil", "tbsp"),
    ("black pepper", "to taste"),
    ("tomato", "g"),
    ("rice", "g"),
];

pub async fn seed_ingredients(db: &DatabaseConnection) -> Result<(), String> {
    for (name, unit) in STARTER_INGREDIENTS {
        let exists = ingredient::Entity::find()
            .filter(ingredient::Column::Name.eq(*name))
            .filter(ingredient::Column::MeasurementUnit.eq(*unit))
            .one(db)
            .await
            .map_err(|e| e.to_string())?;

        if exists.is_none() {
            let new_ingredient = ingredient::ActiveModel {
                name: Set(name.to_string()),
                measurement_unit: Set(unit.to_string()),
                ..Default::default()
            };
            new_ingredient.insert(db).await.map_err(|e| e.to_string())?;
        }
    }

    tracing::info!("Ingredient catalog seeded");
    Ok(())
}
