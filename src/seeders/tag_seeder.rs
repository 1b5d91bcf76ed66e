use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::tag;

pub async fn seed_tags(db: &DatabaseConnection) -> Result<(), String> {
    let tags = [
        ("Breakfast", "#88b04b", "breakfast"),
        ("Dinner", "#0f4c81", "dinner"),
        ("Supper", "#5f4b8b", "supper"),
    ];

    for (name, color, slug) in tags {
        let exists = tag::Entity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(db)
            .await
            .map_err(|e| e.to_string())?;

        if exists.is_none() {
            let new_tag = tag::ActiveModel {
                name: Set(name.to_string()),
                color: Set(color.to_string()),
                slug: Set(slug.to_string()),
                ..Default::default()
            };
            new_tag.insert(db).await.map_err(|e| e.to_string())?;
            tracing::info!("Seeded tag: {}", name);
        }
    }

    Ok(())
}
