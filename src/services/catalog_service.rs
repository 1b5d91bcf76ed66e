use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{ingredient, tag};
use crate::error::{ServiceError, ServiceResult};
use crate::models::catalog_model::{IngredientResponse, TagResponse};

/// Read-only access to the shared tag and ingredient catalogs.
pub struct CatalogService;

impl CatalogService {
    pub async fn list_tags(db: &DatabaseConnection) -> ServiceResult<Vec<TagResponse>> {
        let tags = tag::Entity::find()
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?;
        Ok(tags.into_iter().map(Into::into).collect())
    }

    pub async fn get_tag(db: &DatabaseConnection, tag_id: i64) -> ServiceResult<TagResponse> {
        let tag = tag::Entity::find_by_id(tag_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("tag".to_string()))?;
        Ok(tag.into())
    }

    /// Ingredient list, optionally narrowed by a case-insensitive name
    /// prefix.
    pub async fn list_ingredients(
        db: &DatabaseConnection,
        name_prefix: Option<&str>,
    ) -> ServiceResult<Vec<IngredientResponse>> {
        let mut query = ingredient::Entity::find().order_by_asc(ingredient::Column::Name);

        if let Some(prefix) = name_prefix {
            query = query.filter(
                Expr::col((ingredient::Entity, ingredient::Column::Name))
                    .ilike(prefix_pattern(prefix)),
            );
        }

        let ingredients = query.all(db).await?;
        Ok(ingredients.into_iter().map(Into::into).collect())
    }

    pub async fn get_ingredient(
        db: &DatabaseConnection,
        ingredient_id: i64,
    ) -> ServiceResult<IngredientResponse> {
        let ing = ingredient::Entity::find_by_id(ingredient_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("ingredient".to_string()))?;
        Ok(ing.into())
    }
}

/// LIKE pattern for a literal prefix. The escape character itself must be
/// escaped before the wildcards.
fn prefix_pattern(prefix: &str) -> String {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_pattern_escapes_like_metacharacters() {
        assert_eq!(prefix_pattern("salt"), "salt%");
        assert_eq!(prefix_pattern("100% cocoa"), "100\\% cocoa%");
        assert_eq!(prefix_pattern("sea_salt"), "sea\\_salt%");
        assert_eq!(prefix_pattern("back\\slash"), "back\\\\slash%");
    }
}
