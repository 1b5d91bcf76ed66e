use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, QueryFilter,
};

use crate::entities::membership::{self, MembershipKind};
use crate::entities::recipe;
use crate::error::{ServiceError, ServiceResult};
use crate::models::recipe_model::ShortRecipeResponse;
use crate::services::recipe_service::RecipeService;

/// Favourite and shopping-cart toggles: one service over the shared
/// membership table, discriminated by kind.
pub struct MembershipService;

impl MembershipService {
    /// Adds (user, recipe) to the given list. The recipe must exist and the
    /// pair must not: a second add is a conflict, never a second row.
    pub async fn add(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> ServiceResult<ShortRecipeResponse> {
        let recipe = recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("recipe".to_string()))?;

        let existing = Self::find_membership(db, user_id, recipe_id, kind).await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "recipe is already in your {}",
                kind.label()
            )));
        }

        // A concurrent add may slip past the check above; the unique index
        // turns the losing insert into the same conflict.
        membership::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            recipe_id: Set(recipe_id),
            kind: Set(kind),
        }
        .insert(db)
        .await
        .map_err(|e| {
            ServiceError::from_insert_race(
                e,
                format!("recipe is already in your {}", kind.label()),
            )
        })?;

        Ok(RecipeService::to_short_response(&recipe))
    }

    /// Removes (user, recipe) from the given list. A missing recipe is a
    /// not-found, a missing membership is a conflict; the existence check
    /// always runs first.
    pub async fn remove(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> ServiceResult<()> {
        recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("recipe".to_string()))?;

        let existing = Self::find_membership(db, user_id, recipe_id, kind)
            .await?
            .ok_or_else(|| {
                ServiceError::Conflict(format!("recipe is not in your {}", kind.label()))
            })?;

        membership::Entity::delete_by_id(existing.id).exec(db).await?;
        Ok(())
    }

    async fn find_membership(
        db: &DatabaseConnection,
        user_id: i64,
        recipe_id: i64,
        kind: MembershipKind,
    ) -> ServiceResult<Option<membership::Model>> {
        let found = membership::Entity::find()
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::RecipeId.eq(recipe_id))
            .filter(membership::Column::Kind.eq(kind))
            .one(db)
            .await?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn recipe_row(id: i64) -> recipe::Model {
        recipe::Model {
            id,
            author_id: 1,
            name: "Borscht".to_string(),
            image: "/media/recipes/x.png".to_string(),
            description: "Beets".to_string(),
            cooking_time: 90,
            created_at: Utc::now(),
        }
    }

    fn membership_row(id: i64, user_id: i64, recipe_id: i64, kind: MembershipKind) -> membership::Model {
        membership::Model {
            id,
            user_id,
            recipe_id,
            kind,
        }
    }

    #[tokio::test]
    async fn second_add_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row(7)]])
            .append_query_results([vec![membership_row(3, 1, 7, MembershipKind::Favourite)]])
            .into_connection();

        let err = MembershipService::add(&db, 1, 7, MembershipKind::Favourite)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_to_missing_recipe_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<recipe::Model>::new()])
            .into_connection();

        let err = MembershipService::add(&db, 1, 99, MembershipKind::ShoppingCart)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn removing_a_non_member_is_a_conflict_not_a_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row(7)]])
            .append_query_results([Vec::<membership::Model>::new()])
            .into_connection();

        let err = MembershipService::remove(&db, 1, 7, MembershipKind::Favourite)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn remove_checks_recipe_existence_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<recipe::Model>::new()])
            .into_connection();

        let err = MembershipService::remove(&db, 1, 99, MembershipKind::Favourite)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
