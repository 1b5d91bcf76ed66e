use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::entities::{recipe, subscription, user};
use crate::error::{ServiceError, ServiceResult};
use crate::models::common_model::Paginated;
use crate::models::user_model::SubscriptionResponse;
use crate::services::recipe_service::RecipeService;

pub struct SubscriptionService;

impl SubscriptionService {
    /// Subscribes the fan to the author. The self-check comes before
    /// everything else: subscribing to yourself fails regardless of state.
    pub async fn subscribe(
        db: &DatabaseConnection,
        fan_id: i64,
        author_id: i64,
        recipes_limit: Option<u64>,
    ) -> ServiceResult<SubscriptionResponse> {
        if fan_id == author_id {
            return Err(ServiceError::SelfReference);
        }

        let author = user::Entity::find_by_id(author_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("author".to_string()))?;

        let existing = Self::find_subscription(db, fan_id, author_id).await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "subscription already exists".to_string(),
            ));
        }

        // The unique (user, author) index settles concurrent subscribes;
        // the loser reports the same conflict as a plain second subscribe.
        subscription::ActiveModel {
            id: NotSet,
            user_id: Set(fan_id),
            author_id: Set(author_id),
        }
        .insert(db)
        .await
        .map_err(|e| {
            ServiceError::from_insert_race(e, "subscription already exists".to_string())
        })?;

        Self::build_response(db, author, recipes_limit).await
    }

    pub async fn unsubscribe(
        db: &DatabaseConnection,
        fan_id: i64,
        author_id: i64,
    ) -> ServiceResult<()> {
        user::Entity::find_by_id(author_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("author".to_string()))?;

        let existing = Self::find_subscription(db, fan_id, author_id)
            .await?
            .ok_or_else(|| ServiceError::Conflict("subscription does not exist".to_string()))?;

        subscription::Entity::delete_by_id(existing.id)
            .exec(db)
            .await?;
        Ok(())
    }

    /// Authors the fan follows, each rendered with their recipes and counts.
    pub async fn list_subscriptions(
        db: &DatabaseConnection,
        fan_id: i64,
        page: u64,
        limit: u64,
        recipes_limit: Option<u64>,
    ) -> ServiceResult<Paginated<SubscriptionResponse>> {
        let author_ids: Vec<i64> = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(fan_id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.author_id)
            .collect();

        let paginator = user::Entity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .order_by_asc(user::Column::Id)
            .paginate(db, limit);
        let count = paginator.num_items().await?;
        let authors = paginator.fetch_page(page - 1).await?;

        let mut results = Vec::with_capacity(authors.len());
        for author in authors {
            results.push(Self::build_response(db, author, recipes_limit).await?);
        }

        Ok(Paginated::new(results, count, page, limit))
    }

    /// Author profile as seen by one of their subscribers: is_subscribed is
    /// true by construction, recipes may be truncated by `recipes_limit`,
    /// recipes_count always reflects the full total.
    async fn build_response(
        db: &DatabaseConnection,
        author: user::Model,
        recipes_limit: Option<u64>,
    ) -> ServiceResult<SubscriptionResponse> {
        let recipes_count = recipe::Entity::find()
            .filter(recipe::Column::AuthorId.eq(author.id))
            .count(db)
            .await?;

        let mut query = recipe::Entity::find()
            .filter(recipe::Column::AuthorId.eq(author.id))
            .order_by_desc(recipe::Column::Id);
        if let Some(limit) = recipes_limit {
            query = query.limit(limit);
        }
        let recipes = query
            .all(db)
            .await?
            .iter()
            .map(RecipeService::to_short_response)
            .collect();

        Ok(SubscriptionResponse {
            id: author.id,
            email: author.email,
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed: true,
            recipes,
            recipes_count,
        })
    }

    async fn find_subscription(
        db: &DatabaseConnection,
        fan_id: i64,
        author_id: i64,
    ) -> ServiceResult<Option<subscription::Model>> {
        let found = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(fan_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
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

    fn user_row(id: i64) -> user::Model {
        user::Model {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: String::new(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn self_subscription_always_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = SubscriptionService::subscribe(&db, 5, 5, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::SelfReference));
        // Rejected before any query
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn subscribing_to_missing_author_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let err = SubscriptionService::subscribe(&db, 5, 99, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_subscription_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(9)]])
            .append_query_results([vec![subscription::Model {
                id: 1,
                user_id: 5,
                author_id: 9,
            }]])
            .into_connection();

        let err = SubscriptionService::subscribe(&db, 5, 9, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn unsubscribe_without_subscription_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row(9)]])
            .append_query_results([Vec::<subscription::Model>::new()])
            .into_connection();

        let err = SubscriptionService::unsubscribe(&db, 5, 9).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
