use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{subscription, user};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user_model::UserResponse;

pub struct UserService;

impl UserService {
    pub async fn get_profile<C: ConnectionTrait>(
        db: &C,
        user_id: i64,
        viewer_id: Option<i64>,
    ) -> ServiceResult<UserResponse> {
        let user = user::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("user".to_string()))?;

        Self::build_profile(db, user, viewer_id).await
    }

    /// Projects a user row into its public profile. `is_subscribed` is looked
    /// up at read time and is always false for anonymous viewers.
    pub async fn build_profile<C: ConnectionTrait>(
        db: &C,
        user: user::Model,
        viewer_id: Option<i64>,
    ) -> ServiceResult<UserResponse> {
        let is_subscribed = match viewer_id {
            Some(viewer) => Self::is_subscribed(db, viewer, user.id).await?,
            None => false,
        };

        Ok(UserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        })
    }

    pub async fn is_subscribed<C: ConnectionTrait>(
        db: &C,
        fan_id: i64,
        author_id: i64,
    ) -> ServiceResult<bool> {
        let count = subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(fan_id))
            .filter(subscription::Column::AuthorId.eq(author_id))
            .count(db)
            .await?;
        Ok(count > 0)
    }
}
