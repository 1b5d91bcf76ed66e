use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, JoinType, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, TransactionTrait,
};
use std::collections::HashSet;

use crate::constants::{MAX_COOKING_TIME, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT};
use crate::entities::membership::MembershipKind;
use crate::entities::{ingredient, membership, recipe, recipe_ingredient, recipe_tag, tag, user};
use crate::error::{ServiceError, ServiceResult};
use crate::models::common_model::Paginated;
use crate::models::recipe_model::{
    IngredientAmountPayload, IngredientLineResponse, RecipeFilterParams, RecipePayload,
    RecipeResponse, ShortRecipeResponse,
};
use crate::models::user_model::CurrentUser;
use crate::services::media_service::MediaService;
use crate::services::user_service::UserService;

pub struct RecipeService;

impl RecipeService {
    /// Creates the recipe aggregate: the recipe row, its ingredient lines and
    /// its tag links, all in one transaction. Validation rejects before any
    /// write; the response is the full read projection.
    pub async fn create_recipe(
        db: &DatabaseConnection,
        media: &MediaService,
        author: &CurrentUser,
        payload: RecipePayload,
    ) -> ServiceResult<RecipeResponse> {
        let tag_ids = Self::validate_payload(db, &payload).await?;

        let image_ref = media.store_image(&payload.image).await?;

        let txn = db.begin().await?;

        let saved = recipe::ActiveModel {
            id: NotSet,
            author_id: Set(author.id),
            name: Set(payload.name),
            image: Set(image_ref),
            description: Set(payload.description),
            cooking_time: Set(payload.cooking_time),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        Self::insert_lines(&txn, saved.id, &payload.ingredients).await?;
        Self::insert_tag_links(&txn, saved.id, &tag_ids).await?;

        txn.commit().await?;

        tracing::info!(recipe_id = saved.id, author_id = author.id, "recipe created");

        Self::get_recipe(db, saved.id, Some(author.id)).await
    }

    /// Full replace: same validation as create, then the existing ingredient
    /// lines and tag links are dropped and re-created from the new body
    /// inside the transaction. The author never changes.
    pub async fn update_recipe(
        db: &DatabaseConnection,
        media: &MediaService,
        user: &CurrentUser,
        recipe_id: i64,
        payload: RecipePayload,
    ) -> ServiceResult<RecipeResponse> {
        let existing = recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("recipe".to_string()))?;

        if existing.author_id != user.id && !user.is_staff {
            return Err(ServiceError::Forbidden(
                "only the author or an admin may modify this recipe".to_string(),
            ));
        }

        let tag_ids = Self::validate_payload(db, &payload).await?;

        let old_image = existing.image.clone();
        let image_ref = media.store_image(&payload.image).await?;

        let updated =
            match Self::replace_aggregate(db, existing, image_ref.clone(), payload, &tag_ids).await
            {
                Ok(updated) => updated,
                Err(e) => {
                    // The new file must not outlive a failed replace
                    media.remove_image(&image_ref).await;
                    return Err(e);
                }
            };

        if old_image != image_ref {
            media.remove_image(&old_image).await;
        }

        Self::get_recipe(db, updated.id, Some(user.id)).await
    }

    async fn replace_aggregate(
        db: &DatabaseConnection,
        existing: recipe::Model,
        image_ref: String,
        payload: RecipePayload,
        tag_ids: &[i64],
    ) -> ServiceResult<recipe::Model> {
        let txn = db.begin().await?;

        let mut active: recipe::ActiveModel = existing.into();
        active.name = Set(payload.name);
        active.image = Set(image_ref);
        active.description = Set(payload.description);
        active.cooking_time = Set(payload.cooking_time);
        let updated = active.update(&txn).await?;

        recipe_ingredient::Entity::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(updated.id))
            .exec(&txn)
            .await?;
        recipe_tag::Entity::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(updated.id))
            .exec(&txn)
            .await?;

        Self::insert_lines(&txn, updated.id, &payload.ingredients).await?;
        Self::insert_tag_links(&txn, updated.id, tag_ids).await?;

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn delete_recipe(
        db: &DatabaseConnection,
        media: &MediaService,
        user: &CurrentUser,
        recipe_id: i64,
    ) -> ServiceResult<()> {
        let existing = recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("recipe".to_string()))?;

        if existing.author_id != user.id && !user.is_staff {
            return Err(ServiceError::Forbidden(
                "only the author or an admin may delete this recipe".to_string(),
            ));
        }

        // Lines, tag links and membership facts go with it (FK cascade)
        recipe::Entity::delete_by_id(existing.id).exec(db).await?;
        media.remove_image(&existing.image).await;
        tracing::info!(recipe_id = existing.id, "recipe deleted");
        Ok(())
    }

    pub async fn get_recipe(
        db: &DatabaseConnection,
        recipe_id: i64,
        viewer_id: Option<i64>,
    ) -> ServiceResult<RecipeResponse> {
        let recipe = recipe::Entity::find_by_id(recipe_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("recipe".to_string()))?;

        Self::build_response(db, recipe, viewer_id).await
    }

    pub async fn list_recipes(
        db: &DatabaseConnection,
        params: RecipeFilterParams,
        viewer_id: Option<i64>,
        default_page_size: u64,
    ) -> ServiceResult<Paginated<RecipeResponse>> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params.limit.unwrap_or(default_page_size).max(1);

        let mut query = recipe::Entity::find();

        if let Some(author) = params.author {
            query = query.filter(recipe::Column::AuthorId.eq(author));
        }

        if let Some(tags_param) = params.tags.as_deref() {
            let slugs: Vec<&str> = tags_param
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if !slugs.is_empty() {
                query = query
                    .join(JoinType::InnerJoin, recipe::Relation::RecipeTag.def())
                    .join(JoinType::InnerJoin, recipe_tag::Relation::Tag.def())
                    .filter(tag::Column::Slug.is_in(slugs))
                    .distinct();
            }
        }

        // Membership filters only make sense for an authenticated viewer;
        // for anonymous callers the flags are uniformly false and the
        // filters are ignored.
        if let Some(viewer) = viewer_id {
            if params.is_favorited == Some(1) {
                let ids = Self::member_recipe_ids(db, viewer, MembershipKind::Favourite).await?;
                query = query.filter(recipe::Column::Id.is_in(ids));
            }
            if params.is_in_shopping_cart == Some(1) {
                let ids = Self::member_recipe_ids(db, viewer, MembershipKind::ShoppingCart).await?;
                query = query.filter(recipe::Column::Id.is_in(ids));
            }
        }

        // Most recently created first
        let paginator = query
            .order_by_desc(recipe::Column::Id)
            .paginate(db, limit);
        let count = paginator.num_items().await?;
        let rows = paginator.fetch_page(page - 1).await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(Self::build_response(db, row, viewer_id).await?);
        }

        Ok(Paginated::new(results, count, page, limit))
    }

    pub fn to_short_response(recipe: &recipe::Model) -> ShortRecipeResponse {
        ShortRecipeResponse {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }

    // ---- projection -------------------------------------------------------

    async fn build_response(
        db: &DatabaseConnection,
        recipe: recipe::Model,
        viewer_id: Option<i64>,
    ) -> ServiceResult<RecipeResponse> {
        let author = user::Entity::find_by_id(recipe.author_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("author".to_string()))?;
        let author = UserService::build_profile(db, author, viewer_id).await?;

        let lines = recipe_ingredient::Entity::find()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe.id))
            .find_also_related(ingredient::Entity)
            .all(db)
            .await?;
        let mut ingredients = Vec::with_capacity(lines.len());
        for (line, ing) in lines {
            let ing = ing.ok_or_else(|| ServiceError::NotFound("ingredient".to_string()))?;
            ingredients.push(IngredientLineResponse {
                id: ing.id,
                name: ing.name,
                measurement_unit: ing.measurement_unit,
                amount: line.amount,
            });
        }

        let tags = recipe
            .find_related(tag::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let (is_favorited, is_in_shopping_cart) =
            Self::membership_flags(db, recipe.id, viewer_id).await?;

        Ok(RecipeResponse {
            id: recipe.id,
            author,
            name: recipe.name,
            image: recipe.image,
            ingredients,
            description: recipe.description,
            tags,
            cooking_time: recipe.cooking_time,
            is_favorited,
            is_in_shopping_cart,
        })
    }

    /// Derived per-viewer flags, queried at read time. Anonymous viewers get
    /// (false, false) without touching the database.
    pub async fn membership_flags(
        db: &DatabaseConnection,
        recipe_id: i64,
        viewer_id: Option<i64>,
    ) -> ServiceResult<(bool, bool)> {
        let Some(viewer) = viewer_id else {
            return Ok((false, false));
        };

        let rows = membership::Entity::find()
            .filter(membership::Column::UserId.eq(viewer))
            .filter(membership::Column::RecipeId.eq(recipe_id))
            .all(db)
            .await?;

        let is_favorited = rows.iter().any(|m| m.kind == MembershipKind::Favourite);
        let in_cart = rows.iter().any(|m| m.kind == MembershipKind::ShoppingCart);
        Ok((is_favorited, in_cart))
    }

    async fn member_recipe_ids(
        db: &DatabaseConnection,
        user_id: i64,
        kind: MembershipKind,
    ) -> ServiceResult<Vec<i64>> {
        let rows = membership::Entity::find()
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::Kind.eq(kind))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|m| m.recipe_id).collect())
    }

    // ---- validation -------------------------------------------------------

    /// Runs the aggregate's checks in a fixed order so the reported failure
    /// kind is deterministic, and returns the validated tag ids. Nothing is
    /// written while this runs.
    async fn validate_payload(
        db: &DatabaseConnection,
        payload: &RecipePayload,
    ) -> ServiceResult<Vec<i64>> {
        check_cooking_time(payload.cooking_time)?;
        check_image_present(&payload.image)?;
        let ingredient_ids = check_ingredient_ids(&payload.ingredients)?;
        Self::ensure_ingredients_exist(db, &ingredient_ids).await?;
        check_amounts(&payload.ingredients)?;
        let tag_ids = check_tag_ids(&payload.tags)?;
        Self::ensure_tags_exist(db, &tag_ids).await?;
        Ok(tag_ids)
    }

    async fn ensure_ingredients_exist(
        db: &DatabaseConnection,
        ids: &[i64],
    ) -> ServiceResult<()> {
        let found: HashSet<i64> = ingredient::Entity::find()
            .filter(ingredient::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?
            .into_iter()
            .map(|i| i.id)
            .collect();

        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(ServiceError::NotFound(format!("ingredient {missing}"))),
            None => Ok(()),
        }
    }

    async fn ensure_tags_exist(db: &DatabaseConnection, ids: &[i64]) -> ServiceResult<()> {
        let found: HashSet<i64> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.to_vec()))
            .all(db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(ServiceError::NotFound(format!("tag {missing}"))),
            None => Ok(()),
        }
    }

    // ---- writes -----------------------------------------------------------

    async fn insert_lines<C: sea_orm::ConnectionTrait>(
        txn: &C,
        recipe_id: i64,
        lines: &[IngredientAmountPayload],
    ) -> ServiceResult<()> {
        let models = lines.iter().map(|line| recipe_ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(line.id),
            amount: Set(line.amount),
        });
        recipe_ingredient::Entity::insert_many(models).exec(txn).await?;
        Ok(())
    }

    async fn insert_tag_links<C: sea_orm::ConnectionTrait>(
        txn: &C,
        recipe_id: i64,
        tag_ids: &[i64],
    ) -> ServiceResult<()> {
        let models = tag_ids.iter().map(|tag_id| recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        });
        recipe_tag::Entity::insert_many(models).exec(txn).await?;
        Ok(())
    }
}

fn check_cooking_time(minutes: i32) -> ServiceResult<()> {
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&minutes) {
        return Err(ServiceError::Range(format!(
            "cooking_time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME} minutes"
        )));
    }
    Ok(())
}

fn check_image_present(image: &str) -> ServiceResult<()> {
    if image.trim().is_empty() {
        return Err(ServiceError::MissingField("image"));
    }
    Ok(())
}

fn check_ingredient_ids(lines: &[IngredientAmountPayload]) -> ServiceResult<Vec<i64>> {
    if lines.is_empty() {
        return Err(ServiceError::Empty(
            "recipe must contain at least one ingredient".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for line in lines {
        if !seen.insert(line.id) {
            return Err(ServiceError::Duplicate(format!(
                "ingredient {} appears more than once",
                line.id
            )));
        }
    }
    Ok(lines.iter().map(|l| l.id).collect())
}

fn check_amounts(lines: &[IngredientAmountPayload]) -> ServiceResult<()> {
    for line in lines {
        if line.amount < MIN_INGREDIENT_AMOUNT {
            return Err(ServiceError::Range(format!(
                "amount for ingredient {} must be at least {MIN_INGREDIENT_AMOUNT}",
                line.id
            )));
        }
    }
    Ok(())
}

fn check_tag_ids(tags: &[i64]) -> ServiceResult<Vec<i64>> {
    if tags.is_empty() {
        return Err(ServiceError::Empty(
            "recipe must carry at least one tag".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for tag_id in tags {
        if !seen.insert(*tag_id) {
            return Err(ServiceError::Duplicate(format!(
                "tag {tag_id} appears more than once"
            )));
        }
    }
    Ok(tags.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn payload(
        cooking_time: i32,
        image: &str,
        ingredients: Vec<IngredientAmountPayload>,
        tags: Vec<i64>,
    ) -> RecipePayload {
        RecipePayload {
            name: "Pancakes".to_string(),
            image: image.to_string(),
            description: "Mix and fry".to_string(),
            cooking_time,
            ingredients,
            tags,
        }
    }

    fn line(id: i64, amount: i32) -> IngredientAmountPayload {
        IngredientAmountPayload { id, amount }
    }

    fn recipe_row(id: i64, author_id: i64) -> recipe::Model {
        recipe::Model {
            id,
            author_id,
            name: "Pancakes".to_string(),
            image: "/media/recipes/old.png".to_string(),
            description: "Mix and fry".to_string(),
            cooking_time: 30,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cooking_time_bounds() {
        assert!(check_cooking_time(MIN_COOKING_TIME).is_ok());
        assert!(check_cooking_time(MAX_COOKING_TIME).is_ok());
        assert!(matches!(
            check_cooking_time(0).unwrap_err(),
            ServiceError::Range(_)
        ));
        assert!(matches!(
            check_cooking_time(MAX_COOKING_TIME + 1).unwrap_err(),
            ServiceError::Range(_)
        ));
    }

    #[test]
    fn duplicate_ingredient_ids_are_rejected() {
        let err = check_ingredient_ids(&[line(1, 100), line(2, 50), line(1, 10)]).unwrap_err();
        assert!(matches!(err, ServiceError::Duplicate(_)));
    }

    #[test]
    fn empty_ingredient_list_is_rejected() {
        assert!(matches!(
            check_ingredient_ids(&[]).unwrap_err(),
            ServiceError::Empty(_)
        ));
    }

    #[test]
    fn amounts_below_minimum_are_rejected() {
        let err = check_amounts(&[line(1, 100), line(2, 0)]).unwrap_err();
        assert!(matches!(err, ServiceError::Range(_)));
    }

    #[test]
    fn empty_and_duplicate_tags_are_rejected() {
        assert!(matches!(
            check_tag_ids(&[]).unwrap_err(),
            ServiceError::Empty(_)
        ));
        assert!(matches!(
            check_tag_ids(&[3, 3]).unwrap_err(),
            ServiceError::Duplicate(_)
        ));
        assert_eq!(check_tag_ids(&[3, 4]).unwrap(), vec![3, 4]);
    }

    #[tokio::test]
    async fn create_with_duplicate_ingredients_persists_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let media = MediaService::new("target/test-media");
        let author = CurrentUser {
            id: 1,
            username: "chef".to_string(),
            is_staff: false,
        };

        let err = RecipeService::create_recipe(
            &db,
            &media,
            &author,
            payload(30, "aGk=", vec![line(1, 200), line(1, 300)], vec![1]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Duplicate(_)));
        // Validation failed before any statement reached the database
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn create_with_empty_tags_fails_before_any_write() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                ingredient::Model {
                    id: 1,
                    name: "flour".to_string(),
                    measurement_unit: "g".to_string(),
                },
                ingredient::Model {
                    id: 2,
                    name: "sugar".to_string(),
                    measurement_unit: "g".to_string(),
                },
            ]])
            .into_connection();
        let media = MediaService::new("target/test-media");
        let author = CurrentUser {
            id: 1,
            username: "chef".to_string(),
            is_staff: false,
        };

        let err = RecipeService::create_recipe(
            &db,
            &media,
            &author,
            payload(30, "aGk=", vec![line(1, 200), line(2, 50)], vec![]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::Empty(_)));
    }

    #[tokio::test]
    async fn missing_ingredient_reports_not_found() {
        // Catalog only knows ingredient 1
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![ingredient::Model {
                id: 1,
                name: "flour".to_string(),
                measurement_unit: "g".to_string(),
            }]])
            .into_connection();
        let media = MediaService::new("target/test-media");
        let author = CurrentUser {
            id: 1,
            username: "chef".to_string(),
            is_staff: false,
        };

        let err = RecipeService::create_recipe(
            &db,
            &media,
            &author,
            payload(30, "aGk=", vec![line(1, 200), line(99, 50)], vec![1]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn anonymous_viewer_gets_false_flags_without_queries() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let flags = RecipeService::membership_flags(&db, 42, None).await.unwrap();
        assert_eq!(flags, (false, false));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn replace_drops_old_lines_and_tags_before_inserting_new_ones() {
        // Queries, in order: fetch the recipe, ingredient existence, tag
        // existence, the UPDATE (returning), then the echo fetch. The two
        // delete_many and the two insert_many (composite keys fully set, so
        // no RETURNING) hit the exec queue.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row(7, 1)]])
            .append_query_results([vec![ingredient::Model {
                id: 1,
                name: "flour".to_string(),
                measurement_unit: "g".to_string(),
            }]])
            .append_query_results([vec![tag::Model {
                id: 1,
                name: "Breakfast".to_string(),
                color: "#88b04b".to_string(),
                slug: "breakfast".to_string(),
            }]])
            .append_query_results([vec![recipe_row(7, 1)]])
            .append_query_results([Vec::<recipe::Model>::new()])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let media = MediaService::new(std::env::temp_dir().join("recipes-replace-test"));
        let author = CurrentUser {
            id: 1,
            username: "chef".to_string(),
            is_staff: false,
        };

        // The echo fetch is given no rows; the write path has already
        // committed by then.
        let err = RecipeService::update_recipe(
            &db,
            &media,
            &author,
            7,
            payload(30, "aGk=", vec![line(1, 200)], vec![1]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        // A second replace never accumulates: the old lines and tag links
        // are cleared before the new ones land
        let log = format!("{:?}", db.into_transaction_log());
        let del_lines = log.find(r#"DELETE FROM \"recipe_ingredients\""#).unwrap();
        let del_tags = log.find(r#"DELETE FROM \"recipe_tags\""#).unwrap();
        let ins_lines = log.find(r#"INSERT INTO \"recipe_ingredients\""#).unwrap();
        let ins_tags = log.find(r#"INSERT INTO \"recipe_tags\""#).unwrap();
        assert!(del_lines < ins_lines);
        assert!(del_tags < ins_tags);
    }

    #[tokio::test]
    async fn non_author_cannot_replace() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_row(7, 2)]])
            .into_connection();
        let media = MediaService::new(std::env::temp_dir().join("recipes-replace-test"));
        let user = CurrentUser {
            id: 1,
            username: "guest".to_string(),
            is_staff: false,
        };

        let err = RecipeService::update_recipe(
            &db,
            &media,
            &user,
            7,
            payload(30, "aGk=", vec![line(1, 200)], vec![1]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}
