use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::map_sqlx_error;
use crate::models::{FoodFilters, FoodItem, FoodItemDraft, RepositoryResult};
use crate::observability::DatabaseTracing;

const TABLE: &str = "foods";

/// Trait defining the interface for food data access operations
#[async_trait]
pub trait FoodRepository: Send + Sync {
    /// Find all foods matching the filters, ordered by id
    async fn find_all(&self, filters: FoodFilters) -> RepositoryResult<Vec<FoodItem>>;

    /// Find a food by its ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<FoodItem>>;

    /// Insert a new food item and return it with its generated id
    async fn create(&self, draft: FoodItemDraft) -> RepositoryResult<FoodItem>;

    /// Overwrite all fields of an existing food item. Returns false when no row matched.
    async fn update(&self, id: i64, draft: FoodItemDraft) -> RepositoryResult<bool>;

    /// Delete a food item. Returns false when no row matched.
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// PostgreSQL implementation of the FoodRepository trait
#[derive(Clone)]
pub struct PostgresFoodRepository {
    pool: PgPool,
    tracing: DatabaseTracing,
}

impl PostgresFoodRepository {
    pub fn new(pool: PgPool, tracing: DatabaseTracing) -> Self {
        Self { pool, tracing }
    }
}

#[async_trait]
impl FoodRepository for PostgresFoodRepository {
    #[instrument(skip(self), fields(table = TABLE))]
    async fn find_all(&self, filters: FoodFilters) -> RepositoryResult<Vec<FoodItem>> {
        info!("Finding foods with filters");

        let foods = self
            .tracing
            .trace_operation(
                "select",
                TABLE,
                sqlx::query_as::<_, FoodItem>(
                    "SELECT id, food_name, food_type, max_delivery_time, price FROM foods \
                     WHERE ($1::TEXT IS NULL OR food_type = $1) \
                     AND ($2::INTEGER IS NULL OR max_delivery_time <= $2) \
                     ORDER BY id",
                )
                .bind(filters.food_type)
                .bind(filters.max_delivery_time)
                .fetch_all(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        info!(count = foods.len(), "Found foods");
        Ok(foods)
    }

    #[instrument(skip(self), fields(table = TABLE, id = id))]
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<FoodItem>> {
        self.tracing
            .trace_operation(
                "select",
                TABLE,
                sqlx::query_as::<_, FoodItem>(
                    "SELECT id, food_name, food_type, max_delivery_time, price FROM foods \
                     WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)
    }

    #[instrument(skip(self, draft), fields(table = TABLE, food_name = %draft.food_name))]
    async fn create(&self, draft: FoodItemDraft) -> RepositoryResult<FoodItem> {
        let food = self
            .tracing
            .trace_operation(
                "insert",
                TABLE,
                sqlx::query_as::<_, FoodItem>(
                    "INSERT INTO foods (food_name, food_type, max_delivery_time, price) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING id, food_name, food_type, max_delivery_time, price",
                )
                .bind(&draft.food_name)
                .bind(&draft.food_type)
                .bind(draft.max_delivery_time)
                .bind(draft.price)
                .fetch_one(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        info!(id = food.id, "Food item inserted");
        Ok(food)
    }

    #[instrument(skip(self, draft), fields(table = TABLE, id = id))]
    async fn update(&self, id: i64, draft: FoodItemDraft) -> RepositoryResult<bool> {
        let result = self
            .tracing
            .trace_operation(
                "update",
                TABLE,
                sqlx::query(
                    "UPDATE foods SET food_name = $1, food_type = $2, \
                     max_delivery_time = $3, price = $4 WHERE id = $5",
                )
                .bind(&draft.food_name)
                .bind(&draft.food_type)
                .bind(draft.max_delivery_time)
                .bind(draft.price)
                .bind(id)
                .execute(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(table = TABLE, id = id))]
    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = self
            .tracing
            .trace_operation(
                "delete",
                TABLE,
                sqlx::query("DELETE FROM foods WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
