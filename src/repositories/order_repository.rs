use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::map_sqlx_error;
use crate::models::{
    Order, OrderRow, OrderStatus, RepositoryError, RepositoryResult, StatusUpdate,
};
use crate::observability::DatabaseTracing;

const TABLE: &str = "orders";

/// Trait defining the interface for order data access operations
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order in the `Placed` state
    async fn create(&self, food_id: i64) -> RepositoryResult<Order>;

    /// All orders currently in the given status, ordered by id
    async fn find_by_status(&self, status: OrderStatus) -> RepositoryResult<Vec<Order>>;

    /// Set an order's status.
    ///
    /// With a non-empty `allowed_from` the write only happens when the stored status is
    /// one of those values; an empty list overwrites unconditionally.
    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        allowed_from: Vec<OrderStatus>,
    ) -> RepositoryResult<StatusUpdate>;
}

/// PostgreSQL implementation of the OrderRepository trait
#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
    tracing: DatabaseTracing,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool, tracing: DatabaseTracing) -> Self {
        Self { pool, tracing }
    }

    async fn current_status(&self, id: i64) -> RepositoryResult<Option<OrderStatus>> {
        let status: Option<String> = self
            .tracing
            .trace_operation(
                "select",
                TABLE,
                sqlx::query_scalar("SELECT status FROM orders WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        status
            .map(|raw| raw.parse().map_err(|message| RepositoryError::InvalidData { message }))
            .transpose()
    }
}

fn into_order(row: OrderRow) -> RepositoryResult<Order> {
    Order::try_from(row).map_err(|message| RepositoryError::InvalidData { message })
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[instrument(skip(self), fields(table = TABLE, food_id = food_id))]
    async fn create(&self, food_id: i64) -> RepositoryResult<Order> {
        let row = self
            .tracing
            .trace_operation(
                "insert",
                TABLE,
                sqlx::query_as::<_, OrderRow>(
                    "INSERT INTO orders (food_id, status) VALUES ($1, $2) \
                     RETURNING id, food_id, status",
                )
                .bind(food_id)
                .bind(OrderStatus::Placed.as_str())
                .fetch_one(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        let order = into_order(row)?;
        info!(id = order.id, "Order inserted");
        Ok(order)
    }

    #[instrument(skip(self), fields(table = TABLE, status = %status))]
    async fn find_by_status(&self, status: OrderStatus) -> RepositoryResult<Vec<Order>> {
        let rows = self
            .tracing
            .trace_operation(
                "select",
                TABLE,
                sqlx::query_as::<_, OrderRow>(
                    "SELECT id, food_id, status FROM orders WHERE status = $1 ORDER BY id",
                )
                .bind(status.as_str())
                .fetch_all(&self.pool),
            )
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(into_order).collect()
    }

    #[instrument(skip(self, allowed_from), fields(table = TABLE, id = id, status = %status))]
    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        allowed_from: Vec<OrderStatus>,
    ) -> RepositoryResult<StatusUpdate> {
        let outcome = if allowed_from.is_empty() {
            self.tracing
                .trace_operation(
                    "update",
                    TABLE,
                    sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                        .bind(status.as_str())
                        .bind(id)
                        .execute(&self.pool),
                )
                .await
        } else {
            let predecessors: Vec<&str> = allowed_from.iter().map(OrderStatus::as_str).collect();
            self.tracing
                .trace_operation(
                    "update",
                    TABLE,
                    sqlx::query(
                        "UPDATE orders SET status = $1 WHERE id = $2 AND status = ANY($3)",
                    )
                    .bind(status.as_str())
                    .bind(id)
                    .bind(predecessors)
                    .execute(&self.pool),
                )
                .await
        };
        let result = outcome.map_err(map_sqlx_error)?;

        if result.rows_affected() > 0 {
            return Ok(StatusUpdate::Updated);
        }
        if allowed_from.is_empty() {
            return Ok(StatusUpdate::NotFound);
        }

        match self.current_status(id).await? {
            None => Ok(StatusUpdate::NotFound),
            Some(current) => {
                warn!(current = %current, "Status transition rejected");
                Ok(StatusUpdate::Rejected { current })
            }
        }
    }
}
