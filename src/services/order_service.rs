use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    CreateOrderRequest, Order, OrderStatus, OrderStatusQuery, ServiceError, ServiceResult,
    StatusRoute, StatusUpdate, UpdateOrderStatusRequest,
};
use crate::repositories::OrderRepository;

/// Service for the order lifecycle
pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    enforce_transitions: bool,
}

impl OrderService {
    /// Create a new OrderService.
    ///
    /// When `enforce_transitions` is false a status endpoint overwrites whatever state the
    /// order is in, as long as the target is on that endpoint's whitelist.
    pub fn new(repository: Arc<dyn OrderRepository>, enforce_transitions: bool) -> Self {
        Self {
            repository,
            enforce_transitions,
        }
    }

    /// Place a new order. Any status supplied by the client is ignored.
    #[instrument(skip(self, request), fields(food_id = ?request.food_id))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        let food_id = request.food_id()?;

        let order = self.repository.create(food_id).await?;

        crate::info_with_trace!(order_id = order.id, "Order placed");
        Ok(order)
    }

    /// Move an order to the status named in the request, through the given endpoint
    #[instrument(skip(self, request), fields(id = id, route = %route))]
    pub async fn update_status(
        &self,
        id: i64,
        request: UpdateOrderStatusRequest,
        route: StatusRoute,
    ) -> ServiceResult<OrderStatus> {
        let target = request.target_status(route)?;

        let allowed_from = if self.enforce_transitions {
            target.predecessors().to_vec()
        } else {
            Vec::new()
        };

        match self
            .repository
            .update_status(id, target, allowed_from)
            .await?
        {
            StatusUpdate::Updated => {
                crate::info_with_trace!(status = %target, "Order status updated");
                Ok(target)
            }
            StatusUpdate::NotFound => {
                crate::warn_with_trace!("Order to update does not exist");
                Err(ServiceError::OrderNotFound { id })
            }
            StatusUpdate::Rejected { current } => {
                crate::warn_with_trace!(from = %current, to = %target, "Order status transition rejected");
                Err(ServiceError::InvalidTransition {
                    id,
                    from: current,
                    to: target,
                })
            }
        }
    }

    /// List the orders currently in the queried status
    #[instrument(skip(self), fields(status = ?query.status))]
    pub async fn list_orders(&self, query: OrderStatusQuery) -> ServiceResult<Vec<Order>> {
        let status = query.status()?;

        let orders = self.repository.find_by_status(status).await?;

        crate::info_with_trace!("Found {} orders with status {}", orders.len(), status);
        Ok(orders)
    }
}
