use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use tracing::{error, info, instrument};

use super::{json_body, path_id, query_params, service_error_to_response, ApiError, AppState};
use crate::models::{
    CreateOrderRequest, OrderListResponse, OrderResponse, OrderStatusQuery, StatusRoute,
    UpdateOrderStatusRequest,
};

/// Place a new order for a food item
#[instrument(name = "create_order", skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    let request = json_body(payload)?;

    let result = state.order_service.create_order(request).await;

    match result {
        Ok(order) => {
            state
                .metrics
                .record_order_operation("create", Some(order.status.as_str()), true);
            info!(order_id = order.id, food_id = order.food_id, "Order created");

            Ok(Json(OrderResponse {
                message: "Order created successfully".to_string(),
                order_id: order.id,
            }))
        }
        Err(err) => {
            state.metrics.record_order_operation("create", None, false);
            error!("Failed to create order: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Move an order to `Out for Delivery` or `Delivered`
#[instrument(name = "update_order_status", skip_all)]
pub async fn update_order_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    transition_order(state, path, payload, StatusRoute::Progress).await
}

/// Cancel an order
#[instrument(name = "cancel_order", skip_all)]
pub async fn cancel_order(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, ApiError> {
    transition_order(state, path, payload, StatusRoute::Cancel).await
}

async fn transition_order(
    state: AppState,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
    route: StatusRoute,
) -> Result<Json<OrderResponse>, ApiError> {
    let id = path_id(path)?;
    let request = json_body(payload)?;
    let operation = match route {
        StatusRoute::Progress => "update_status",
        StatusRoute::Cancel => "cancel",
    };

    match state.order_service.update_status(id, request, route).await {
        Ok(status) => {
            state
                .metrics
                .record_order_operation(operation, Some(status.as_str()), true);
            info!(order_id = id, status = %status, "Order status changed");

            Ok(Json(OrderResponse {
                message: route.success_message().to_string(),
                order_id: id,
            }))
        }
        Err(err) => {
            state.metrics.record_order_operation(operation, None, false);
            error!(order_id = id, "Failed to change order status: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List orders currently in the requested status
#[instrument(name = "list_orders", skip_all)]
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderStatusQuery>, QueryRejection>,
) -> Result<Json<OrderListResponse>, ApiError> {
    let query = query_params(query)?;
    let requested = query.status.clone();

    match state.order_service.list_orders(query).await {
        Ok(orders) => {
            state
                .metrics
                .record_order_operation("list", requested.as_deref(), true);
            info!("Successfully listed {} orders", orders.len());

            Ok(Json(OrderListResponse { orders }))
        }
        Err(err) => {
            state.metrics.record_order_operation("list", None, false);
            error!("Failed to list orders: {}", err);
            Err(service_error_to_response(err))
        }
    }
}
