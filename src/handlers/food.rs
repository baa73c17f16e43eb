use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info, instrument};

use super::{
    error_response, json_body, path_id, query_params, service_error_to_response, ApiError,
    AppState,
};
use crate::models::{
    FoodCreatedResponse, FoodFilters, FoodItem, FoodItemRequest, MessageResponse,
};

/// Query parameters for listing foods
#[derive(Debug, Default, Deserialize)]
pub struct ListFoodsQuery {
    #[serde(rename = "type")]
    pub food_type: Option<String>,
    #[serde(rename = "maxdeliverytime", alias = "maxDeliveryTime")]
    pub max_delivery_time: Option<String>,
}

/// List all foods with optional filters
#[instrument(name = "list_foods", skip_all)]
pub async fn list_foods(
    State(state): State<AppState>,
    query: Result<Query<ListFoodsQuery>, QueryRejection>,
) -> Result<Json<Vec<FoodItem>>, ApiError> {
    let filters = query_to_filters(query_params(query)?).map_err(|err| {
        error!("Invalid query parameters: {}", err);
        error_response(StatusCode::BAD_REQUEST, err)
    })?;

    info!(
        food_type = filters.food_type.as_deref(),
        max_delivery_time = filters.max_delivery_time,
        "Listing foods with filters"
    );

    let result = state.food_service.list_foods(filters).await;
    state.metrics.record_food_operation("list", result.is_ok());

    match result {
        Ok(foods) => {
            info!("Successfully listed {} foods", foods.len());
            Ok(Json(foods))
        }
        Err(err) => {
            error!("Failed to list foods: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Get a specific food by ID
#[instrument(name = "get_food", skip_all)]
pub async fn get_food(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<FoodItem>, ApiError> {
    let id = path_id(path)?;

    let result = state.food_service.get_food(id).await;
    state.metrics.record_food_operation("get", result.is_ok());

    result.map(Json).map_err(|err| {
        info!("Food lookup failed: {}", err);
        service_error_to_response(err)
    })
}

/// Create a new food item
#[instrument(name = "create_food", skip_all)]
pub async fn create_food(
    State(state): State<AppState>,
    payload: Result<Json<FoodItemRequest>, JsonRejection>,
) -> Result<Json<FoodCreatedResponse>, ApiError> {
    let request = json_body(payload)?;

    let result = state.food_service.create_food(request).await;
    state.metrics.record_food_operation("create", result.is_ok());

    match result {
        Ok(food) => {
            info!(id = food.id, "Food item created");
            Ok(Json(FoodCreatedResponse {
                message: "Food item created".to_string(),
                id: food.id,
            }))
        }
        Err(err) => {
            error!("Failed to create food: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Replace all fields of an existing food item
#[instrument(name = "update_food", skip_all)]
pub async fn update_food(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<FoodItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path)?;
    let request = json_body(payload)?;

    let result = state.food_service.update_food(id, request).await;
    state.metrics.record_food_operation("update", result.is_ok());

    match result {
        Ok(()) => Ok(Json(MessageResponse::new("Food item updated successfully"))),
        Err(err) => {
            error!(id = id, "Failed to update food: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Delete a food item
#[instrument(name = "delete_food", skip_all)]
pub async fn delete_food(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(path)?;

    let result = state.food_service.delete_food(id).await;
    state.metrics.record_food_operation("delete", result.is_ok());

    match result {
        Ok(()) => Ok(Json(MessageResponse::new("Food item deleted successfully"))),
        Err(err) => {
            error!(id = id, "Failed to delete food: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Convert query parameters to filters. Blank values count as absent.
fn query_to_filters(query: ListFoodsQuery) -> Result<FoodFilters, String> {
    let max_delivery_time = match query
        .max_delivery_time
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(value) => Some(
            value
                .parse::<i32>()
                .map_err(|_| format!("Invalid maxdeliverytime: {}", value))?,
        ),
        None => None,
    };

    Ok(FoodFilters {
        food_type: query.food_type,
        max_delivery_time,
    })
}
