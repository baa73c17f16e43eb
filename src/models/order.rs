use serde::{Deserialize, Serialize};

use super::{OrderStatus, StatusRoute, Validate, ValidationError, ValidationResult};

/// Order row as stored in the `orders` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub food_id: i64,
    pub status: OrderStatus,
}

/// Raw `orders` row; `status` is parsed into [`OrderStatus`] on conversion
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub food_id: i64,
    pub status: String,
}

/// Body of `POST /food/order`
///
/// Any `status` the client sends is ignored; new orders always start as `Placed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub food_id: Option<i64>,
}

/// Body of the two status endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: Option<String>,
}

/// Query of `GET /food/orders`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusQuery {
    pub status: Option<String>,
}

/// `{ message, orderId }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub message: String,
    pub order_id: i64,
}

/// `{ orders }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
}

/// Outcome of a conditional status write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Updated,
    NotFound,
    /// The row exists but its current status is not an allowed predecessor
    Rejected { current: OrderStatus },
}

impl TryFrom<OrderRow> for Order {
    type Error = String;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            food_id: row.food_id,
            status: row.status.parse()?,
        })
    }
}

impl CreateOrderRequest {
    /// The validated food id
    pub fn food_id(&self) -> ValidationResult<i64> {
        self.validate()?;
        self.food_id.ok_or_else(|| ValidationError::RequiredField {
            field: "foodId".to_string(),
        })
    }
}

impl UpdateOrderStatusRequest {
    /// Parse the requested status and check it against the endpoint's whitelist
    pub fn target_status(&self, route: StatusRoute) -> ValidationResult<OrderStatus> {
        let raw = self.status.as_deref().unwrap_or_default();
        let invalid = || ValidationError::InvalidStatus {
            value: raw.to_string(),
        };

        let status: OrderStatus = raw.parse().map_err(|_| invalid())?;
        if route.accepted().contains(&status) {
            Ok(status)
        } else {
            Err(invalid())
        }
    }
}

impl OrderStatusQuery {
    pub fn status(&self) -> ValidationResult<OrderStatus> {
        let raw = self.status.as_deref().unwrap_or_default();
        raw.parse().map_err(|_| ValidationError::InvalidStatus {
            value: raw.to_string(),
        })
    }
}
