use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle states of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Placed")]
    Placed,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    /// Literal stored in the `orders.status` column and used on the wire
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Placed",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// States an order may be in immediately before moving to `self`
    pub fn predecessors(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Placed => &[],
            OrderStatus::OutForDelivery => &[OrderStatus::Placed],
            OrderStatus::Delivered => &[OrderStatus::OutForDelivery],
            OrderStatus::Cancelled => &[OrderStatus::Placed],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    // Matching is exact: "delivered" is not a status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Placed" => Ok(OrderStatus::Placed),
            "Out for Delivery" => Ok(OrderStatus::OutForDelivery),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

/// Which status endpoint a transition request arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRoute {
    /// `PUT /food/order/:id`
    Progress,
    /// `PUT /food/order/cancelled/:id`
    Cancel,
}

impl StatusRoute {
    /// Target statuses each endpoint accepts
    pub fn accepted(&self) -> &'static [OrderStatus] {
        match self {
            StatusRoute::Progress => &[OrderStatus::OutForDelivery, OrderStatus::Delivered],
            StatusRoute::Cancel => &[OrderStatus::Cancelled],
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            StatusRoute::Progress => "Order updated successfully",
            StatusRoute::Cancel => "Order cancelled successfully",
        }
    }
}

impl fmt::Display for StatusRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusRoute::Progress => write!(f, "progress"),
            StatusRoute::Cancel => write!(f, "cancel"),
        }
    }
}
