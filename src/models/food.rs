use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use super::{Validate, ValidationError, ValidationResult};

/// Catalog row as stored in the `foods` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: i64,
    pub food_name: String,
    pub food_type: String,
    /// Minutes
    pub max_delivery_time: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Body of `POST /food` and `PUT /food/:id`
///
/// Every field is optional at the wire level so that absent, null and falsy
/// values all surface as the same "missing required fields" validation error
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemRequest {
    pub food_name: Option<String>,
    pub food_type: Option<String>,
    #[serde(default, deserialize_with = "whole_minutes")]
    pub max_delivery_time: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

/// Accept any JSON number holding a whole count of minutes, so `30` and `30.0` agree
fn whole_minutes<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(minutes) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if minutes.fract() == 0.0 && minutes >= f64::from(i32::MIN) && minutes <= f64::from(i32::MAX) {
        Ok(Some(minutes as i32))
    } else {
        Err(de::Error::custom(format!(
            "maxDeliveryTime must be a whole number of minutes, got {}",
            minutes
        )))
    }
}

/// Validated food fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct FoodItemDraft {
    pub food_name: String,
    pub food_type: String,
    pub max_delivery_time: i32,
    pub price: Decimal,
}

/// Filters for `GET /food`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodFilters {
    pub food_type: Option<String>,
    pub max_delivery_time: Option<i32>,
}

/// `{ message, id }` returned on creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodCreatedResponse {
    pub message: String,
    pub id: i64,
}

/// `{ message }` returned on update and delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl FoodItem {
    /// Build the stored representation of a draft once the database assigned an id
    pub fn from_draft(id: i64, draft: FoodItemDraft) -> Self {
        Self {
            id,
            food_name: draft.food_name,
            food_type: draft.food_type,
            max_delivery_time: draft.max_delivery_time,
            price: draft.price,
        }
    }

    /// Check if the food matches the given filters
    pub fn matches_filters(&self, filters: &FoodFilters) -> bool {
        if let Some(food_type) = &filters.food_type {
            if &self.food_type != food_type {
                return false;
            }
        }

        if let Some(max_delivery_time) = filters.max_delivery_time {
            if self.max_delivery_time > max_delivery_time {
                return false;
            }
        }

        true
    }
}

impl TryFrom<FoodItemRequest> for FoodItemDraft {
    type Error = ValidationError;

    fn try_from(request: FoodItemRequest) -> ValidationResult<Self> {
        request.validate()?;

        match (
            request.food_name,
            request.food_type,
            request.max_delivery_time,
            request.price,
        ) {
            (Some(food_name), Some(food_type), Some(max_delivery_time), Some(price)) => Ok(Self {
                food_name: food_name.trim().to_string(),
                food_type: food_type.trim().to_string(),
                max_delivery_time,
                price,
            }),
            _ => Err(ValidationError::MissingFields { fields: Vec::new() }),
        }
    }
}

impl FoodFilters {
    pub fn by_type(food_type: impl Into<String>) -> Self {
        Self {
            food_type: Some(food_type.into()),
            max_delivery_time: None,
        }
    }

    pub fn with_max_delivery_time(mut self, minutes: i32) -> Self {
        self.max_delivery_time = Some(minutes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.food_type.is_none() && self.max_delivery_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn create_test_request() -> FoodItemRequest {
        FoodItemRequest {
            food_name: Some("Pizza".to_string()),
            food_type: Some("fast-food".to_string()),
            max_delivery_time: Some(30),
            price: Some(dec!(9.99)),
        }
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: FoodItemRequest = serde_json::from_str(
            r#"{"foodName":"Pizza","foodType":"fast-food","maxDeliveryTime":30,"price":9.99}"#,
        )
        .unwrap();

        assert_eq!(request, create_test_request());
    }

    #[test]
    fn test_request_tolerates_missing_and_null_fields() {
        let request: FoodItemRequest =
            serde_json::from_str(r#"{"foodName":null,"maxDeliveryTime":30}"#).unwrap();

        assert_eq!(request.food_name, None);
        assert_eq!(request.food_type, None);
        assert_eq!(request.max_delivery_time, Some(30));
        assert_eq!(request.price, None);
    }

    #[test]
    fn test_delivery_time_accepts_integral_floats() {
        let request: FoodItemRequest =
            serde_json::from_str(r#"{"maxDeliveryTime":30.0}"#).unwrap();
        assert_eq!(request.max_delivery_time, Some(30));

        assert!(serde_json::from_str::<FoodItemRequest>(r#"{"maxDeliveryTime":30.5}"#).is_err());
        assert!(serde_json::from_str::<FoodItemRequest>(r#"{"maxDeliveryTime":1e12}"#).is_err());
        assert!(serde_json::from_str::<FoodItemRequest>(r#"{"maxDeliveryTime":"30"}"#).is_err());
    }

    #[test]
    fn test_food_item_serializes_price_as_number() {
        let food = FoodItem::from_draft(
            7,
            FoodItemDraft::try_from(create_test_request()).unwrap(),
        );
        let json = serde_json::to_value(&food).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["foodName"], "Pizza");
        assert_eq!(json["foodType"], "fast-food");
        assert_eq!(json["maxDeliveryTime"], 30);
        assert_eq!(json["price"], 9.99);
    }

    #[test]
    fn test_draft_trims_text_fields() {
        let mut request = create_test_request();
        request.food_name = Some("  Pizza ".to_string());

        let draft = FoodItemDraft::try_from(request).unwrap();
        assert_eq!(draft.food_name, "Pizza");
    }

    #[test]
    fn test_matches_filters() {
        let food = FoodItem::from_draft(
            1,
            FoodItemDraft::try_from(create_test_request()).unwrap(),
        );

        assert!(food.matches_filters(&FoodFilters::default()));
        assert!(food.matches_filters(&FoodFilters::by_type("fast-food")));
        assert!(!food.matches_filters(&FoodFilters::by_type("dessert")));
        assert!(food.matches_filters(&FoodFilters::by_type("fast-food").with_max_delivery_time(30)));
        assert!(!food.matches_filters(&FoodFilters::by_type("fast-food").with_max_delivery_time(20)));
    }
}
