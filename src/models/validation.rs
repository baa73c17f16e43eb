use rust_decimal::Decimal;

use super::{CreateOrderRequest, FoodItemRequest, ValidationError, ValidationResult};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MAX_FOOD_NAME_LENGTH: usize = 200;
pub const MAX_FOOD_TYPE_LENGTH: usize = 100;
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01
pub const MAX_PRICE: Decimal = Decimal::from_parts(99999999, 0, 0, false, 2); // 999999.99
pub const MIN_DELIVERY_TIME_MINUTES: i32 = 1;

impl Validate for FoodItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        // Absent, null, empty and zero are all "missing", reported together.
        let mut missing = Vec::new();
        if is_blank(&self.food_name) {
            missing.push("foodName".to_string());
        }
        if is_blank(&self.food_type) {
            missing.push("foodType".to_string());
        }
        if self.max_delivery_time.unwrap_or(0) == 0 {
            missing.push("maxDeliveryTime".to_string());
        }
        if self.price.map_or(true, |price| price.is_zero()) {
            missing.push("price".to_string());
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        if let Some(name) = &self.food_name {
            validate_text_field("foodName", name, MAX_FOOD_NAME_LENGTH)?;
        }
        if let Some(food_type) = &self.food_type {
            validate_text_field("foodType", food_type, MAX_FOOD_TYPE_LENGTH)?;
        }
        if let Some(minutes) = self.max_delivery_time {
            validate_delivery_time(minutes)?;
        }
        if let Some(price) = &self.price {
            validate_food_price(price)?;
        }
        Ok(())
    }
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> ValidationResult<()> {
        match self.food_id {
            None | Some(0) => Err(ValidationError::RequiredField {
                field: "foodId".to_string(),
            }),
            Some(food_id) => validate_food_id(food_id),
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Validate a free-text food field
pub fn validate_text_field(field: &str, value: &str, max_length: usize) -> ValidationResult<()> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }

    if trimmed.chars().count() > max_length {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length,
            actual_length: trimmed.chars().count(),
        });
    }

    if trimmed
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate the delivery time upper bound, in minutes
pub fn validate_delivery_time(minutes: i32) -> ValidationResult<()> {
    if minutes < MIN_DELIVERY_TIME_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "maxDeliveryTime".to_string(),
            min: MIN_DELIVERY_TIME_MINUTES.to_string(),
            max: i32::MAX.to_string(),
            value: minutes.to_string(),
        });
    }

    Ok(())
}

/// Validate food price
pub fn validate_food_price(price: &Decimal) -> ValidationResult<()> {
    if *price < MIN_PRICE || *price > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: MIN_PRICE.to_string(),
            max: MAX_PRICE.to_string(),
            value: price.to_string(),
        });
    }

    if price.normalize().scale() > 2 {
        return Err(ValidationError::InvalidValue {
            field: "price".to_string(),
            value: price.to_string(),
            reason: "Price cannot have more than 2 decimal places".to_string(),
        });
    }

    Ok(())
}

/// Validate an order's food reference
pub fn validate_food_id(food_id: i64) -> ValidationResult<()> {
    if food_id <= 0 {
        return Err(ValidationError::OutOfRange {
            field: "foodId".to_string(),
            min: "1".to_string(),
            max: i64::MAX.to_string(),
            value: food_id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_request() -> FoodItemRequest {
        FoodItemRequest {
            food_name: Some("Pad Thai".to_string()),
            food_type: Some("thai".to_string()),
            max_delivery_time: Some(45),
            price: Some(dec!(12.50)),
        }
    }

    #[test]
    fn test_valid_food_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_falsy_fields_are_missing() {
        let cases = [
            FoodItemRequest {
                food_name: None,
                ..valid_request()
            },
            FoodItemRequest {
                food_type: Some(String::new()),
                ..valid_request()
            },
            FoodItemRequest {
                max_delivery_time: Some(0),
                ..valid_request()
            },
            FoodItemRequest {
                price: Some(dec!(0)),
                ..valid_request()
            },
        ];

        for request in cases {
            let err = request.validate().unwrap_err();
            assert_eq!(err.to_string(), "Missing required fields");
        }
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let err = FoodItemRequest::default().validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                fields: vec![
                    "foodName".to_string(),
                    "foodType".to_string(),
                    "maxDeliveryTime".to_string(),
                    "price".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_validate_text_field() {
        assert!(validate_text_field("foodName", "Sushi", MAX_FOOD_NAME_LENGTH).is_ok());
        assert!(validate_text_field("foodName", "   ", MAX_FOOD_NAME_LENGTH).is_err());
        assert!(validate_text_field("foodName", &"a".repeat(201), MAX_FOOD_NAME_LENGTH).is_err());
        assert!(validate_text_field("foodName", "bad\u{0007}name", MAX_FOOD_NAME_LENGTH).is_err());
    }

    #[test]
    fn test_validate_delivery_time() {
        assert!(validate_delivery_time(1).is_ok());
        assert!(validate_delivery_time(90).is_ok());
        assert!(validate_delivery_time(-5).is_err());
    }

    #[test]
    fn test_validate_food_price() {
        assert!(validate_food_price(&dec!(9.99)).is_ok());
        assert!(validate_food_price(&dec!(10.50)).is_ok());
        assert!(validate_food_price(&dec!(-1.00)).is_err());
        assert!(validate_food_price(&dec!(1000000.00)).is_err());
        assert!(validate_food_price(&dec!(9.999)).is_err());
    }

    #[test]
    fn test_negative_values_are_out_of_range() {
        let request = FoodItemRequest {
            max_delivery_time: Some(-10),
            ..valid_request()
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));

        let request = FoodItemRequest {
            price: Some(dec!(-3.50)),
            ..valid_request()
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_food_id() {
        assert!(validate_food_id(1).is_ok());
        assert!(validate_food_id(-1).is_err());
    }
}
