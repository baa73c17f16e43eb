use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    FoodFilters, FoodItem, FoodItemDraft, FoodItemRequest, ServiceError, ServiceResult,
};
use crate::repositories::FoodRepository;

/// Service for managing the food catalog
pub struct FoodService {
    repository: Arc<dyn FoodRepository>,
}

impl FoodService {
    /// Create a new FoodService
    pub fn new(repository: Arc<dyn FoodRepository>) -> Self {
        Self { repository }
    }

    /// List foods, optionally narrowed by type and maximum delivery time
    #[instrument(skip(self), fields(filters = ?filters))]
    pub async fn list_foods(&self, filters: FoodFilters) -> ServiceResult<Vec<FoodItem>> {
        crate::info_with_trace!("Listing foods with filters");

        // A blank `type=` behaves like no type filter at all
        let filters = FoodFilters {
            food_type: filters
                .food_type
                .map(|food_type| food_type.trim().to_string())
                .filter(|food_type| !food_type.is_empty()),
            ..filters
        };

        let foods = self.repository.find_all(filters).await?;

        crate::info_with_trace!("Found {} foods matching criteria", foods.len());
        Ok(foods)
    }

    /// Get a specific food by ID
    #[instrument(skip(self), fields(id = id))]
    pub async fn get_food(&self, id: i64) -> ServiceResult<FoodItem> {
        crate::info_with_trace!("Retrieving food details");

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::FoodNotFound { id })
    }

    /// Validate and insert a new food item
    #[instrument(skip(self, request))]
    pub async fn create_food(&self, request: FoodItemRequest) -> ServiceResult<FoodItem> {
        let draft = FoodItemDraft::try_from(request)?;

        crate::info_with_trace!(food_name = %draft.food_name, "Creating food item");
        let food = self.repository.create(draft).await?;

        crate::info_with_trace!(id = food.id, "Food item created");
        Ok(food)
    }

    /// Validate the request and overwrite every field of an existing food item
    #[instrument(skip(self, request), fields(id = id))]
    pub async fn update_food(&self, id: i64, request: FoodItemRequest) -> ServiceResult<()> {
        let draft = FoodItemDraft::try_from(request)?;

        if !self.repository.update(id, draft).await? {
            crate::warn_with_trace!("Food item to update does not exist");
            return Err(ServiceError::FoodNotFound { id });
        }

        crate::info_with_trace!("Food item updated");
        Ok(())
    }

    /// Remove a food item
    #[instrument(skip(self), fields(id = id))]
    pub async fn delete_food(&self, id: i64) -> ServiceResult<()> {
        if !self.repository.delete(id).await? {
            crate::warn_with_trace!("Food item to delete does not exist");
            return Err(ServiceError::FoodNotFound { id });
        }

        crate::info_with_trace!("Food item deleted");
        Ok(())
    }
}
