#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use food_orders::{
    config::ServerConfig,
    create_app,
    models::{
        FoodFilters, FoodItem, FoodItemDraft, Order, OrderStatus, RepositoryError,
        RepositoryResult, StatusUpdate,
    },
    repositories::{FoodRepository, OrderRepository},
    services::{FoodService, OrderService},
    AppState, Metrics,
};

/// Food table kept in memory, ids assigned like a serial column
#[derive(Default)]
pub struct InMemoryFoodRepository {
    rows: Mutex<BTreeMap<i64, FoodItem>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl FoodRepository for InMemoryFoodRepository {
    async fn find_all(&self, filters: FoodFilters) -> RepositoryResult<Vec<FoodItem>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .filter(|food| food.matches_filters(&filters))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<FoodItem>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn create(&self, draft: FoodItemDraft) -> RepositoryResult<FoodItem> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let food = FoodItem::from_draft(id, draft);
        self.rows.lock().unwrap().insert(id, food.clone());
        Ok(food)
    }

    async fn update(&self, id: i64, draft: FoodItemDraft) -> RepositoryResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(row) => {
                *row = FoodItem::from_draft(id, draft);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}

/// Order table kept in memory, honouring the conditional status write
#[derive(Default)]
pub struct InMemoryOrderRepository {
    rows: Mutex<BTreeMap<i64, Order>>,
    next_id: Mutex<i64>,
}

impl InMemoryOrderRepository {
    pub fn status_of(&self, id: i64) -> Option<OrderStatus> {
        self.rows.lock().unwrap().get(&id).map(|order| order.status)
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, food_id: i64) -> RepositoryResult<Order> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let order = Order {
            id,
            food_id,
            status: OrderStatus::Placed,
        };
        self.rows.lock().unwrap().insert(id, order.clone());
        Ok(order)
    }

    async fn find_by_status(&self, status: OrderStatus) -> RepositoryResult<Vec<Order>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|order| order.status == status)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        allowed_from: Vec<OrderStatus>,
    ) -> RepositoryResult<StatusUpdate> {
        let mut rows = self.rows.lock().unwrap();
        let Some(order) = rows.get_mut(&id) else {
            return Ok(StatusUpdate::NotFound);
        };

        if !allowed_from.is_empty() && !allowed_from.contains(&order.status) {
            return Ok(StatusUpdate::Rejected {
                current: order.status,
            });
        }

        order.status = status;
        Ok(StatusUpdate::Updated)
    }
}

/// Food repository whose every call fails with the given error kind
pub struct FailingFoodRepository {
    pub unavailable: bool,
}

impl FailingFoodRepository {
    fn error(&self) -> RepositoryError {
        if self.unavailable {
            RepositoryError::Timeout
        } else {
            RepositoryError::Database {
                message: "relation \"foods\" does not exist".to_string(),
            }
        }
    }
}

#[async_trait]
impl FoodRepository for FailingFoodRepository {
    async fn find_all(&self, _filters: FoodFilters) -> RepositoryResult<Vec<FoodItem>> {
        Err(self.error())
    }

    async fn find_by_id(&self, _id: i64) -> RepositoryResult<Option<FoodItem>> {
        Err(self.error())
    }

    async fn create(&self, _draft: FoodItemDraft) -> RepositoryResult<FoodItem> {
        Err(self.error())
    }

    async fn update(&self, _id: i64, _draft: FoodItemDraft) -> RepositoryResult<bool> {
        Err(self.error())
    }

    async fn delete(&self, _id: i64) -> RepositoryResult<bool> {
        Err(self.error())
    }
}

/// Food repository that answers after a fixed delay, like a slow query
pub struct SlowFoodRepository {
    pub delay: Duration,
}

#[async_trait]
impl FoodRepository for SlowFoodRepository {
    async fn find_all(&self, _filters: FoodFilters) -> RepositoryResult<Vec<FoodItem>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: i64) -> RepositoryResult<Option<FoodItem>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn create(&self, draft: FoodItemDraft) -> RepositoryResult<FoodItem> {
        tokio::time::sleep(self.delay).await;
        Ok(FoodItem::from_draft(1, draft))
    }

    async fn update(&self, _id: i64, _draft: FoodItemDraft) -> RepositoryResult<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(false)
    }

    async fn delete(&self, _id: i64) -> RepositoryResult<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(false)
    }
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 3000,
        request_timeout_seconds: 5,
        max_request_size: 64 * 1024,
    }
}

pub struct TestEnvironment {
    pub app: Router,
    pub foods: Arc<InMemoryFoodRepository>,
    pub orders: Arc<InMemoryOrderRepository>,
    pub metrics: Arc<Metrics>,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self::with_transition_enforcement(true)
    }

    pub fn with_transition_enforcement(enforce: bool) -> Self {
        let foods = Arc::new(InMemoryFoodRepository::default());
        let orders = Arc::new(InMemoryOrderRepository::default());
        let metrics = Arc::new(Metrics::new().unwrap());

        let state = AppState {
            food_service: Arc::new(FoodService::new(foods.clone())),
            order_service: Arc::new(OrderService::new(orders.clone(), enforce)),
            metrics: metrics.clone(),
        };

        Self {
            app: create_app(state, &test_server_config()),
            foods,
            orders,
            metrics,
        }
    }

    /// App whose food routes hit a broken database
    pub fn with_failing_foods(unavailable: bool) -> Router {
        let metrics = Arc::new(Metrics::new().unwrap());
        let state = AppState {
            food_service: Arc::new(FoodService::new(Arc::new(FailingFoodRepository {
                unavailable,
            }))),
            order_service: Arc::new(OrderService::new(
                Arc::new(InMemoryOrderRepository::default()),
                true,
            )),
            metrics,
        };

        create_app(state, &test_server_config())
    }

    /// App whose food queries take `delay`, behind a `timeout_seconds` request timeout
    pub fn with_slow_foods(delay: Duration, timeout_seconds: u64) -> Router {
        let state = AppState {
            food_service: Arc::new(FoodService::new(Arc::new(SlowFoodRepository { delay }))),
            order_service: Arc::new(OrderService::new(
                Arc::new(InMemoryOrderRepository::default()),
                true,
            )),
            metrics: Arc::new(Metrics::new().unwrap()),
        };
        let server = ServerConfig {
            request_timeout_seconds: timeout_seconds,
            ..test_server_config()
        };

        create_app(state, &server)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.app, Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.app, Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.app, Method::PUT, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.app, Method::DELETE, uri, None).await
    }

    /// Create a food item and return its id
    pub async fn create_food(&self, name: &str, food_type: &str, minutes: i64, price: f64) -> i64 {
        let (status, body) = self
            .post(
                "/food",
                serde_json::json!({
                    "foodName": name,
                    "foodType": food_type,
                    "maxDeliveryTime": minutes,
                    "price": price,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
        body["id"].as_i64().unwrap()
    }

    /// Place an order and return its id
    pub async fn create_order(&self, food_id: i64) -> i64 {
        let (status, body) = self
            .post("/food/order", serde_json::json!({ "foodId": food_id }))
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
        body["orderId"].as_i64().unwrap()
    }
}

/// Send a request with an optional raw JSON body and decode the JSON response
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, value)
}
