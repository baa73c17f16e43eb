pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::handlers::{
    cancel_order, create_food, create_order, delete_food, get_food, handle_middleware_error,
    health_check, list_foods, list_orders, method_not_allowed, metrics_handler,
    request_validation_middleware, route_not_found, security_headers_middleware, update_food,
    update_order_status,
};
use crate::observability::observability_middleware;

pub use config::{Config, ConfigError};
pub use handlers::AppState;
pub use observability::{init_observability, shutdown_observability, Metrics};

/// Build the application router with every route and middleware layer
pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    let metrics_for_middleware = state.metrics.clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route(
            "/health/status",
            get(health_check).fallback(method_not_allowed),
        )
        .route("/metrics", get(metrics_handler).fallback(method_not_allowed))
        // Food catalog
        .route(
            "/food",
            get(list_foods)
                .post(create_food)
                .fallback(method_not_allowed),
        )
        .route(
            "/food/:id",
            get(get_food)
                .put(update_food)
                .delete(delete_food)
                .fallback(method_not_allowed),
        )
        // Orders
        .route(
            "/food/order",
            post(create_order).fallback(method_not_allowed),
        )
        .route(
            "/food/order/:id",
            put(update_order_status).fallback(method_not_allowed),
        )
        .route(
            "/food/order/cancelled/:id",
            put(cancel_order).fallback(method_not_allowed),
        )
        .route("/food/orders", get(list_orders).fallback(method_not_allowed))
        .fallback(route_not_found)
        .with_state(state)
        // Each layer wraps the ones added before it
        .layer(DefaultBodyLimit::max(server.max_request_size))
        .layer(middleware::from_fn_with_state(
            server.max_request_size,
            request_validation_middleware,
        ))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
