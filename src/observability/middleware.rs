use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::{future::Future, sync::Arc, time::Instant};
use tracing::{error, info, instrument, warn, Instrument};
use uuid::Uuid;

use super::Metrics;

/// Middleware for automatic request tracing and metrics collection
#[instrument(skip_all, fields(
    request_id = %Uuid::new_v4(),
    method = %request.method(),
    uri = %request.uri(),
))]
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    // Group by route template so `/food/17` and `/food/18` share a series
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    metrics.increment_in_flight(&method, &endpoint);

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());
    metrics.decrement_in_flight(&method, &endpoint);

    if status_code >= 500 {
        error!(
            status_code = status_code,
            endpoint = %endpoint,
            duration_ms = duration.as_millis(),
            "Request failed"
        );
    } else if status_code >= 400 {
        warn!(
            status_code = status_code,
            endpoint = %endpoint,
            duration_ms = duration.as_millis(),
            "Request rejected"
        );
    } else {
        info!(
            status_code = status_code,
            endpoint = %endpoint,
            duration_ms = duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

/// Times repository calls, wraps them in a `db` span and records their outcome
#[derive(Clone)]
pub struct DatabaseTracing {
    metrics: Arc<Metrics>,
}

impl DatabaseTracing {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    /// Trace a database operation with automatic metrics recording
    pub async fn trace_operation<F, T, E>(
        &self,
        operation: &str,
        table: &str,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let span = tracing::info_span!(
            "db",
            otel.kind = "client",
            db.system = "postgresql",
            db.operation = operation,
            db.sql.table = table,
        );

        let start_time = Instant::now();
        let result = future.instrument(span).await;
        let duration = start_time.elapsed();

        match &result {
            Ok(_) => {
                self.metrics
                    .record_database_operation(operation, table, true, duration.as_secs_f64());
            }
            Err(error) => {
                self.metrics
                    .record_database_operation(operation, table, false, duration.as_secs_f64());

                error!(
                    error = %error,
                    operation = operation,
                    table = table,
                    duration_ms = duration.as_millis(),
                    "Database operation failed"
                );
            }
        }

        result
    }
}
