use prometheus::{
    CounterVec, Encoder, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to register metric: {0}")]
    Registration(#[from] prometheus::Error),
    #[error("Failed to encode metrics: {0}")]
    Encoding(String),
}

/// Prometheus metrics for the food and order service
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,

    // HTTP metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub http_requests_in_flight: GaugeVec,

    // Database metrics
    pub database_operations_total: CounterVec,
    pub database_operation_duration_seconds: HistogramVec,
    pub database_connections_active: Gauge,
    pub database_connections_idle: Gauge,

    // Business metrics
    pub food_operations_total: CounterVec,
    pub order_operations_total: CounterVec,
}

impl Metrics {
    /// Create a new metrics instance with all required metrics registered
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        info!("Initializing Prometheus metrics");

        let http_requests_total = CounterVec::new(
            Opts::new(
                "http_requests_total",
                "Total number of HTTP requests processed",
            ),
            &["method", "endpoint", "status_code"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "endpoint"],
        )?;

        let http_requests_in_flight = GaugeVec::new(
            Opts::new(
                "http_requests_in_flight",
                "Number of HTTP requests currently being processed",
            ),
            &["method", "endpoint"],
        )?;

        let database_operations_total = CounterVec::new(
            Opts::new(
                "database_operations_total",
                "Total number of database operations",
            ),
            &["operation", "table", "status"],
        )?;

        let database_operation_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "database_operation_duration_seconds",
                "Database operation duration in seconds",
            )
            .buckets(vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ]),
            &["operation", "table"],
        )?;

        let database_connections_active = Gauge::new(
            "database_connections_active",
            "Number of pooled database connections in use",
        )?;

        let database_connections_idle = Gauge::new(
            "database_connections_idle",
            "Number of idle pooled database connections",
        )?;

        let food_operations_total = CounterVec::new(
            Opts::new(
                "food_operations_total",
                "Total number of food catalog operations",
            ),
            &["operation", "status"],
        )?;

        let order_operations_total = CounterVec::new(
            Opts::new("order_operations_total", "Total number of order operations"),
            &["operation", "order_status", "status"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(database_operations_total.clone()))?;
        registry.register(Box::new(database_operation_duration_seconds.clone()))?;
        registry.register(Box::new(database_connections_active.clone()))?;
        registry.register(Box::new(database_connections_idle.clone()))?;
        registry.register(Box::new(food_operations_total.clone()))?;
        registry.register(Box::new(order_operations_total.clone()))?;

        info!("Prometheus metrics initialized successfully");

        Ok(Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            database_operations_total,
            database_operation_duration_seconds,
            database_connections_active,
            database_connections_idle,
            food_operations_total,
            order_operations_total,
        })
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }

    /// Record HTTP request metrics
    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration_seconds: f64,
    ) {
        let status_str = status_code.to_string();

        self.http_requests_total
            .with_label_values(&[method, endpoint, &status_str])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, endpoint])
            .observe(duration_seconds);
    }

    /// Record database operation metrics
    pub fn record_database_operation(
        &self,
        operation: &str,
        table: &str,
        success: bool,
        duration_seconds: f64,
    ) {
        let status = if success { "success" } else { "error" };

        self.database_operations_total
            .with_label_values(&[operation, table, status])
            .inc();

        self.database_operation_duration_seconds
            .with_label_values(&[operation, table])
            .observe(duration_seconds);
    }

    /// Record food catalog operation metrics
    pub fn record_food_operation(&self, operation: &str, success: bool) {
        let status = if success { "success" } else { "error" };

        self.food_operations_total
            .with_label_values(&[operation, status])
            .inc();
    }

    /// Record order operation metrics
    pub fn record_order_operation(&self, operation: &str, order_status: Option<&str>, success: bool) {
        let order_status = order_status.unwrap_or("unknown");
        let status = if success { "success" } else { "error" };

        self.order_operations_total
            .with_label_values(&[operation, order_status, status])
            .inc();
    }

    /// Increment in-flight requests
    pub fn increment_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .inc();
    }

    /// Decrement in-flight requests
    pub fn decrement_in_flight(&self, method: &str, endpoint: &str) {
        self.http_requests_in_flight
            .with_label_values(&[method, endpoint])
            .dec();
    }

    /// Publish the connection pool's current size split
    pub fn set_pool_connections(&self, active: f64, idle: f64) {
        self.database_connections_active.set(active);
        self.database_connections_idle.set(idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.is_ok());
    }

    #[test]
    fn test_http_request_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_http_request("GET", "/food", 200, 0.123);
        metrics.record_http_request("POST", "/food", 400, 0.004);

        let metrics_text = metrics.encode().unwrap();
        assert!(metrics_text.contains("http_requests_total"));
        assert!(metrics_text.contains("http_request_duration_seconds"));
    }

    #[test]
    fn test_database_operation_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_database_operation("select", "foods", true, 0.050);
        metrics.record_database_operation("update", "orders", false, 0.100);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("database_operations_total"));
        assert!(encoded.contains("database_operation_duration_seconds"));
    }

    #[test]
    fn test_business_metrics_recording() {
        let metrics = Metrics::new().unwrap();

        metrics.record_food_operation("create", true);
        metrics.record_order_operation("update_status", Some("Delivered"), false);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("food_operations_total"));
        assert!(encoded.contains("order_operations_total"));
        assert!(encoded.contains("order_status=\"Delivered\""));
    }

    #[test]
    fn test_in_flight_requests() {
        let metrics = Metrics::new().unwrap();

        metrics.increment_in_flight("GET", "/food/orders");
        metrics.increment_in_flight("GET", "/food/orders");
        metrics.decrement_in_flight("GET", "/food/orders");

        let value = metrics
            .http_requests_in_flight
            .with_label_values(&["GET", "/food/orders"])
            .get();
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_pool_gauges() {
        let metrics = Metrics::new().unwrap();
        metrics.set_pool_connections(3.0, 7.0);

        assert_eq!(metrics.database_connections_active.get(), 3.0);
        assert_eq!(metrics.database_connections_idle.get(), 7.0);
    }
}
