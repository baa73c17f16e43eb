use anyhow::Context;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{info, warn};

use food_orders::{
    create_app, init_observability,
    observability::{DatabaseTracing, Metrics},
    repositories::{connect_pool, PostgresFoodRepository, PostgresOrderRepository},
    services::{FoodService, OrderService},
    shutdown_observability, AppState, Config,
};

const POOL_GAUGE_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment().context("Failed to load configuration")?;
    println!("Configuration loaded successfully");

    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        config.observability.otlp_endpoint.as_deref(),
        &config.observability.log_level,
        config.observability.enable_json_logging,
    )?;

    info!("Starting food-orders service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!(
        "Database: {}:{}/{}",
        config.database.host, config.database.port, config.database.name
    );

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    let pool = connect_pool(&config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("Database pool initialized successfully");

    let db_tracing = DatabaseTracing::new(metrics.clone());
    let food_repository = Arc::new(PostgresFoodRepository::new(
        pool.clone(),
        db_tracing.clone(),
    ));
    let order_repository = Arc::new(PostgresOrderRepository::new(pool.clone(), db_tracing));
    info!("Repositories initialized successfully");

    let state = AppState {
        food_service: Arc::new(FoodService::new(food_repository)),
        order_service: Arc::new(OrderService::new(
            order_repository,
            config.orders.enforce_status_transitions,
        )),
        metrics: metrics.clone(),
    };
    info!(
        enforce_status_transitions = config.orders.enforce_status_transitions,
        "Services initialized successfully"
    );

    // Publish pool occupancy for the lifetime of the server
    let gauge_pool = pool.clone();
    let gauge_metrics = metrics.clone();
    let pool_gauges = tokio::spawn(async move {
        let mut interval = tokio::time::interval(POOL_GAUGE_INTERVAL);
        loop {
            interval.tick().await;
            let idle = gauge_pool.num_idle() as u32;
            let active = gauge_pool.size().saturating_sub(idle);
            gauge_metrics.set_pool_connections(active as f64, idle as f64);
        }
    });

    let app = create_app(state, &config.server);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .context("Invalid server bind address")?;

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool_gauges.abort();
    pool.close().await;
    info!("Database pool closed");

    shutdown_observability().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for CTRL+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
