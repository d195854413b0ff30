use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waxwing_api::config::ServerConfig;
use waxwing_api::state::AppState;
use waxwing_api::{background, fulfillment, router};
use waxwing_billing::{HttpPaymentGateway, PaymentGateway};
use waxwing_predict::{HttpPredictionDelegate, PredictionDelegate};
use waxwing_storage::{S3Config, S3ObjectStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    let pool = connect_database().await;

    // Outbound clients.
    let object_store = Arc::new(S3ObjectStore::connect(S3Config::from_env()).await);
    let prediction: Arc<dyn PredictionDelegate> =
        Arc::new(HttpPredictionDelegate::new(config.ia_engine_url.clone()));
    let payments: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(
        config.billing.gateway_url.clone(),
        config.billing.secret_key.clone(),
        config.billing.success_url.clone(),
        config.billing.cancel_url.clone(),
    ));
    tracing::info!(
        ia_engine = %config.ia_engine_url,
        gateway = %config.billing.gateway_url,
        "Outbound clients ready"
    );

    let event_bus = Arc::new(waxwing_events::EventBus::default());

    // Background services: the order optimizer reacts to bus events, the
    // interval jobs wake on their own timers.
    let optimizer = fulfillment::OrderOptimizer::new(pool.clone(), Arc::clone(&prediction));
    let optimizer_handle = tokio::spawn(optimizer.run(event_bus.subscribe()));

    let background_cancel = tokio_util::sync::CancellationToken::new();
    let segmentation_handle = tokio::spawn(background::segmentation::run(
        pool.clone(),
        Arc::clone(&prediction),
        background_cancel.clone(),
    ));
    let cleanup_handle = tokio::spawn(background::session_cleanup::run(
        pool.clone(),
        background_cancel.clone(),
    ));
    tracing::info!(
        "Background services started (order optimizer, marketing segmentation, session cleanup)"
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        object_store,
        prediction,
        payments,
    };
    let app = router::build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not a valid IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Could not bind listener");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server exited with error");

    tracing::info!("No longer accepting connections, stopping background services");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    background_cancel.cancel();
    let _ = tokio::time::timeout(grace, segmentation_handle).await;
    let _ = tokio::time::timeout(grace, cleanup_handle).await;

    // Dropping the last bus sender closes the broadcast channel, which ends
    // the optimizer's event loop.
    drop(event_bus);
    let _ = tokio::time::timeout(grace, optimizer_handle).await;

    tracing::info!("Shutdown complete");
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waxwing_api=debug,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn connect_database() -> waxwing_db::DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = waxwing_db::create_pool(&url)
        .await
        .expect("Database connection failed");
    waxwing_db::health_check(&pool)
        .await
        .expect("Database ping failed");
    waxwing_db::run_migrations(&pool)
        .await
        .expect("Migrations failed to apply");

    tracing::info!("Database ready, migrations applied");
    pool
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("SIGINT handler failed");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
