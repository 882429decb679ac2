//! # homectld — home controller daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Open the JSON state store and reload persisted state
//! - Construct the pin driver and wrap it with the retry policy
//! - Build the hub and hand it to the HTTP router
//! - Start the scheduler and delivery loops
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use homectl_adapter_http_axum::state::AppState;
use homectl_adapter_pin_virtual::VirtualPinDriver;
use homectl_adapter_store_json::JsonStore;
use homectl_app::actuator::RetryingDriver;
use homectl_app::delivery::{DeliveryLoop, TracingBroadcaster};
use homectl_app::hub::Hub;
use homectl_app::scheduler::Scheduler;

use config::Config;

/// Grace period for the background loops after the server stops.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Persistence
    let store = JsonStore::open(&config.storage.dir)?;

    // Actuation
    let driver = VirtualPinDriver::new();
    let actuator = RetryingDriver::new(driver);

    // Hub
    let (hub, delivery_rx) = Hub::load(
        actuator,
        store.clone(),
        store.clone(),
        config.pins.assignments(),
    )
    .await;
    let hub = Arc::new(hub);

    // Background loops
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = Scheduler::new(
        Arc::clone(&hub),
        Duration::from_secs(config.scheduler.tick_secs),
        Duration::from_secs(config.scheduler.alert_hold_secs),
    );
    let scheduler_handle = tokio::spawn(scheduler.run(shutdown_rx.clone()));
    let delivery = DeliveryLoop::new(
        delivery_rx,
        TracingBroadcaster,
        Duration::from_secs(config.scheduler.delivery_secs),
    );
    let delivery_handle = tokio::spawn(delivery.run(shutdown_rx));

    // HTTP
    let app = homectl_adapter_http_axum::router::build(AppState::new(hub));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "homectld listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the loops and give them a bounded grace period.
    let _ = shutdown_tx.send(true);
    if tokio::time::timeout(SHUTDOWN_GRACE, scheduler_handle)
        .await
        .is_err()
    {
        tracing::warn!("scheduler loop did not stop within the grace period");
    }
    if tokio::time::timeout(SHUTDOWN_GRACE, delivery_handle)
        .await
        .is_err()
    {
        tracing::warn!("delivery loop did not stop within the grace period");
    }
    tracing::info!("homectld stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
