// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::domain::service::{GLOBAL_REGION, ServiceRegistry};
use crate::infrastructure::aws_clients::RegionalClients;
use crate::infrastructure::cloudwatch_repository::CloudWatchRepository;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::tagging_inventory::TaggingInventory;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, preview_dashboard, refresh_dashboard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let engine_config = settings.engine_config()?;

    // Global services are only visible from us-east-1
    let regions = [engine_config.region.as_str(), GLOBAL_REGION];
    let cloudwatch = Arc::new(CloudWatchRepository::new(
        RegionalClients::load(&regions, aws_sdk_cloudwatch::Client::new).await,
        engine_config.region.clone(),
    ));
    let inventory = Arc::new(TaggingInventory::new(
        RegionalClients::load(&regions, aws_sdk_resourcegroupstagging::Client::new).await,
    ));

    let dashboard_service = DashboardService::new(
        engine_config,
        Arc::new(ServiceRegistry::standard()),
        inventory,
        cloudwatch.clone(),
        cloudwatch,
    );

    if settings.server.run_once {
        let summary = dashboard_service.refresh().await?;
        tracing::info!(
            "Dashboard {} updated with {} widgets ({} resources skipped)",
            summary.dashboard,
            summary.widget_count,
            summary.skipped.len()
        );
        return Ok(());
    }

    let state = Arc::new(AppState { dashboard_service });

    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard/preview", get(preview_dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = settings
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid server.bind_addr {}", settings.server.bind_addr))?;
    tracing::info!("Starting tagged-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
