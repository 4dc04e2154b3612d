//! Eusko API Server
//!
//! Main entry point for the eusko backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eusko_api::{AppState, create_router};
use eusko_core::catalog::Catalog;
use eusko_core::donation::DonationAllocator;
use eusko_core::orchestrator::TransactionOrchestrator;
use eusko_core::reconciliation::ReconciliationEngine;
use eusko_gateway::{CyclosClient, DolibarrClient};
use eusko_shared::{AppConfig, AppError, EmailService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eusko=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config =
        AppConfig::load().map_err(|e| AppError::Configuration(format!("settings: {e}")))?;
    let catalog = Arc::new(Catalog::load(&config.catalog_path).map_err(|e| {
        AppError::Configuration(format!("catalog {}: {e}", config.catalog_path))
    })?);
    info!(path = %config.catalog_path, "Payment type catalog loaded");

    // External systems
    let ledger = Arc::new(CyclosClient::new(&config.cyclos)?);
    info!(url = %config.cyclos.url, login = %config.cyclos.login, "Ledger client configured");
    let directory = Arc::new(DolibarrClient::new(&config.dolibarr)?);
    info!(url = %config.dolibarr.url, "Member directory client configured");

    // Create email service
    let email_service = Arc::new(EmailService::new(config.email.clone()));
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    // Create application state
    let state = AppState {
        orchestrator: Arc::new(TransactionOrchestrator::new(
            ledger.clone(),
            directory.clone(),
            catalog.clone(),
            email_service,
        )),
        reconciliation: Arc::new(ReconciliationEngine::new(ledger.clone(), catalog.clone())),
        donations: Arc::new(DonationAllocator::new(
            ledger,
            directory,
            catalog,
            config.donation.clone(),
        )),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
