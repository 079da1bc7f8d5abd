use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use mindful_onboarding::config::ServiceConfig;
use mindful_onboarding::onboarding::{OnboardingManager, OnboardingRouteState, onboarding_routes};
use mindful_onboarding::store::{Database, LibSqlBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env().context("Invalid MINDFUL_* configuration")?;

    eprintln!("Mindful Onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Design: {}", config.design.display_name());
    eprintln!("   API: http://0.0.0.0:{}/api/onboarding/status", config.port);

    // ── Database ─────────────────────────────────────────────────────────
    let db: Arc<dyn Database> = Arc::new(
        LibSqlBackend::new_local(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?,
    );
    eprintln!("   Database: {}\n", config.db_path.display());

    // ── Onboarding ───────────────────────────────────────────────────────
    let manager = Arc::new(OnboardingManager::new(db, config.design));
    let app = onboarding_routes(OnboardingRouteState { manager }).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Onboarding server started");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
