mod catalog;
mod config;
mod defaults;
mod handlers;
mod interfaces;
mod models;
mod render;
mod router;
mod selector;
mod utils;

use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog::TemplateCatalog;
use config::Config;
use defaults::CredentialDefaults;
use render::Renderer;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub renderer: Renderer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ciena_commission=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting Ciena commissioning server");
    tracing::info!("Templates Dir: {}", cfg.templates_dir);
    tracing::info!("Output Dir: {}", cfg.output_dir);
    tracing::info!("Listen: {}", cfg.listen_addr);

    let defaults = CredentialDefaults::load(&cfg.model_defaults_path).await?;

    let catalog = TemplateCatalog::new(&cfg.templates_dir);
    match catalog.list().await {
        Ok(templates) if templates.is_empty() => {
            tracing::warn!("No templates found in {}", catalog.dir().display());
        }
        Ok(templates) => {
            tracing::info!("Template catalog: {} templates", templates.len());
        }
        Err(e) => {
            tracing::warn!("Failed to list templates: {:#}", e);
        }
    }

    let renderer = Renderer::new(catalog, defaults, cfg.append_timestamp);

    // Create app state
    let state = Arc::new(AppState {
        config: cfg.clone(),
        renderer,
    });

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("Ciena commissioning server listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Ciena commissioning server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
