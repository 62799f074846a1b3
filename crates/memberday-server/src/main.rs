mod api;
mod cache;
mod middleware;

use std::sync::Arc;

use memberday_scraper::PageClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, build_cors, AppState, SourceUrls},
    cache::TtlCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = memberday_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let client = PageClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let state = AppState {
        cache: Arc::new(TtlCache::with_default_ttl()),
        client,
        sources: Arc::new(SourceUrls::from_app_config(&config)),
    };
    let app = build_app(state, build_cors(&config.cors_origins));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, env = %config.env, "memberday server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
