mod api;
mod middleware;
mod store;

use std::sync::Arc;

use shopbot_discord::DiscordClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, relay_rate_limit_state, AppState};
use crate::store::ShopStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shopbot_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let credentials = config.discord_credentials()?;
    let discord = DiscordClient::with_base_url(
        &credentials.token,
        config.http_timeout_secs,
        &config.user_agent,
        &config.discord_api_url,
    )?;

    let state = AppState {
        discord: Arc::new(discord),
        channel_id: Arc::from(credentials.channel_id.as_str()),
        store: ShopStore::seeded(),
    };
    let app = build_app(state, relay_rate_limit_state(config.relay_rate_limit));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "shopbot server listening");
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
