//! Pigeon Server - Main Entry Point
//!
//! Token-addressed message relay for a chat-network account.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use pigeon_server::{automation::Automation, config, db, gateway, network, ratelimit};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pigeon_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(config::Config::from_env()?);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Pigeon Server"
    );

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    // Connect the chat network. The console adapter logs sends and emits no
    // events; real protocol clients implement the same capability.
    let (console, events) = network::ConsoleNetwork::connect();
    let chat_network: Arc<dyn network::ChatNetwork> = console;

    // Initialize rate limiter (optional)
    let rate_limiter = {
        let rl_config = ratelimit::RateLimitConfig::from_env();
        if rl_config.enabled {
            info!(
                requests = rl_config.token.requests,
                window_secs = rl_config.token.window_secs,
                "Rate limiter initialized"
            );
            Some(ratelimit::RateLimiter::new(rl_config))
        } else {
            info!("Rate limiting disabled by configuration");
            None
        }
    };

    // Build application state
    let state = gateway::AppState::new(
        db_pool,
        chat_network.clone(),
        config.clone(),
        rate_limiter,
    );

    // Spawn the event automation loop
    let automation = Automation::new(
        state.registry.clone(),
        state.messenger.clone(),
        chat_network,
        config.clone(),
    );
    tokio::spawn(automation.run(events));

    // Build router
    let app = gateway::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
