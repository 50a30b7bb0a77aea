use std::sync::Arc;

use serenity::{prelude::GatewayIntents, Client};

use rtb_core::{config::Config, messaging::retry::RetryConfig, scoreboard::Scoreboard};

use crate::handlers::Handler;

pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to the gateway and dispatch events until SIGINT/SIGTERM.
///
/// Authentication or connection failures are returned to the caller.
pub async fn run_gateway(cfg: Arc<Config>, scoreboard: Arc<Scoreboard>) -> anyhow::Result<()> {
    tracing::info!(
        prefix = %cfg.command_prefix,
        tracked = cfg.tracked_reactions.types.len(),
        ratings = cfg.ratings().len(),
        "starting discord client"
    );

    let handler = Handler::new(cfg.clone(), scoreboard, RetryConfig::default());
    let mut client = Client::builder(&cfg.token, intents())
        .event_handler(handler)
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutting down");
        shard_manager.shutdown_all().await;
    });

    client.start().await?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
