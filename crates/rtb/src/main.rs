use std::sync::Arc;

use rtb_core::{config::Config, scoreboard::Scoreboard};

#[tokio::main]
async fn main() -> Result<(), rtb_core::Error> {
    rtb_core::logging::init("rtb")?;

    let cfg = Arc::new(Config::load()?);
    tracing::debug!(?cfg, "config loaded");

    let scoreboard = Arc::new(Scoreboard::new());

    rtb_discord::router::run_gateway(cfg, scoreboard)
        .await
        .map_err(|e| rtb_core::Error::External(format!("discord bot failed: {e}")))?;

    Ok(())
}
