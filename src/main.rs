//! Virtual assistant - terminal client
//!
//! Talks to the virtual-assistant HTTP service: turns typed or picked input
//! into requests and renders the decoded replies as a transcript.

mod assistant;
mod config;
mod runtime;
mod state_machine;
mod tui;

use assistant::{HttpAssistant, LoggingService};
use config::Config;
use runtime::Controller;
use std::fs::File;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_logging(&config)?;

    tracing::info!(
        endpoint = %config.endpoint,
        debug = config.debug.enabled,
        "Starting virtual assistant client"
    );

    let assistant = LoggingService::new(Arc::new(HttpAssistant::from_config(&config)));
    let controller = Controller::new(assistant);
    tui::run(controller).await?;

    tracing::info!("Client exited");
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file
fn init_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(&config.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "virtual_assistant=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}
