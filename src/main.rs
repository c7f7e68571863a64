#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::{Context, Result};
use clap::Parser;
use story_studio::Config;
use story_studio::app::dispatch;
use story_studio::cli::Cli;
use story_studio::error::LlmError;
use story_studio::ui::style as ui;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };
    config.apply_env_overrides();

    // Diagnostics go to stderr; stdout carries stories and listings.
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level)
        .parse::<Level>()
        .unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let result = dispatch(cli, config).await;
    if let Err(error) = &result {
        let missing_key = error
            .chain()
            .any(|cause| matches!(cause.downcast_ref::<LlmError>(), Some(LlmError::MissingApiKey { .. })));
        if missing_key {
            eprintln!(
                "{} set STORY_STUDIO_API_KEY (or OPENAI_API_KEY), or add api_key to ~/.story-studio/config.toml",
                ui::yellow("hint:")
            );
        }
    }
    result
}
