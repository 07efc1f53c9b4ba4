//! Integration Bot - Main Entry Point
//!
//! A Telegram bot that serves a set of small API integrations:
//! random cat facts, GitHub commit lookup and Star Trek movie search.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use integration_bot::api::{CatFactsClient, GithubClient, StapiClient};
use integration_bot::bot::{BotHandlers, ConversationState, schema};
use integration_bot::commands::{CatFactsHandler, GithubHandler, StarTrekHandler};
use integration_bot::config::{GithubConfig, TelegramConfig};
use integration_bot::session::SessionStore;

/// Telegram bot serving small single-purpose API integrations.
#[derive(Parser, Debug)]
#[command(name = "integration_bot")]
#[command(about = "Telegram bot with cat facts, GitHub commits and Star Trek movies")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    // Load configurations
    let tg_config = TelegramConfig::from_env()
        .context("Failed to load Telegram configuration from environment")?;

    let github_config = GithubConfig::from_env_with_defaults();
    if github_config.token.is_none() {
        warn!("GITHUBTOKEN is not set; GitHub requests will be unauthenticated");
    }

    info!(
        "Tracking repository {}/{} ({})",
        github_config.owner, github_config.repo, github_config.branch
    );

    // One HTTP client shared by all API integrations
    let http = reqwest::Client::builder()
        .user_agent(concat!("integration_bot/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let handlers = Arc::new(BotHandlers {
        cat_facts: CatFactsHandler::new(CatFactsClient::new(http.clone())),
        github: GithubHandler::new(GithubClient::new(http.clone(), github_config)),
        star_trek: StarTrekHandler::new(StapiClient::new(http), SessionStore::new()),
    });

    let bot = Bot::new(tg_config.bot_token);

    info!("Starting integration bot...");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![
            handlers,
            InMemStorage::<ConversationState>::new()
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
