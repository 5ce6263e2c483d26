mod auth;
mod bootstrap;
mod cli;
mod config;
mod errors;
mod extract;
mod layout;
mod models;
mod records;
mod render;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::bootstrap::{seed, tokens};
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::layout::default_page_config;
use crate::models::local_now;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::TableStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.ensure_dirs()?;

    match cli.command() {
        Command::Serve => serve(config).await,
        Command::Setup => setup(&config),
        Command::IssueTokens => issue_tokens(&config),
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting review API v{}", env!("CARGO_PKG_VERSION"));

    let page_config = default_page_config();
    let state = AppState::new(config.clone(), page_config);
    if !state.store.records_exist() || !state.store.employees_exist() {
        warn!(
            "Tables missing in {}; run `review-api setup` first",
            config.data_dir.display()
        );
    }
    if !state.store.tokens_exist() {
        warn!("No token table yet; run `review-api issue-tokens`");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");
    info!("Serving front end from {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn setup(config: &Config) -> Result<()> {
    let store = TableStore::new(config);
    let report = seed::seed_tables(&store)?;
    info!(
        "Setup complete in {} (employees: {:?}, records: {:?}, tokens created: {})",
        config.data_dir.display(),
        report.employees,
        report.records,
        report.tokens_created
    );
    Ok(())
}

fn issue_tokens(config: &Config) -> Result<()> {
    let store = TableStore::new(config);
    let options = tokens::IssueOptions {
        validity_days: config.token_validity_days,
        hr_email: config.hr_email.clone(),
    };
    let issued = tokens::issue_tokens(&store, &options, local_now())?;

    for token in &issued {
        info!(
            "{} ({:?}): {}",
            token.name,
            token.role,
            tokens::login_link(&config.public_base_url, token)
        );
    }
    info!("Tokens valid for {} days", config.token_validity_days);
    Ok(())
}
