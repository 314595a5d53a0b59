//! zohocrm CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};

use zohocrm_bridge::cli::{Cli, Command, OAuthAction};
use zohocrm_bridge::commands;
use zohocrm_bridge::error::{BridgeError, BridgeResult};
use zohocrm_bridge::{CallContext, OAuthCallback, ZohoAdapter};
use zohocrm_core::init_tracing;
use zohocrm_providers::zoho::{ZohoConfig, ZohoProvider};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap reads env fallbacks
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("warning: {}", e);
    }

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("failed to load .env: {}", e),
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error ({}): {}", e.status_code(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> BridgeResult<()> {
    let adapter = build_adapter()?;

    match cli.command {
        Command::Contacts { account, action } => {
            let context = CallContext::from(account);
            commands::contacts::run(&adapter, &context, action).await
        }
        Command::Oauth { action } => match action {
            OAuthAction::Url { open } => commands::oauth::url(&adapter, open),
            OAuthAction::Callback {
                code,
                accounts_server,
                error,
            } => {
                let params = OAuthCallback {
                    code,
                    accounts_server,
                    error,
                };
                commands::oauth::callback(&adapter, &params).await
            }
        },
    }
}

/// Reads the provider configuration once and builds the adapter.
fn build_adapter() -> BridgeResult<ZohoAdapter> {
    let config = ZohoConfig::from_env()
        .map_err(|e| BridgeError::from_provider("Invalid configuration", e))?;
    let provider = ZohoProvider::new(config)
        .map_err(|e| BridgeError::from_provider("Could not create Zoho provider", e))?;
    Ok(ZohoAdapter::new(provider))
}
