use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;

use blueprint_assign::cli::{self, Session};
use blueprint_assign::client::HttpDashboardClient;
use blueprint_assign::config::AssignConfig;
use blueprint_assign::error::Error;
use blueprint_assign::logging;
use blueprint_assign::triage::{CandidateFetcher, TriageSettings};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let config = AssignConfig::from_env().context("failed to load configuration")?;

    let _guard = logging::init_tracing(&config.logging);

    eprintln!("📋 Blueprint Assign v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Server: {}", config.base_url);
    eprintln!(
        "   Phrases: {}",
        config.filter.subject_phrases().join(", ")
    );
    eprintln!(
        "   Unread only: {}, last {} days",
        config.filter.unread_only(),
        config.filter.day_window()
    );
    eprintln!("   Type help for commands.\n");

    let client = Arc::new(HttpDashboardClient::new(
        config.base_url.clone(),
        config.tokens.clone(),
    ));
    let fetcher = CandidateFetcher::new(client.clone(), client);
    let mut session = Session::new(fetcher, TriageSettings::new(config.filter.clone()));

    let result = match session.reload().await {
        Ok(()) => cli::run_stdin(&mut session).await,
        Err(e) => Err(Error::from(e)),
    };

    match result {
        Err(Error::Client(e)) if e.is_auth() => {
            eprintln!("Error: session expired or invalid.");
            eprintln!("  Sign in again and export fresh BLUEPRINT_ID_TOKEN / BLUEPRINT_ACCESS_TOKEN.");
            Ok(ExitCode::from(2))
        }
        other => other.map(|()| ExitCode::SUCCESS).map_err(anyhow::Error::from),
    }
}
