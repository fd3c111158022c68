//! Medium command-line client
//!
//! 1. Loads client credentials and the redirect URI from the config file
//! 2. `authorize`: prints the authorization URL, waits for the browser
//!    callback on the redirect URI, then lists the user's publications and
//!    their contributors
//! 3. `whoami`: shows the user behind the configured access token
//! 4. `refresh`: trades a refresh token for a new access token

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use medium_api::{ClientConfig, MediumClient};
use medium_auth::{AccessProvider, ConfigFile, Scope};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::cli::Command;

/// Scopes requested by `authorize`
const REQUESTED_SCOPES: &[Scope] = &[
    Scope::BasicProfile,
    Scope::ListPublications,
    Scope::PublishPost,
];

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match cli::parse(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}\n{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    let config_path = ConfigFile::resolve_path(args.config_path.as_deref());
    info!(path = %config_path.display(), "loading configuration");

    let config = match ConfigFile::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path.display(), error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    match args.command {
        Command::Authorize => authorize(config).await,
        Command::Whoami => whoami(config).await,
        Command::Refresh { refresh_token } => refresh(config, &refresh_token).await,
    }
}

/// Initialize tracing from `LOG_LEVEL` / `RUST_LOG`, JSON when `LOG_FORMAT=json`.
///
/// Logs go to stderr so stdout only carries command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn authorize(config: ConfigFile) -> Result<()> {
    let client = Arc::new(
        MediumClient::from_credentials(config.credentials.clone())
            .context("failed to build API client")?,
    );

    let state = Uuid::new_v4().to_string();
    let url = client.authorization_url(&state, &config.redirect_uri, REQUESTED_SCOPES)?;
    println!("Open this URL in your browser to authorize:\n\n  {url}\n");

    let provider = match AccessProvider::new(client.clone(), &config.redirect_uri) {
        Ok(provider) => provider,
        Err(e) => {
            error!(error = %e, "cannot serve the redirect URI");
            std::process::exit(1);
        }
    };

    let token = match provider.listen_for_authorization_code().await {
        Ok(token) => token,
        Err(e) if e.is_configuration() => {
            error!(error = %e, "callback listener could not start");
            std::process::exit(1);
        }
        Err(e) => anyhow::bail!("authorization failed: {e}"),
    };
    info!(expires_at = token.expires_at, "authorization granted");

    let authed = client
        .with_access_token(&token)
        .context("failed to build authenticated client")?;

    let user = authed.get_user().await.context("failed to fetch user")?;
    let user_id = user
        .id
        .as_deref()
        .context("API returned a user without an id")?;
    println!(
        "Signed in as {} ({})",
        user.username.as_deref().unwrap_or("?"),
        user_id
    );

    let publications = authed
        .list_publications(user_id)
        .await
        .context("failed to list publications")?;
    for publication in &publications {
        let Some(publication_id) = publication.id.as_deref() else {
            continue;
        };
        println!(
            "\n{} [{}]",
            publication.name.as_deref().unwrap_or("(untitled)"),
            publication_id
        );

        let contributors = authed
            .list_contributors(publication_id)
            .await
            .with_context(|| format!("failed to list contributors of {publication_id}"))?;
        for contributor in contributors {
            println!("  {} {}", contributor.role, contributor.user_id);
        }
    }

    Ok(())
}

async fn whoami(config: ConfigFile) -> Result<()> {
    if config.access_token.is_none() {
        anyhow::bail!("no access token configured; set accessToken or MEDIUM_ACCESS_TOKEN");
    }

    let client = MediumClient::new(ClientConfig {
        credentials: Some(config.credentials),
        access_token: config.access_token,
        ..ClientConfig::default()
    })
    .context("failed to build API client")?;

    let user = client.get_user().await.context("failed to fetch user")?;
    println!(
        "{} ({})",
        user.username.as_deref().unwrap_or("?"),
        user.id.as_deref().unwrap_or("?")
    );
    if let Some(url) = user.url.as_deref() {
        println!("{url}");
    }
    Ok(())
}

async fn refresh(config: ConfigFile, refresh_token: &str) -> Result<()> {
    let client =
        MediumClient::from_credentials(config.credentials).context("failed to build API client")?;

    let token = client
        .exchange_refresh_token(refresh_token)
        .await
        .context("refresh failed")?;
    println!("access_token: {}", token.access_token);
    println!("expires_at: {}", token.expires_at);
    Ok(())
}
