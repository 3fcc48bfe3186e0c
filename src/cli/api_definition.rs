//! API Definition CLI commands
//!
//! Manage the gateway's API definition collection and wait for a listen path
//! to start serving traffic.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::output::{print_definitions, OutputFormat};
use crate::config::AppConfig;
use crate::convergence::ConvergencePoller;
use crate::domain::Definition;
use crate::gateway::{join_url, GatewayClient};

#[derive(Subcommand)]
pub enum ApiCommands {
    /// List all API definitions
    List {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Create a new API definition
    Create {
        /// Path to JSON or YAML file with the definition
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Replace an existing API definition, matched by api_id
    Update {
        /// Path to JSON or YAML file with the definition
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Delete an API definition by ID
    Delete {
        /// API definition ID
        id: String,
    },

    /// Wait until a listen path answers with HTTP 200
    Wait {
        /// Listen path to probe (e.g. /httpbin/get)
        listen_path: String,

        /// Base URL of the proxy port (defaults to the gateway URL)
        #[arg(long)]
        proxy_url: Option<String>,

        /// Total time budget in seconds (defaults to the configured convergence timeout)
        #[arg(long)]
        timeout: Option<u64>,

        /// Delay between attempts in milliseconds
        #[arg(long)]
        interval: Option<u64>,
    },
}

/// Handle API definition commands
pub async fn handle_api_command(command: ApiCommands, config: &AppConfig) -> Result<()> {
    let client = GatewayClient::new(&config.gateway)?;

    match command {
        ApiCommands::List { output } => {
            let format = OutputFormat::parse(&output)?;
            let definitions = client.list().await?;
            print_definitions(&definitions, format)?;
        }

        ApiCommands::Create { file } => {
            let def = read_definition(&file)?;
            let key = client.create(&def).await?;
            println!("Created API definition '{}' (key: {})", def.name, key);
        }

        ApiCommands::Update { file } => {
            let def = read_definition(&file)?;
            client.update(&def).await?;
            println!("Updated API definition '{}'", def.api_id);
        }

        ApiCommands::Delete { id } => {
            client.delete(&id).await?;
            println!("Deleted API definition '{}'", id);
        }

        ApiCommands::Wait { listen_path, proxy_url, timeout, interval } => {
            let base = proxy_url.unwrap_or_else(|| config.gateway.url.clone());
            let timeout =
                timeout.map(Duration::from_secs).unwrap_or_else(|| config.convergence.timeout());
            let interval =
                interval.map(Duration::from_millis).unwrap_or_else(|| config.convergence.interval());

            wait_for_listen_path(&base, &listen_path, timeout, interval).await?;
            println!("{} is serving traffic", listen_path);
        }
    }

    Ok(())
}

/// Poll `base + listen_path` until it returns 200, stopping early on Ctrl-C
async fn wait_for_listen_path(
    base: &str,
    listen_path: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let url = join_url(base, &[listen_path]);
    let http = reqwest::Client::builder()
        .timeout(interval.max(Duration::from_secs(1)))
        .build()
        .context("Failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let poller = ConvergencePoller::new(timeout, interval);
    let (http, probe) = (&http, url.as_str());
    let result = poller
        .wait_until_cancellable(&url, &cancel, move || async move {
            let response = http.get(probe).send().await.map_err(|e| e.to_string())?;
            if response.status() == reqwest::StatusCode::OK {
                Ok(())
            } else {
                Err(format!("{} returned {}", probe, response.status()))
            }
        })
        .await;

    signal_task.abort();
    result?;
    Ok(())
}

/// Read a definition from a JSON or YAML file, picked by extension
pub fn read_definition(path: &Path) -> Result<Definition> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read definition file: {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML definition: {}", path.display()))
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON definition: {}", path.display()))
    }
}
