//! # Command Line Interface
//!
//! Gateway API definition management from the command line.

pub mod api_definition;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::observability::{init_observability, log_config_info};

#[derive(Parser)]
#[command(name = "gateway-operator")]
#[command(about = "Gateway API definition sync tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML, YAML or JSON); environment overrides still apply
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Gateway management base URL
    #[arg(long, global = true, env = "GATEWAY_URL")]
    pub url: Option<String>,

    /// Gateway secret
    #[arg(long, global = true, env = "GATEWAY_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Gateway request timeout in seconds
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// API definition management commands
    Api {
        #[command(subcommand)]
        command: api_definition::ApiCommands,
    },
}

impl Cli {
    /// Resolve configuration: file/environment first, then command-line overrides
    pub fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;

        if let Some(url) = &self.url {
            config.gateway.url = url.clone();
        }
        if let Some(secret) = &self.secret {
            config.gateway.secret = secret.clone();
        }
        if let Some(timeout) = self.request_timeout {
            config.gateway.timeout_seconds = timeout;
        }
        if self.verbose {
            config.observability.log_level = "debug".to_string();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_observability(&config.observability)?;
    log_config_info(&config);

    match cli.command {
        Commands::Api { command } => api_definition::handle_api_command(command, &config).await?,
    }

    Ok(())
}
