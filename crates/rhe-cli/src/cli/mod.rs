//! CLI for the RHE resilient HTTP client.

mod commands;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rhe_core::{config, RetryOption};

use commands::{run_config, run_get, run_send, SendBody};

/// Top-level CLI for RHE.
#[derive(Debug, Parser)]
#[command(name = "rhe")]
#[command(about = "RHE: HTTP requests with policy-driven retries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send a GET request.
    Get {
        /// HTTP/HTTPS URL.
        url: String,

        /// Extra request header, "Name: value". Repeatable.
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Per-request retry override.
        #[arg(long, value_enum, default_value_t = RetryArg::Global)]
        retry: RetryArg,
    },

    /// Send a request with any method and an optional body.
    Send {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS, TRACE).
        method: String,

        /// HTTP/HTTPS URL.
        url: String,

        /// Extra request header, "Name: value". Repeatable.
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Raw request body.
        #[arg(short = 'd', long, conflicts_with = "json")]
        data: Option<String>,

        /// JSON request body; validated before sending.
        #[arg(long)]
        json: Option<String>,

        /// Per-request retry override.
        #[arg(long, value_enum, default_value_t = RetryArg::Global)]
        retry: RetryArg,
    },

    /// Show the config file location and the effective retry policy.
    Config,
}

/// `--retry` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RetryArg {
    /// Retry this request whatever the global policy says.
    Enable,
    /// Never retry this request.
    Disable,
    /// Follow the configured policy.
    Global,
}

impl From<RetryArg> for RetryOption {
    fn from(arg: RetryArg) -> Self {
        match arg {
            RetryArg::Enable => RetryOption::Enable,
            RetryArg::Disable => RetryOption::Disable,
            RetryArg::Global => RetryOption::UseGlobal,
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                url,
                headers,
                retry,
            } => run_get(&cfg, &url, &parse_headers(&headers)?, retry.into())?,
            CliCommand::Send {
                method,
                url,
                headers,
                data,
                json,
                retry,
            } => {
                let body = match (data, json) {
                    (Some(raw), _) => SendBody::Raw(raw),
                    (None, Some(json)) => SendBody::Json(json),
                    (None, None) => SendBody::None,
                };
                run_send(
                    &cfg,
                    &method,
                    &url,
                    &parse_headers(&headers)?,
                    body,
                    retry.into(),
                )?
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

/// Splits "Name: value" arguments.
pub fn parse_headers(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|h| match h.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.trim().to_string()))
            }
            _ => bail!("invalid header {:?}, expected \"Name: value\"", h),
        })
        .collect()
}

#[cfg(test)]
mod tests;
