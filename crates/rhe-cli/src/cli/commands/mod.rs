//! CLI command handlers, one file per command.

mod config;
mod get;
pub(crate) mod send;

pub use config::run_config;
pub use get::run_get;
pub use send::{run_send, SendBody};

use anyhow::{Context, Result};
use rhe_core::config::RheConfig;
use rhe_core::{HttpClient, RequestDescriptor, Response, RetryOption};

/// Applies CLI headers and the retry override, executes, prints the response.
fn execute_and_print(
    cfg: &RheConfig,
    mut request: RequestDescriptor,
    headers: &[(String, String)],
    retry: RetryOption,
) -> Result<()> {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    let request = request.retry_option(retry);

    let policy = cfg.retry_policy().context("invalid [retry] configuration")?;
    let client = HttpClient::new(policy);
    let resp = client.execute(&request)?;
    print!("{}", render_response(&resp)?);
    Ok(())
}

/// Status line, headers, blank line, body. JSON bodies are pretty-printed.
pub(crate) fn render_response(resp: &Response) -> Result<String> {
    let mut out = format!("HTTP {}\n", resp.status());
    for (name, value) in resp.headers().iter() {
        for v in value.iter() {
            out.push_str(&format!("{name}: {v}\n"));
        }
    }
    out.push('\n');
    match resp.body() {
        serde_json::Value::String(_) => out.push_str(resp.raw_body()),
        json => out.push_str(&serde_json::to_string_pretty(json)?),
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
