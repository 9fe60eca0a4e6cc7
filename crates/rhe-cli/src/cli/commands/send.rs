//! `rhe send` – any method, optional raw or JSON body.

use anyhow::{Context, Result};
use rhe_core::config::RheConfig;
use rhe_core::{Method, RequestDescriptor, RetryOption};

use super::execute_and_print;

/// Body given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendBody {
    None,
    Raw(String),
    Json(String),
}

pub fn run_send(
    cfg: &RheConfig,
    method: &str,
    url: &str,
    headers: &[(String, String)],
    body: SendBody,
    retry: RetryOption,
) -> Result<()> {
    let request = build_request(method, url, body)?;
    execute_and_print(cfg, request, headers, retry)
}

pub(crate) fn build_request(method: &str, url: &str, body: SendBody) -> Result<RequestDescriptor> {
    let method: Method = method.parse()?;
    let request = RequestDescriptor::new(method, url)?;
    Ok(match body {
        SendBody::None => request,
        SendBody::Raw(raw) => request.body(raw),
        SendBody::Json(text) => {
            let value: serde_json::Value =
                serde_json::from_str(&text).context("--json is not valid JSON")?;
            request.json(&value)?
        }
    })
}
