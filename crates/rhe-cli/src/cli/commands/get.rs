//! `rhe get` – GET a URL.

use anyhow::Result;
use rhe_core::config::RheConfig;
use rhe_core::{RequestDescriptor, RetryOption};

use super::execute_and_print;

pub fn run_get(
    cfg: &RheConfig,
    url: &str,
    headers: &[(String, String)],
    retry: RetryOption,
) -> Result<()> {
    let request = RequestDescriptor::get(url)?;
    execute_and_print(cfg, request, headers, retry)
}
