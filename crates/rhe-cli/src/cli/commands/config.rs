//! `rhe config` – show where the config lives and what it resolves to.

use anyhow::{Context, Result};
use rhe_core::config::{self, RheConfig};

pub fn run_config(cfg: &RheConfig) -> Result<()> {
    println!("config file: {}", config::config_path()?.display());
    let policy = cfg.retry_policy().context("invalid [retry] configuration")?;
    println!("{:#?}", policy);
    Ok(())
}
