//! Print or save the effective configuration.

use std::path::PathBuf;

use anyhow::Context;

use handpilot_common::config::AppConfig;

pub fn run(config: &AppConfig, path: Option<PathBuf>, save: bool) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        println!("[WARN] {e}");
    }

    if save {
        let saved = match path {
            Some(path) => {
                config.save_to(&path)?;
                path
            }
            None => config.save()?,
        };
        println!("Config saved to {}", saved.display());
        return Ok(());
    }

    let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{json}");
    Ok(())
}
