//! Config command handlers

use anyhow::{bail, Context, Result};

use shoplist_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let token = if config.token.is_some() {
        "(set)"
    } else {
        "(not set)"
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "timeout_secs": config.timeout_secs,
                    "page_size": config.page_size,
                    "token": config.token.is_some(),
                    "log_level": config.log_level
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.api_url);
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  api_url:      {}", config.api_url);
            println!("  timeout_secs: {}", config.timeout_secs);
            println!("  page_size:    {}", config.page_size);
            println!("  token:        {}", token);
            println!(
                "  log_level:    {}",
                config.log_level.as_deref().unwrap_or("(not set)")
            );
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    apply(&mut config, &key, &value)?;

    config.save().context("Failed to save configuration")?;

    // Never echo the token back
    let shown = if key == "token" { "***" } else { value.as_str() };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() || value == "none" {
        None
    } else {
        Some(value.to_string())
    }
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "api_url" => {
            if value.is_empty() {
                bail!("api_url cannot be empty");
            }
            config.api_url = value.to_string();
        }
        "timeout_secs" => {
            config.timeout_secs = value
                .parse()
                .context("Invalid value for timeout_secs. Use a number of seconds.")?;
        }
        "page_size" => {
            let size: u32 = value
                .parse()
                .context("Invalid value for page_size. Use a positive number.")?;
            if size == 0 {
                bail!("page_size must be at least 1");
            }
            config.page_size = size;
        }
        "token" => config.token = optional(value),
        "log_level" => config.log_level = optional(value),
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: api_url, timeout_secs, page_size, token, log_level",
                key
            );
        }
    }
    Ok(())
}
