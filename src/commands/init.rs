use std::io::{self, Write};

use datahub_cli::config::Config;
use datahub_cli::error::{HubError, Result};
use datahub_cli::tier::Tier;

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if config_path.exists() {
        let answer = prompt(&format!(
            "Config file already exists at {}. Overwrite? [y/N] ",
            config_path.display()
        ))?;

        if !answer.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Data Hub CLI Configuration");
    println!("==========================\n");

    let default_tier = prompt("Default tier (dev2, stage, prod) [optional]: ")?;
    let default_tier = if default_tier.is_empty() {
        None
    } else {
        Some(default_tier.parse::<Tier>()?)
    };

    let timeout = prompt("Request timeout in seconds [optional]: ")?;
    let timeout_secs = if timeout.is_empty() {
        None
    } else {
        Some(timeout.parse::<u64>().map_err(|_| {
            HubError::InvalidInput(format!("timeout '{timeout}' is not a whole number"))
        })?)
    };

    let mut config = Config {
        default_tier,
        timeout_secs,
        ..Config::default()
    };

    for tier in Tier::ALL {
        let var = prompt(&format!(
            "Environment variable holding the {tier} token [{}]: ",
            tier.default_token_env()
        ))?;
        if !var.is_empty() {
            if let Some(entry) = config.tiers.get_mut(tier.key()) {
                entry.token_env = var;
            }
        }
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| HubError::ConfigRead {
            path: config_path.clone(),
            source: e,
        })?;
    }

    let contents = toml::to_string_pretty(&config)?;

    std::fs::write(&config_path, contents).map_err(|e| HubError::ConfigRead {
        path: config_path.clone(),
        source: e,
    })?;

    println!("\nConfig saved to {}", config_path.display());
    println!("Tokens are read from the environment; they are never written to this file.");

    Ok(())
}
