
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};

use super::{Config, ConfigError, IndexConfig, OllamaConfig};
use crate::ollama::OllamaClient;

/// Walk through the Ollama and index settings, check the server, then save
#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("📚 litreview setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Models").bold().yellow());
    eprintln!("Papers are embedded and reviewed by models served from a local Ollama.");
    eprintln!();
    configure_ollama(&mut config.ollama)?;

    eprintln!();
    eprintln!("{}", style("Index").bold().yellow());
    eprintln!(
        "Relative prefixes are stored under {}",
        style(config.get_base_dir().display()).dim()
    );
    eprintln!();
    configure_index(&mut config.index)?;

    eprintln!();
    eprintln!(
        "{}",
        style(format!("Checking {} ...", config.ollama.embedding_model)).yellow()
    );

    match check_ollama(&config.ollama) {
        Ok(()) => eprintln!(
            "{}",
            style("✓ Ollama is up and the embedding model is pulled").green()
        ),
        Err(e) => {
            eprintln!("{} {:#}", style("⚠ Ollama check failed:").yellow(), e);
            eprintln!(
                "Run 'ollama pull {}' before indexing papers.",
                config.ollama.embedding_model
            );
        }
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Write these settings?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!(
            "{} {}",
            style("✓ Settings written to").green(),
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Settings discarded.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load_default().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Ollama Settings:").bold().yellow());
    eprintln!("  Host: {}", style(&config.ollama.host).cyan());
    eprintln!("  Port: {}", style(config.ollama.port).cyan());
    eprintln!(
        "  Embedding Model: {}",
        style(&config.ollama.embedding_model).cyan()
    );
    eprintln!(
        "  Generation Model: {}",
        style(&config.ollama.generation_model).cyan()
    );
    eprintln!("  Batch Size: {}", style(config.ollama.batch_size).cyan());
    eprintln!("  Timeout: {}s", style(config.ollama.timeout_seconds).cyan());

    eprintln!();
    match config.ollama_url() {
        Ok(url) => eprintln!("  Ollama URL: {}", style(url).cyan()),
        Err(e) => eprintln!("  Ollama URL: {} ({})", style("Invalid").red(), e),
    }

    eprintln!();
    eprintln!("{}", style("Index Settings:").bold().yellow());
    eprintln!(
        "  Path Prefix: {}",
        style(config.index_path_prefix().display()).cyan()
    );
    eprintln!("  Search Results: {}", style(config.index.default_k).cyan());
    eprintln!("  Context Passages: {}", style(config.index.context_k).cyan());

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    let config_dir = Config::config_dir().context("Failed to resolve configuration directory")?;
    Config::load(&config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No usable configuration found. Using defaults.").yellow()
            );
            Ok(Config {
                base_dir: config_dir.clone(),
                ..Config::default()
            })
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_ollama(ollama: &mut OllamaConfig) -> Result<()> {
    let protocols = &["http", "https"];
    let default_index = protocols
        .iter()
        .position(|&p| p == ollama.protocol)
        .unwrap_or(0);

    let protocol_index = Select::new()
        .with_prompt("Ollama protocol")
        .default(default_index)
        .items(protocols)
        .interact()?;

    let protocol = protocols[protocol_index].to_string();

    let host: String = Input::new()
        .with_prompt("Ollama host")
        .default(ollama.host.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let temp_config = OllamaConfig {
                protocol: protocol.clone(),
                host: input.clone(),
                ..OllamaConfig::default()
            };
            temp_config.validate()
        })
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("Ollama port")
        .default(ollama.port)
        .validate_with(|input: &u16| -> Result<(), &str> {
            if *input == 0 {
                Err("Port must be greater than 0")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let embedding_model: String = Input::new()
        .with_prompt("Embedding model")
        .default(ollama.embedding_model.clone())
        .validate_with(non_empty_model)
        .interact_text()?;

    let generation_model: String = Input::new()
        .with_prompt("Generation model")
        .default(ollama.generation_model.clone())
        .validate_with(non_empty_model)
        .interact_text()?;

    let batch_size: u32 = Input::new()
        .with_prompt("Batch size for embedding generation")
        .default(ollama.batch_size)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if *input == 0 {
                Err("Batch size must be greater than 0")
            } else if *input > 1000 {
                Err("Batch size must be 1000 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    ollama.set_protocol(protocol)?;
    ollama.set_host(host)?;
    ollama.set_port(port)?;
    ollama.set_embedding_model(embedding_model)?;
    ollama.set_generation_model(generation_model)?;
    ollama.set_batch_size(batch_size)?;

    Ok(())
}

fn non_empty_model(input: &String) -> Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("Model name cannot be empty")
    } else {
        Ok(())
    }
}

fn configure_index(index: &mut IndexConfig) -> Result<()> {
    index.path_prefix = Input::new()
        .with_prompt("Index path prefix")
        .default(index.path_prefix.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Path prefix cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    index.default_k = Input::new()
        .with_prompt("Passages returned by search")
        .default(index.default_k)
        .validate_with(positive_count)
        .interact_text()?;

    index.context_k = Input::new()
        .with_prompt("Passages added to each prompt")
        .default(index.context_k)
        .validate_with(positive_count)
        .interact_text()?;

    index.validate()?;
    Ok(())
}

fn positive_count(input: &usize) -> Result<(), &'static str> {
    if *input == 0 {
        Err("Count must be at least 1")
    } else {
        Ok(())
    }
}

/// Single-attempt health check with a short timeout
fn check_ollama(ollama: &OllamaConfig) -> Result<()> {
    OllamaClient::new(ollama)?
        .with_timeout(Duration::from_secs(5))
        .with_retry_attempts(1)
        .health_check()
}
