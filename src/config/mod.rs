// Configuration management
// TOML settings for the Ollama connection, index location and chunking

pub mod interactive;
pub mod settings;

#[cfg(test)]
mod tests;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{Config, ConfigError, IndexConfig, OllamaConfig};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    Config::config_dir()
}
