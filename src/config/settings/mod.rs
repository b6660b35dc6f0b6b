
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::index::store::DEFAULT_SEARCH_K;
use crate::paper::chunking::ChunkingConfig;
use crate::rag::DEFAULT_CONTEXT_K;

/// Environment variable that overrides the configuration directory
pub const HOME_ENV_VAR: &str = "LITREVIEW_HOME";

const INDEX_SUFFIX: &str = ".index";
const METADATA_SUFFIX: &str = "_metadata.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            index: IndexConfig::default(),
            chunking: ChunkingConfig::default(),
            base_dir: PathBuf::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub embedding_model: String,
    pub generation_model: String,
    pub batch_size: u32,
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            embedding_model: "nomic-embed-text:latest".to_string(),
            generation_model: "phi3".to_string(),
            batch_size: 16,
            timeout_seconds: 120,
        }
    }
}

/// Where the similarity index lives and how many neighbours queries pull
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
    /// Path prefix shared by the index and metadata files. Relative prefixes
    /// resolve against the configuration directory.
    pub path_prefix: String,
    /// Neighbours returned by a plain search
    pub default_k: usize,
    /// Passages spliced into a prompt by the retrieval augmenter
    pub context_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path_prefix: "papers".to_string(),
            default_k: DEFAULT_SEARCH_K,
            context_k: DEFAULT_CONTEXT_K,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid request timeout: {0} (must be between 1 and 3600 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid index path prefix (cannot be empty)")]
    InvalidPathPrefix,
    #[error("Invalid {0}: must be at least 1")]
    InvalidNeighbourCount(&'static str),
    #[error("Invalid target chunk size: {0} (must be between 50 and 4096)")]
    InvalidTargetChunkSize(usize),
    #[error("Max chunk size ({0}) must be greater than target chunk size ({1})")]
    MaxChunkSizeTooSmall(usize, usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Resolve the configuration directory, honouring `LITREVIEW_HOME`
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(home) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }

        dirs::config_dir()
            .map(|dir| dir.join("litreview"))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Load the configuration from the default directory
    #[inline]
    pub fn load_default() -> Result<Self> {
        let dir = Self::config_dir().context("Failed to resolve configuration directory")?;
        Self::load(dir)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                base_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ollama.validate()?;
        self.index.validate()?;
        self.validate_chunking_config()?;
        Ok(())
    }

    fn validate_chunking_config(&self) -> Result<(), ConfigError> {
        let config = &self.chunking;

        if !(50..=4096).contains(&config.target_chunk_size) {
            return Err(ConfigError::InvalidTargetChunkSize(
                config.target_chunk_size,
            ));
        }

        if config.max_chunk_size <= config.target_chunk_size {
            return Err(ConfigError::MaxChunkSizeTooSmall(
                config.max_chunk_size,
                config.target_chunk_size,
            ));
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join("config.toml")
    }

    #[inline]
    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        self.ollama.ollama_url()
    }

    /// Path prefix for the persisted index, resolved against the base directory
    #[inline]
    pub fn index_path_prefix(&self) -> PathBuf {
        let prefix = Path::new(&self.index.path_prefix);
        if prefix.is_absolute() {
            prefix.to_path_buf()
        } else {
            self.get_base_dir().join(prefix)
        }
    }

    /// Paths of the index file and the metadata file for a given prefix
    #[inline]
    pub fn snapshot_paths(prefix: &Path) -> (PathBuf, PathBuf) {
        let mut index = prefix.as_os_str().to_owned();
        index.push(INDEX_SUFFIX);
        let mut metadata = prefix.as_os_str().to_owned();
        metadata.push(METADATA_SUFFIX);
        (PathBuf::from(index), PathBuf::from(metadata))
    }
}

impl OllamaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        self.ollama_url()?;

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.embedding_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.embedding_model.clone()));
        }

        if self.generation_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.generation_model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        if !(1..=3600).contains(&self.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }

        Ok(())
    }

    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }

    pub fn set_protocol(&mut self, protocol: String) -> Result<(), ConfigError> {
        if protocol != "http" && protocol != "https" {
            return Err(ConfigError::InvalidProtocol(protocol));
        }
        self.protocol = protocol;
        Ok(())
    }

    pub fn set_host(&mut self, host: String) -> Result<(), ConfigError> {
        let temp_config = OllamaConfig {
            host: host.clone(),
            ..self.clone()
        };
        temp_config.ollama_url()?;
        self.host = host;
        Ok(())
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port));
        }
        self.port = port;
        Ok(())
    }

    pub fn set_embedding_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.embedding_model = model;
        Ok(())
    }

    pub fn set_generation_model(&mut self, model: String) -> Result<(), ConfigError> {
        if model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(model));
        }
        self.generation_model = model;
        Ok(())
    }

    pub fn set_batch_size(&mut self, batch_size: u32) -> Result<(), ConfigError> {
        if batch_size == 0 || batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(batch_size));
        }
        self.batch_size = batch_size;
        Ok(())
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidPathPrefix);
        }
        if self.default_k == 0 {
            return Err(ConfigError::InvalidNeighbourCount("default_k"));
        }
        if self.context_k == 0 {
            return Err(ConfigError::InvalidNeighbourCount("context_k"));
        }
        Ok(())
    }
}
