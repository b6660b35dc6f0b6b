// Ollama integration
// Blocking HTTP client serving both text embeddings and text generation


use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::ReviewError;
use crate::config::OllamaConfig;

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

/// Generation options forwarded verbatim into the request payload
pub type GenerateOptions = Map<String, Value>;

/// Maps text to fixed-dimension dense vectors, preserving input order
pub trait Embedder {
    fn encode(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>>;
}

/// Sends an assembled prompt to a language model and returns its completion
pub trait Generator {
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: Option<&GenerateOptions>,
    ) -> crate::Result<String>;
}

impl<T: Embedder + ?Sized> Embedder for &T {
    #[inline]
    fn encode(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        (**self).encode(texts)
    }
}

impl<T: Generator + ?Sized> Generator for &T {
    #[inline]
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: Option<&GenerateOptions>,
    ) -> crate::Result<String> {
        (**self).generate(prompt, model, options)
    }
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: Url,
    embedding_model: String,
    batch_size: u32,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: Option<u64>,
    pub digest: Option<String>,
    pub details: Option<ModelDetails>,
}

#[derive(Debug, Deserialize)]
pub struct ModelDetails {
    pub format: Option<String>,
    pub family: Option<String>,
    pub parameter_size: Option<String>,
    pub quantization_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

impl OllamaClient {
    #[inline]
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        let base_url = config
            .ollama_url()
            .context("Failed to generate Ollama URL from config")?;

        Ok(Self {
            base_url,
            embedding_model: config.embedding_model.clone(),
            batch_size: config.batch_size,
            agent: build_agent(Duration::from_secs(config.timeout_seconds)),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.agent = build_agent(timeout);
        self
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Test connection to the Ollama server and verify the embedding model is pulled
    #[inline]
    pub fn health_check(&self) -> Result<()> {
        debug!("Performing health check for Ollama at {}", self.base_url);

        let models = self.list_models().context("Server ping failed")?;

        if !models.iter().any(|m| m.name == self.embedding_model) {
            let available_models: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
            warn!(
                "Model {} not found. Available models: {:?}",
                self.embedding_model, available_models
            );
            return Err(anyhow::anyhow!(
                "Model '{}' is not available. Available models: {:?}",
                self.embedding_model,
                available_models
            ));
        }

        info!(
            "Health check passed for Ollama server at {} with model {}",
            self.base_url, self.embedding_model
        );
        Ok(())
    }

    /// Ping the Ollama server to check if it's responsive
    #[inline]
    pub fn ping(&self) -> Result<()> {
        let url = self
            .base_url
            .join("/api/tags")
            .context("Failed to build ping URL")?;

        debug!("Pinging Ollama server at {}", url);

        self.make_request_with_retry(|| {
            self.agent
                .get(url.as_str())
                .call()
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })
        .context("Failed to ping Ollama server")?;

        Ok(())
    }

    /// List all locally available models
    #[inline]
    pub fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = self
            .base_url
            .join("/api/tags")
            .context("Failed to build models URL")?;

        debug!("Fetching available models from {}", url);

        let response_text = self
            .make_request_with_retry(|| {
                self.agent
                    .get(url.as_str())
                    .call()
                    .and_then(|mut resp| resp.body_mut().read_to_string())
            })
            .context("Failed to fetch models")?;

        let models_response: ModelsResponse =
            serde_json::from_str(&response_text).context("Failed to parse models response")?;

        debug!("Found {} models", models_response.models.len());
        Ok(models_response.models)
    }

    fn embed_single_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        let url = self
            .base_url
            .join("/api/embed")
            .map_err(|e| ReviewError::Config(format!("Failed to build embedding URL: {}", e)))?;

        let request_json = serde_json::to_string(&EmbedRequest {
            model: &self.embedding_model,
            input: texts,
        })
        .map_err(|e| ReviewError::Embedding(format!("Failed to serialize request: {}", e)))?;

        let response_text = self
            .post_json(&url, &request_json)
            .map_err(|e| ReviewError::Connection(format!("{:#}", e)))?;

        let response: EmbedResponse = serde_json::from_str(&response_text).map_err(|e| {
            ReviewError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        if response.embeddings.len() != texts.len() {
            return Err(ReviewError::Embedding(format!(
                "Mismatch between request and response counts: {} vs {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings)
    }

    fn post_json(&self, url: &Url, body: &str) -> Result<String> {
        self.make_request_with_retry(|| {
            self.agent
                .post(url.as_str())
                .header("Content-Type", "application/json")
                .send(body)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })
    }

    fn make_request_with_retry<F>(&self, mut request_fn: F) -> Result<String>
    where
        F: FnMut() -> Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!("HTTP request attempt {}/{}", attempt, self.retry_attempts);

            match request_fn() {
                Ok(response_text) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(response_text);
                }
                Err(error) => {
                    let should_retry = match &error {
                        ureq::Error::StatusCode(status) => {
                            if *status >= 500 {
                                warn!(
                                    "Server error (status {}), attempt {}/{}",
                                    status, attempt, self.retry_attempts
                                );
                                true
                            } else {
                                warn!("Client error (status {}), not retrying", status);
                                return Err(anyhow::anyhow!("Client error: HTTP {}", status));
                            }
                        }
                        ureq::Error::ConnectionFailed
                        | ureq::Error::HostNotFound
                        | ureq::Error::Timeout(_)
                        | ureq::Error::Io(_) => {
                            warn!(
                                "Transport error: {}, attempt {}/{}",
                                error, attempt, self.retry_attempts
                            );
                            true
                        }
                        _ => {
                            warn!("Non-retryable error: {}", error);
                            false
                        }
                    };

                    if !should_retry {
                        return Err(anyhow::anyhow!("Non-retryable error: {}", error));
                    }

                    last_error = Some(anyhow::anyhow!("Request error: {}", error));

                    if attempt < self.retry_attempts {
                        let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                        let delay = Duration::from_millis(delay_ms);
                        debug!("Waiting {:?} before retry", delay);
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        error!("All retry attempts failed for request to {}", self.base_url);

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Request failed after retries")))
    }
}

impl Embedder for OllamaClient {
    /// Embed texts in batches of the configured size; output order matches input order
    #[inline]
    fn encode(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size.max(1) as usize) {
            embeddings.extend(self.embed_single_batch(chunk)?);
        }

        debug!(
            "Generated {} embeddings with {} dimensions",
            embeddings.len(),
            embeddings.first().map_or(0, Vec::len)
        );
        Ok(embeddings)
    }
}

impl Generator for OllamaClient {
    #[inline]
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        options: Option<&GenerateOptions>,
    ) -> crate::Result<String> {
        let url = self
            .base_url
            .join("/api/generate")
            .map_err(|e| ReviewError::Config(format!("Failed to build generate URL: {}", e)))?;

        let mut payload = Map::new();
        payload.insert("model".to_string(), Value::from(model));
        payload.insert("prompt".to_string(), Value::from(prompt));
        payload.insert("stream".to_string(), Value::Bool(false));
        if let Some(options) = options {
            payload.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        debug!(
            "Generating with model {} (prompt length: {})",
            model,
            prompt.len()
        );

        let response_text = self
            .post_json(&url, &Value::Object(payload).to_string())
            .map_err(|e| {
                ReviewError::Connection(format!("Failed to connect to Ollama API: {:#}", e))
            })?;

        let response: GenerateResponse = serde_json::from_str(&response_text).map_err(|e| {
            ReviewError::Generation(format!("Failed to parse generate response: {}", e))
        })?;

        Ok(response.response)
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}
