// Deterministic stand-ins for the Ollama backend used across unit tests

use std::cell::RefCell;

use serde_json::json;

use crate::index::{ContextSource, MetadataRecord, SearchResult};
use crate::ollama::{Embedder, GenerateOptions, Generator};
use crate::{Result, ReviewError};

/// Embeds text as the sum of hand-picked concept vectors per known word.
/// Axes: animal, machine, cat, science.
pub struct ConceptEmbedder;

impl ConceptEmbedder {
    fn concept(word: &str) -> [f32; 4] {
        match word {
            "cats" | "cat" | "feline" => [1.0, 0.0, 1.0, 0.0],
            "dogs" | "dog" | "mammals" | "pet" => [1.0, 0.0, 0.0, 0.0],
            "rockets" | "rocket" | "machines" | "engines" => [0.0, 1.0, 0.0, 0.0],
            "attention" | "transformers" | "learning" => [0.0, 0.0, 0.0, 1.0],
            _ => [0.0; 4],
        }
    }

    pub fn embed_one(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; 4];
        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            for (slot, value) in vector.iter_mut().zip(Self::concept(&word)) {
                *slot += value;
            }
        }
        vector
    }
}

impl Embedder for ConceptEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| Self::embed_one(t)).collect())
    }
}

/// Returns vectors of a fixed dimension regardless of input
pub struct FixedDimensionEmbedder(pub usize);

impl Embedder for FixedDimensionEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0; self.0];
                if let Some(first) = v.first_mut() {
                    *first = t.len() as f32;
                }
                v
            })
            .collect())
    }
}

/// Always fails as if the backend were down
pub struct UnreachableBackend;

impl Embedder for UnreachableBackend {
    fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(ReviewError::Connection("connection refused".to_string()))
    }
}

impl Generator for UnreachableBackend {
    fn generate(
        &self,
        _prompt: &str,
        _model: &str,
        _options: Option<&GenerateOptions>,
    ) -> Result<String> {
        Err(ReviewError::Connection("connection refused".to_string()))
    }
}

/// Search results served from a fixed list, recording every query
#[derive(Default)]
pub struct CannedSource {
    pub contents: Vec<String>,
    pub queries: RefCell<Vec<(String, usize)>>,
}

impl CannedSource {
    pub fn new(contents: &[&str]) -> Self {
        Self {
            contents: contents.iter().map(|c| (*c).to_string()).collect(),
            queries: RefCell::default(),
        }
    }
}

impl ContextSource for CannedSource {
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        self.queries.borrow_mut().push((query.to_string(), k));
        Ok(self
            .contents
            .iter()
            .take(k)
            .enumerate()
            .map(|(i, content)| SearchResult {
                metadata: record(i as u64, content),
                distance: i as f32,
            })
            .collect())
    }
}

/// Echoes the prompt back, recording every call
#[derive(Default)]
pub struct EchoGenerator {
    pub calls: RefCell<Vec<(String, String)>>,
}

impl Generator for EchoGenerator {
    fn generate(
        &self,
        prompt: &str,
        model: &str,
        _options: Option<&GenerateOptions>,
    ) -> Result<String> {
        self.calls
            .borrow_mut()
            .push((prompt.to_string(), model.to_string()));
        Ok(format!("generated by {}", model))
    }
}

pub fn record(id: u64, content: &str) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    record.insert("id".to_string(), json!(id));
    record.insert("content".to_string(), json!(content));
    record
}
