use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReviewError>;

#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("Index has not been initialized; create or load it first")]
    NotInitialized,

    #[error("Index file not found: {}", .0.display())]
    IndexNotFound(PathBuf),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Embedding dimension mismatch: index expects {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Got {documents} documents but {metadata} metadata records")]
    LengthMismatch { documents: usize, metadata: usize },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod index;
pub mod ollama;
pub mod paper;
pub mod prompts;
pub mod rag;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod testing;
