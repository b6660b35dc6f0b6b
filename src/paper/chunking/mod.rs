#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A passage of paper text ready for embedding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub content: String,
    /// Position of this chunk within the paper
    pub chunk_index: usize,
    /// Estimated token count
    pub token_count: usize,
}

/// Configuration for splitting paper bodies into passages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens
    pub target_chunk_size: usize,
    /// Maximum chunk size in tokens before a paragraph is split by sentence
    pub max_chunk_size: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            target_chunk_size: 300,
            max_chunk_size: 500,
        }
    }
}

/// Split text into passages along paragraph boundaries, falling back to
/// sentences and then words for oversized paragraphs
#[inline]
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<TextChunk> {
    let mut splits = Vec::new();
    let mut current = Accumulator::default();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if estimate_token_count(paragraph) > config.max_chunk_size {
            for piece in split_by_sentences(paragraph, config) {
                current.push(&piece, "\n\n", config.target_chunk_size, &mut splits);
            }
        } else {
            current.push(paragraph, "\n\n", config.target_chunk_size, &mut splits);
        }
    }
    current.finish(&mut splits);

    let chunks: Vec<TextChunk> = splits
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| TextChunk {
            token_count: estimate_token_count(&content),
            content,
            chunk_index,
        })
        .collect();

    debug!(
        "Chunked {} characters into {} chunks",
        text.len(),
        chunks.len()
    );

    chunks
}

#[derive(Default)]
struct Accumulator {
    text: String,
    tokens: usize,
}

impl Accumulator {
    fn push(&mut self, piece: &str, separator: &str, target: usize, out: &mut Vec<String>) {
        let piece_tokens = estimate_token_count(piece);
        if self.tokens + piece_tokens > target && !self.text.trim().is_empty() {
            out.push(self.text.trim().to_string());
            self.text.clear();
            self.tokens = 0;
        }
        self.text.push_str(piece);
        self.text.push_str(separator);
        self.tokens += piece_tokens;
    }

    fn finish(self, out: &mut Vec<String>) {
        if !self.text.trim().is_empty() {
            out.push(self.text.trim().to_string());
        }
    }
}

/// Split text by sentences, splitting any single oversized sentence by words
fn split_by_sentences(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let mut splits = Vec::new();
    let mut current = Accumulator::default();

    let sentences = text
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty());

    for sentence in sentences {
        if estimate_token_count(sentence) > config.max_chunk_size {
            for word in sentence.split_whitespace() {
                current.push(word, " ", config.target_chunk_size, &mut splits);
            }
        } else {
            current.push(sentence, " ", config.target_chunk_size, &mut splits);
        }
    }
    current.finish(&mut splits);

    splits
}

/// Estimate token count using a simple heuristic
/// This is a rough approximation - actual tokenization would be more accurate
#[inline]
pub fn estimate_token_count(text: &str) -> usize {
    // Rough heuristic: 1 token ≈ 0.75 words for English text
    let word_count = text.split_whitespace().count();
    let punct_count = text.chars().filter(|c| c.is_ascii_punctuation()).count();

    (punct_count as f64).mul_add(0.1, word_count as f64 / 0.75) as usize
}
