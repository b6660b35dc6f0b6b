// Paper records
// Metadata extracted from a paper plus its conversion into indexable passages

pub mod chunking;


use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::index::MetadataRecord;
use chunking::{ChunkingConfig, chunk_text};

/// Bibliographic record for one paper, optionally with its full text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    /// Either a JSON list or a single comma-separated string
    #[serde(default, deserialize_with = "deserialize_authors")]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub doi: Option<String>,
    /// Body text; the abstract is indexed when absent
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Paper>),
    One(Box<Paper>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Authors {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_authors<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Authors::deserialize(deserializer)? {
        Authors::List(list) => list,
        Authors::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Texts and metadata ready for [`crate::index::SimilarityIndex::create`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexBatch {
    pub documents: Vec<String>,
    pub metadata: Vec<MetadataRecord>,
}

impl IndexBatch {
    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn extend(&mut self, other: IndexBatch) {
        self.documents.extend(other.documents);
        self.metadata.extend(other.metadata);
    }
}

impl Paper {
    /// Load a single paper from a JSON file
    #[inline]
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read paper file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse paper file: {}", path.display()))
    }

    /// Load a JSON file holding either one paper or a list of papers
    #[inline]
    pub fn load_many(path: &Path) -> Result<Vec<Self>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read papers file: {}", path.display()))?;
        let parsed: OneOrMany = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse papers file: {}", path.display()))?;
        Ok(match parsed {
            OneOrMany::Many(papers) => papers,
            OneOrMany::One(paper) => vec![*paper],
        })
    }

    #[inline]
    pub fn authors_line(&self) -> String {
        if self.authors.is_empty() {
            "Unknown Author".to_string()
        } else {
            self.authors.iter().join(", ")
        }
    }

    #[inline]
    pub fn abstract_or_empty(&self) -> &str {
        self.abstract_text.as_deref().unwrap_or_default()
    }

    /// Stable identifier: the DOI when known, otherwise a fresh UUID
    #[inline]
    pub fn identifier(&self) -> String {
        self.doi
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// The text that gets embedded: body, else abstract, else title
    #[inline]
    pub fn indexable_text(&self) -> &str {
        [self.content.as_deref(), self.abstract_text.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .unwrap_or(&self.title)
    }

    /// Split the paper into passages with one aligned metadata record each
    #[inline]
    pub fn to_index_batch(&self, config: &ChunkingConfig) -> IndexBatch {
        let id = self.identifier();
        let indexed_at = Utc::now().to_rfc3339();

        let (documents, metadata) = chunk_text(self.indexable_text(), config)
            .into_iter()
            .map(|chunk| {
                let mut record = MetadataRecord::new();
                record.insert("id".to_string(), json!(id));
                record.insert("title".to_string(), json!(self.title));
                record.insert("authors".to_string(), json!(self.authors));
                record.insert(
                    "publication_date".to_string(),
                    self.publication_date
                        .map_or(Value::Null, |d| json!(d.format("%Y-%m-%d").to_string())),
                );
                record.insert("keywords".to_string(), json!(self.keywords));
                record.insert("doi".to_string(), json!(self.doi));
                record.insert("chunk_index".to_string(), json!(chunk.chunk_index));
                record.insert("token_count".to_string(), json!(chunk.token_count));
                record.insert("content".to_string(), json!(chunk.content));
                record.insert("indexed_at".to_string(), json!(indexed_at));
                (chunk.content, record)
            })
            .unzip();

        IndexBatch {
            documents,
            metadata,
        }
    }
}

/// Chunk every paper into one aligned batch
#[inline]
pub fn build_index_batch(papers: &[Paper], config: &ChunkingConfig) -> IndexBatch {
    papers
        .iter()
        .fold(IndexBatch::default(), |mut batch, paper| {
            batch.extend(paper.to_index_batch(config));
            batch
        })
}
