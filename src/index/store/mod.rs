#[cfg(test)]
mod tests;

use std::path::Path;

use tracing::{debug, info};

use super::persistence::{self, SnapshotPaths};
use super::{ContextSource, DISTANCE_KEY, FlatIndex, MetadataRecord, SearchResult};
use crate::ollama::Embedder;
use crate::{Result, ReviewError};

/// Default for `[index] default_k`, the neighbour count of a plain search
pub const DEFAULT_SEARCH_K: usize = 5;

/// Embedding index with a parallel, position-aligned metadata sequence.
///
/// Append-only: the n-th embedded document always maps to the n-th metadata
/// record. Not synchronised; callers serialise access.
pub struct SimilarityIndex<E> {
    embedder: E,
    snapshot: SnapshotPaths,
    index: Option<FlatIndex>,
    metadata: Vec<MetadataRecord>,
}

impl<E: Embedder> SimilarityIndex<E> {
    /// An uninitialized index persisted under `path_prefix`
    #[inline]
    pub fn new(embedder: E, path_prefix: impl AsRef<Path>) -> Self {
        Self {
            embedder,
            snapshot: SnapshotPaths::from_prefix(path_prefix.as_ref()),
            index: None,
            metadata: Vec::new(),
        }
    }

    /// Build a fresh index from `documents`, replacing any existing state
    #[inline]
    pub fn create(&mut self, documents: &[String], metadata: Vec<MetadataRecord>) -> Result<()> {
        check_lengths(documents, &metadata)?;

        let vectors = self.embed(documents)?;
        let dimension = match vectors.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => {
                return Err(ReviewError::Embedding(
                    "cannot determine embedding dimension from an empty batch".to_string(),
                ));
            }
        };

        let mut index = FlatIndex::new(dimension);
        index.add(&vectors)?;

        info!(
            "Created index with {} vectors of dimension {}",
            index.len(),
            dimension
        );
        self.index = Some(index);
        self.metadata = metadata;
        Ok(())
    }

    /// Append documents to an existing index
    #[inline]
    pub fn add(&mut self, documents: &[String], metadata: Vec<MetadataRecord>) -> Result<()> {
        if self.index.is_none() {
            return Err(ReviewError::NotInitialized);
        }
        check_lengths(documents, &metadata)?;

        let vectors = self.embed(documents)?;
        let index = self.index.as_mut().ok_or(ReviewError::NotInitialized)?;
        index.add(&vectors)?;
        self.metadata.extend(metadata);

        debug!(
            "Added {} documents, index now holds {}",
            documents.len(),
            index.len()
        );
        Ok(())
    }

    /// Up to `k` records nearest to `query`, nearest first
    #[inline]
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let index = self.index.as_ref().ok_or(ReviewError::NotInitialized)?;

        let query_vector = self
            .embed(&[query.to_string()])?
            .pop()
            .ok_or_else(|| ReviewError::Embedding("no vector returned for query".to_string()))?;

        let results: Vec<SearchResult> = index
            .search(&query_vector, k)?
            .into_iter()
            .filter_map(|neighbour| {
                self.metadata.get(neighbour.position).map(|record| {
                    let mut metadata = record.clone();
                    // The computed score replaces any stored `distance` key
                    metadata.remove(DISTANCE_KEY);
                    SearchResult {
                        metadata,
                        distance: neighbour.distance,
                    }
                })
            })
            .collect();

        debug!(
            "Search for '{}' (k={}) returned {} results",
            query,
            k,
            results.len()
        );
        Ok(results)
    }

    /// Persist the index and its metadata under the configured prefix
    #[inline]
    pub fn save(&self) -> Result<()> {
        let index = self.index.as_ref().ok_or(ReviewError::NotInitialized)?;
        persistence::write_snapshot(&self.snapshot, index, &self.metadata)
    }

    /// Replace in-memory state with the persisted snapshot
    #[inline]
    pub fn load(&mut self) -> Result<()> {
        let (index, metadata) = persistence::read_snapshot(&self.snapshot)?;
        self.index = Some(index);
        self.metadata = metadata;
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.index.is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Dimension established by the first embedded batch
    #[inline]
    pub fn dimension(&self) -> Option<usize> {
        self.index.as_ref().map(FlatIndex::dimension)
    }

    #[inline]
    pub fn metadata(&self) -> &[MetadataRecord] {
        &self.metadata
    }

    #[inline]
    pub fn snapshot_paths(&self) -> &SnapshotPaths {
        &self.snapshot
    }

    fn embed(&self, documents: &[String]) -> Result<Vec<Vec<f32>>> {
        let vectors = self.embedder.encode(documents)?;
        if vectors.len() != documents.len() {
            return Err(ReviewError::Embedding(format!(
                "embedder returned {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }
        Ok(vectors)
    }
}

impl<E: Embedder> ContextSource for SimilarityIndex<E> {
    #[inline]
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        SimilarityIndex::search(self, query, k)
    }
}

fn check_lengths(documents: &[String], metadata: &[MetadataRecord]) -> Result<()> {
    if documents.len() != metadata.len() {
        return Err(ReviewError::LengthMismatch {
            documents: documents.len(),
            metadata: metadata.len(),
        });
    }
    Ok(())
}
