// Similarity index
// Exact nearest-neighbour search over document embeddings with
// index-aligned metadata, plus on-disk snapshots

pub mod flat;
pub mod persistence;
pub mod store;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use flat::{FlatIndex, Neighbour};
pub use store::SimilarityIndex;

/// Free-form metadata stored alongside each embedded document
pub type MetadataRecord = Map<String, Value>;

/// Key under which a serialized [`SearchResult`] carries its distance
pub const DISTANCE_KEY: &str = "distance";

/// A matched record with its squared Euclidean distance to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Never holds a `distance` key; see [`DISTANCE_KEY`]
    #[serde(flatten)]
    pub metadata: MetadataRecord,
    pub distance: f32,
}

impl SearchResult {
    /// The `content` field of the record, or an empty string when absent
    #[inline]
    pub fn content(&self) -> &str {
        self.metadata
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }
}

/// Anything that can answer a free-text nearest-neighbour query
pub trait ContextSource {
    fn search(&self, query: &str, k: usize) -> crate::Result<Vec<SearchResult>>;
}

impl<T: ContextSource + ?Sized> ContextSource for &T {
    #[inline]
    fn search(&self, query: &str, k: usize) -> crate::Result<Vec<SearchResult>> {
        (**self).search(query, k)
    }
}
