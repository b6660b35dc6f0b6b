use super::*;
use crate::testing::{ConceptEmbedder, FixedDimensionEmbedder, UnreachableBackend, record};
use serde_json::{Value, json};
use tempfile::TempDir;

fn documents(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| (*t).to_string()).collect()
}

fn ids(results: &[SearchResult]) -> Vec<u64> {
    results
        .iter()
        .filter_map(|r| r.get("id").and_then(Value::as_u64))
        .collect()
}

fn animal_index(prefix: &Path) -> SimilarityIndex<ConceptEmbedder> {
    let mut index = SimilarityIndex::new(ConceptEmbedder, prefix);
    let texts = ["cats are mammals", "dogs are mammals", "rockets are machines"];
    let metadata = texts
        .iter()
        .enumerate()
        .map(|(i, t)| record(i as u64 + 1, t))
        .collect();
    index
        .create(&documents(&texts), metadata)
        .expect("create succeeds");
    index
}

#[test]
fn mammal_query_prefers_mammal_documents() {
    let index = animal_index(Path::new("unused"));

    let results = index.search("feline pet", 2).expect("search succeeds");

    let mut found = ids(&results);
    found.sort_unstable();
    assert_eq!(found, vec![1, 2]);
    assert!(results[0].distance <= results[1].distance);
}

#[test]
fn search_returns_min_of_k_and_len() {
    let index = animal_index(Path::new("unused"));

    for k in 0..=3 {
        let results = index.search("rockets", k).expect("search succeeds");
        assert_eq!(results.len(), k);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    let results = index.search("rockets", 10).expect("search succeeds");
    assert_eq!(results.len(), 3);
    assert_eq!(ids(&results)[0], 3);
}

#[test]
fn results_are_copies_of_metadata() {
    let index = animal_index(Path::new("unused"));

    let mut results = index.search("cats", 1).expect("search succeeds");
    results[0]
        .metadata
        .insert("content".to_string(), json!("tampered"));

    assert_eq!(index.metadata()[0]["content"], json!("cats are mammals"));
    assert!(!index.metadata()[0].contains_key("distance"));
}

#[test]
fn add_extends_searchable_set() {
    let mut index = animal_index(Path::new("unused"));

    index
        .add(
            &documents(&["transformers use attention"]),
            vec![record(4, "transformers use attention")],
        )
        .expect("add succeeds");

    assert_eq!(index.len(), 4);
    let results = index.search("attention", 1).expect("search succeeds");
    assert_eq!(ids(&results), vec![4]);

    let results = index.search("rockets", 1).expect("search succeeds");
    assert_eq!(ids(&results), vec![3]);
}

#[test]
fn add_before_create_is_not_initialized() {
    let mut index = SimilarityIndex::new(ConceptEmbedder, "unused");

    let err = index
        .add(&documents(&["cats"]), vec![record(1, "cats")])
        .expect_err("add requires an index");
    assert!(matches!(err, ReviewError::NotInitialized));

    assert!(matches!(
        index.search("cats", 1),
        Err(ReviewError::NotInitialized)
    ));
    assert!(matches!(index.save(), Err(ReviewError::NotInitialized)));
}

#[test]
fn length_mismatch_is_rejected() {
    let mut index = SimilarityIndex::new(ConceptEmbedder, "unused");

    let err = index
        .create(&documents(&["cats", "dogs"]), vec![record(1, "cats")])
        .expect_err("lengths differ");
    assert!(matches!(
        err,
        ReviewError::LengthMismatch {
            documents: 2,
            metadata: 1
        }
    ));
    assert!(!index.is_initialized());
}

#[test]
fn empty_create_is_rejected() {
    let mut index = SimilarityIndex::new(ConceptEmbedder, "unused");
    assert!(matches!(
        index.create(&[], Vec::new()),
        Err(ReviewError::Embedding(_))
    ));
}

#[test]
fn dimension_mismatch_on_load_then_add() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let prefix = temp_dir.path().join("papers");
    animal_index(&prefix).save().expect("save succeeds");

    let mut index = SimilarityIndex::new(FixedDimensionEmbedder(8), &prefix);
    index.load().expect("load succeeds");

    let err = index
        .add(&documents(&["anything"]), vec![record(9, "anything")])
        .expect_err("dimension differs");
    assert!(matches!(
        err,
        ReviewError::DimensionMismatch {
            expected: 4,
            found: 8
        }
    ));
    assert_eq!(index.len(), 3, "metadata must stay aligned");
}

#[test]
fn embedder_failures_surface() {
    let mut index = SimilarityIndex::new(UnreachableBackend, "unused");
    assert!(matches!(
        index.create(&documents(&["cats"]), vec![record(1, "cats")]),
        Err(ReviewError::Connection(_))
    ));
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let prefix = temp_dir.path().join("papers");
    let original = animal_index(&prefix);
    original.save().expect("save succeeds");

    let mut restored = SimilarityIndex::new(ConceptEmbedder, &prefix);
    assert!(!restored.is_initialized());
    restored.load().expect("load succeeds");

    assert_eq!(restored.dimension(), Some(4));
    assert_eq!(
        restored.search("feline pet", 3).expect("search succeeds"),
        original.search("feline pet", 3).expect("search succeeds")
    );
}

#[test]
fn load_missing_snapshot_is_not_found() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut index = SimilarityIndex::new(ConceptEmbedder, temp_dir.path().join("absent"));

    assert!(matches!(index.load(), Err(ReviewError::IndexNotFound(_))));
}

#[test]
fn create_replaces_previous_state() {
    let mut index = animal_index(Path::new("unused"));

    index
        .create(&documents(&["attention"]), vec![record(7, "attention")])
        .expect("create succeeds");

    assert_eq!(index.len(), 1);
    assert_eq!(ids(&index.search("cats", 5).expect("search succeeds")), vec![7]);
}

#[test]
fn stored_distance_key_is_replaced_by_score() {
    let mut index = SimilarityIndex::new(ConceptEmbedder, "unused");
    let mut metadata = record(1, "cats");
    metadata.insert("distance".to_string(), json!("stored"));
    index
        .create(&documents(&["cats"]), vec![metadata])
        .expect("create succeeds");

    let results = index.search("rockets", 1).expect("search succeeds");
    let result = &results[0];

    assert_eq!(result.get("distance"), None);
    assert_eq!(result.get("id"), Some(&json!(1)));

    let serialized = serde_json::to_string(result).expect("result serializes");
    assert_eq!(serialized.matches("\"distance\"").count(), 1);
    let restored: SearchResult = serde_json::from_str(&serialized).expect("result deserializes");
    assert_eq!(&restored, result);

    // stored metadata keeps its own key
    assert_eq!(index.metadata()[0]["distance"], json!("stored"));
}
