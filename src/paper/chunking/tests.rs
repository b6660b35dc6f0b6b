use super::estimate_token_count as estimate_token_count_impl;
use super::*;

fn small_config() -> ChunkingConfig {
    ChunkingConfig {
        target_chunk_size: 20,
        max_chunk_size: 40,
    }
}

#[test]
fn estimate_token_count() {
    assert_eq!(estimate_token_count_impl("hello world"), 2);
    assert_eq!(estimate_token_count_impl("This is a test."), 5);
    assert_eq!(estimate_token_count_impl(""), 0);
}

#[test]
fn short_text_is_single_chunk() {
    let chunks = chunk_text(
        "Transformers replace recurrence with attention.",
        &ChunkingConfig::default(),
    );

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].chunk_index, 0);
    assert_eq!(
        chunks[0].content,
        "Transformers replace recurrence with attention."
    );
}

#[test]
fn empty_text_has_no_chunks() {
    assert!(chunk_text("  \n\n \n\n", &ChunkingConfig::default()).is_empty());
}

#[test]
fn paragraphs_are_grouped_up_to_target() {
    let paragraph = "We evaluate the model on three benchmarks.";
    let text = [paragraph; 6].join("\n\n");

    let chunks = chunk_text(&text, &small_config());

    assert!(chunks.len() > 1);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, i);
        assert!(chunk.token_count <= small_config().max_chunk_size);
        assert!(chunk.content.contains("benchmarks"));
    }
}

#[test]
fn oversized_paragraph_is_split_by_sentence() {
    let paragraph = "Attention weights are computed per head and averaged. ".repeat(12);
    let chunks = chunk_text(&paragraph, &small_config());

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.content.ends_with('.')));
}

#[test]
fn oversized_sentence_is_split_by_word() {
    let sentence = "token ".repeat(200);
    let chunks = chunk_text(&sentence, &small_config());

    assert!(chunks.len() > 1);
    assert!(
        chunks
            .iter()
            .all(|c| c.token_count <= small_config().max_chunk_size)
    );
    let words: usize = chunks
        .iter()
        .map(|c| c.content.split_whitespace().count())
        .sum();
    assert_eq!(words, 200);
}
