use super::*;
use crate::index::SimilarityIndex;
use crate::testing::{CannedSource, EchoGenerator, UnreachableBackend};

fn paper(title: &str, abstract_text: &str) -> Paper {
    Paper {
        title: title.to_string(),
        authors: vec!["Test Author".to_string()],
        abstract_text: Some(abstract_text.to_string()),
        ..Paper::default()
    }
}

#[test]
fn summarize_paper_with_context() {
    let source = CannedSource::new(&["Prior work on transformers."]);
    let generator = EchoGenerator::default();
    let summarizer = Summarizer::new(RetrievalAugmenter::new(&source), &generator, "phi3");

    let result = summarizer.summarize_paper(&paper("Test Paper", "This is a test abstract"));

    assert_eq!(result, Outcome::Fresh("generated by phi3".to_string()));
    assert_eq!(
        *source.queries.borrow(),
        vec![("Test Paper This is a test abstract".to_string(), 3)]
    );

    let calls = generator.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (prompt, model) = &calls[0];
    assert_eq!(model, "phi3");
    assert!(prompt.starts_with("Context information:\nPrior work on transformers."));
    assert!(prompt.contains("Title: Test Paper"));
    assert!(prompt.contains("Authors: Test Author"));
}

#[test]
fn compare_query_lists_titles_then_abstracts() {
    let source = CannedSource::new(&[]);
    let generator = EchoGenerator::default();
    let summarizer = Summarizer::new(RetrievalAugmenter::new(&source), &generator, "phi3");

    let result = summarizer.compare_papers(&paper("A", "alpha"), &paper("B", "beta"));

    assert!(!result.is_degraded());
    assert_eq!(
        source.queries.borrow()[0].0,
        "A B alpha beta".to_string()
    );
    let calls = generator.calls.borrow();
    let prompt = &calls[0].0;
    assert!(!prompt.contains("Context information"));
    assert!(prompt.contains("Title: A") && prompt.contains("Title: B"));
}

#[test]
fn generation_failures_return_fixed_messages() {
    let source = CannedSource::new(&["ctx"]);
    let summarizer = Summarizer::new(RetrievalAugmenter::new(&source), UnreachableBackend, "phi3");
    let p = paper("T", "A");

    let cases = [
        (summarizer.summarize_paper(&p), "Error: Unable to summarize the paper."),
        (summarizer.extract_key_points(&p), "Error: Unable to extract key points."),
        (summarizer.compare_papers(&p, &p), "Error: Unable to compare the papers."),
        (
            summarizer.research_questions(&p),
            "Error: Unable to generate research questions.",
        ),
        (
            summarizer.evaluate_methodology(&p),
            "Error: Unable to evaluate the methodology.",
        ),
        (
            summarizer.literature_review_outline("transformers"),
            "Error: Unable to create the literature review outline.",
        ),
    ];

    for (outcome, expected) in cases {
        assert!(outcome.is_degraded());
        assert_eq!(outcome.value(), expected);
        assert!(outcome.reason().is_some_and(|r| r.contains("connection refused")));
    }
}

#[test]
fn retrieval_failure_still_generates() {
    let index = SimilarityIndex::new(UnreachableBackend, "unused");
    let generator = EchoGenerator::default();
    let summarizer = Summarizer::new(RetrievalAugmenter::new(&index), &generator, "llama3");

    let result = summarizer.extract_key_points(&paper("T", "A"));

    assert!(result.is_degraded());
    assert_eq!(result.value(), "generated by llama3");
    let calls = generator.calls.borrow();
    let prompt = &calls[0].0;
    assert!(prompt.contains("Key Points:"));
    assert!(!prompt.contains("Context information"));
}

#[test]
fn outline_queries_by_topic() {
    let source = CannedSource::new(&["survey passage"]);
    let generator = EchoGenerator::default();
    let summarizer = Summarizer::new(RetrievalAugmenter::new(&source), &generator, "phi3");

    summarizer.literature_review_outline("graph learning");

    assert_eq!(source.queries.borrow()[0].0, "graph learning");
    assert!(generator.calls.borrow()[0].0.contains("\"graph learning\""));
}

#[test]
fn custom_templates_are_used() {
    let source = CannedSource::new(&[]);
    let generator = EchoGenerator::default();
    let summarizer = Summarizer::new(RetrievalAugmenter::new(&source), &generator, "phi3")
        .with_templates(
            PromptTemplates::default().with_template(PromptKind::SummarizePaper, "Brief: $title"),
        );

    summarizer.summarize_paper(&paper("Short", "abs"));

    assert_eq!(generator.calls.borrow()[0].0, "Brief: Short");
}

#[test]
fn exposes_model_and_retrieval_settings() {
    let source = CannedSource::new(&[]);
    let summarizer = Summarizer::new(
        RetrievalAugmenter::new(&source).with_context_k(7),
        EchoGenerator::default(),
        "llama3",
    );

    assert_eq!(summarizer.model(), "llama3");
    assert_eq!(summarizer.augmenter().context_k(), 7);

    summarizer.summarize_paper(&paper("T", "A"));
    assert_eq!(source.queries.borrow()[0].1, 7);
}
