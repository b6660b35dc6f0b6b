// Summarizer
// Task-level orchestration: template, retrieval augmentation, one generation call

#[cfg(test)]
mod tests;

use tracing::{debug, warn};

use crate::index::ContextSource;
use crate::ollama::{GenerateOptions, Generator};
use crate::paper::Paper;
use crate::prompts::{PromptFields, PromptKind, PromptTemplates};
use crate::rag::{Outcome, RetrievalAugmenter};

pub struct Summarizer<S, G> {
    augmenter: RetrievalAugmenter<S>,
    generator: G,
    templates: PromptTemplates,
    model: String,
    options: Option<GenerateOptions>,
}

impl<S: ContextSource, G: Generator> Summarizer<S, G> {
    #[inline]
    pub fn new(augmenter: RetrievalAugmenter<S>, generator: G, model: impl Into<String>) -> Self {
        Self {
            augmenter,
            generator,
            templates: PromptTemplates::default(),
            model: model.into(),
            options: None,
        }
    }

    #[inline]
    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Extra generation parameters merged into every request
    #[inline]
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = Some(options);
        self
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    pub fn augmenter(&self) -> &RetrievalAugmenter<S> {
        &self.augmenter
    }

    #[inline]
    pub fn summarize_paper(&self, paper: &Paper) -> Outcome<String> {
        self.run(
            PromptKind::SummarizePaper,
            &PromptFields::for_paper(paper),
            &paper_query(&[paper]),
        )
    }

    #[inline]
    pub fn extract_key_points(&self, paper: &Paper) -> Outcome<String> {
        self.run(
            PromptKind::ExtractKeyPoints,
            &PromptFields::for_paper(paper),
            &paper_query(&[paper]),
        )
    }

    #[inline]
    pub fn compare_papers(&self, first: &Paper, second: &Paper) -> Outcome<String> {
        self.run(
            PromptKind::ComparePapers,
            &PromptFields::for_comparison(first, second),
            &paper_query(&[first, second]),
        )
    }

    #[inline]
    pub fn research_questions(&self, paper: &Paper) -> Outcome<String> {
        self.run(
            PromptKind::ResearchQuestions,
            &PromptFields::for_paper(paper),
            &paper_query(&[paper]),
        )
    }

    #[inline]
    pub fn evaluate_methodology(&self, paper: &Paper) -> Outcome<String> {
        self.run(
            PromptKind::EvaluateMethodology,
            &PromptFields::for_paper(paper),
            &paper_query(&[paper]),
        )
    }

    #[inline]
    pub fn literature_review_outline(&self, topic: &str) -> Outcome<String> {
        self.run(
            PromptKind::LiteratureReviewOutline,
            &PromptFields::for_topic(topic),
            topic,
        )
    }

    fn run(&self, kind: PromptKind, fields: &PromptFields, query: &str) -> Outcome<String> {
        let base_prompt = self.templates.render(kind, fields);
        let enhanced = self.augmenter.enhance_prompt(&base_prompt, query);
        let retrieval_failure = enhanced.reason().map(str::to_string);

        debug!(
            "Dispatching {:?} prompt with fields [{}] ({} chars) to {}",
            kind,
            fields.names(),
            enhanced.value().len(),
            self.model
        );

        match self
            .generator
            .generate(enhanced.value(), &self.model, self.options.as_ref())
        {
            Ok(text) => match retrieval_failure {
                None => Outcome::Fresh(text),
                Some(reason) => Outcome::degraded(text, reason),
            },
            Err(e) => {
                warn!("Generation failed for {:?}: {}", kind, e);
                Outcome::degraded(kind.failure_message().to_string(), e.to_string())
            }
        }
    }
}

/// Titles first, then abstracts, space separated
fn paper_query(papers: &[&Paper]) -> String {
    papers
        .iter()
        .map(|p| p.title.as_str())
        .chain(papers.iter().map(|p| p.abstract_or_empty()))
        .collect::<Vec<_>>()
        .join(" ")
}
