// Prompt templates
// Fixed task templates with `$name` placeholders


use std::collections::BTreeMap;

use itertools::Itertools;

use crate::paper::Paper;

const SUMMARIZE_PAPER: &str = "
Summarize the following academic paper in a concise manner. Focus on the main research question, methodology, key findings, and conclusions. The summary should be about 3-4 sentences long.

Title: $title
Authors: $authors
Abstract: $abstract

Summary:
";

const EXTRACT_KEY_POINTS: &str = "
Extract the 3-5 most important key points from the following academic paper abstract. Each key point should be a single sentence.

Title: $title
Abstract: $abstract

Key Points:
1.
";

const COMPARE_PAPERS: &str = "
Compare and contrast the following two academic papers. Focus on their research questions, methodologies, findings, and conclusions. Highlight any significant agreements or disagreements between the papers.

Paper 1:
Title: $title1
Authors: $authors1
Abstract: $abstract1

Paper 2:
Title: $title2
Authors: $authors2
Abstract: $abstract2

Comparison:
";

const RESEARCH_QUESTIONS: &str = "
Based on the following abstract, generate 3 potential research questions for future studies that build upon or address gaps in this research.

Title: $title
Abstract: $abstract

Potential Research Questions:
1.
";

const EVALUATE_METHODOLOGY: &str = "
Evaluate the research methodology described in the following abstract. Consider the appropriateness of the method for the research question, potential limitations, and suggestions for improvement.

Title: $title
Abstract: $abstract

Methodology Evaluation:
";

const LITERATURE_REVIEW_OUTLINE: &str = "
Create an outline for a literature review on the topic of \"$topic\". The outline should include main sections and subsections, covering key themes, methodologies, findings, and gaps in the current research.

Literature Review Outline:
";

/// Every task the prompting layer knows how to phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    SummarizePaper,
    ExtractKeyPoints,
    ComparePapers,
    ResearchQuestions,
    EvaluateMethodology,
    LiteratureReviewOutline,
}

impl PromptKind {
    pub const ALL: [PromptKind; 6] = [
        PromptKind::SummarizePaper,
        PromptKind::ExtractKeyPoints,
        PromptKind::ComparePapers,
        PromptKind::ResearchQuestions,
        PromptKind::EvaluateMethodology,
        PromptKind::LiteratureReviewOutline,
    ];

    /// Text returned in place of a completion when generation fails
    #[inline]
    pub fn failure_message(self) -> &'static str {
        match self {
            PromptKind::SummarizePaper => "Error: Unable to summarize the paper.",
            PromptKind::ExtractKeyPoints => "Error: Unable to extract key points.",
            PromptKind::ComparePapers => "Error: Unable to compare the papers.",
            PromptKind::ResearchQuestions => "Error: Unable to generate research questions.",
            PromptKind::EvaluateMethodology => "Error: Unable to evaluate the methodology.",
            PromptKind::LiteratureReviewOutline => {
                "Error: Unable to create the literature review outline."
            }
        }
    }
}

/// Immutable set of template texts, one per [`PromptKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    summarize_paper: String,
    extract_key_points: String,
    compare_papers: String,
    research_questions: String,
    evaluate_methodology: String,
    literature_review_outline: String,
}

impl Default for PromptTemplates {
    #[inline]
    fn default() -> Self {
        Self {
            summarize_paper: SUMMARIZE_PAPER.to_string(),
            extract_key_points: EXTRACT_KEY_POINTS.to_string(),
            compare_papers: COMPARE_PAPERS.to_string(),
            research_questions: RESEARCH_QUESTIONS.to_string(),
            evaluate_methodology: EVALUATE_METHODOLOGY.to_string(),
            literature_review_outline: LITERATURE_REVIEW_OUTLINE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Replace the text for one task, keeping the others
    #[inline]
    pub fn with_template(mut self, kind: PromptKind, text: impl Into<String>) -> Self {
        let slot = match kind {
            PromptKind::SummarizePaper => &mut self.summarize_paper,
            PromptKind::ExtractKeyPoints => &mut self.extract_key_points,
            PromptKind::ComparePapers => &mut self.compare_papers,
            PromptKind::ResearchQuestions => &mut self.research_questions,
            PromptKind::EvaluateMethodology => &mut self.evaluate_methodology,
            PromptKind::LiteratureReviewOutline => &mut self.literature_review_outline,
        };
        *slot = text.into();
        self
    }

    #[inline]
    pub fn template(&self, kind: PromptKind) -> &str {
        match kind {
            PromptKind::SummarizePaper => &self.summarize_paper,
            PromptKind::ExtractKeyPoints => &self.extract_key_points,
            PromptKind::ComparePapers => &self.compare_papers,
            PromptKind::ResearchQuestions => &self.research_questions,
            PromptKind::EvaluateMethodology => &self.evaluate_methodology,
            PromptKind::LiteratureReviewOutline => &self.literature_review_outline,
        }
    }

    #[inline]
    pub fn render(&self, kind: PromptKind, fields: &PromptFields) -> String {
        substitute(self.template(kind), fields)
    }
}

/// Placeholder values for a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFields(BTreeMap<String, String>);

impl PromptFields {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// `title`, `authors` and `abstract` of one paper
    #[inline]
    pub fn for_paper(paper: &Paper) -> Self {
        Self::new()
            .with("title", &paper.title)
            .with("authors", paper.authors_line())
            .with("abstract", paper.abstract_or_empty())
    }

    /// The fields of two papers, suffixed `1` and `2`
    #[inline]
    pub fn for_comparison(first: &Paper, second: &Paper) -> Self {
        [first, second]
            .into_iter()
            .zip(1..)
            .fold(Self::new(), |fields, (paper, n)| {
                fields
                    .with(format!("title{}", n), &paper.title)
                    .with(format!("authors{}", n), paper.authors_line())
                    .with(format!("abstract{}", n), paper.abstract_or_empty())
            })
    }

    #[inline]
    pub fn for_topic(topic: &str) -> Self {
        Self::new().with("topic", topic)
    }

    /// Names present in this field set, comma separated
    #[inline]
    pub fn names(&self) -> String {
        self.0.keys().join(", ")
    }
}

/// Substitute `$name` and `${name}` placeholders. `$$` yields a literal `$`;
/// placeholders without a value are left as written.
fn substitute(template: &str, fields: &PromptFields) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
            continue;
        }

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) if is_identifier(&braced[..end]) => (&braced[..end], end + 2),
                _ => ("", 0),
            }
        } else {
            let len = identifier_len(after);
            (&after[..len], len)
        };

        match fields.get(name).filter(|_| consumed > 0) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[dollar..=dollar + consumed]),
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

fn identifier_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| *c != '_' && !c.is_ascii_alphanumeric())
        .map_or(text.len(), |(i, _)| i)
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && identifier_len(text) == text.len()
}
