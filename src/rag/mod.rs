// Retrieval augmentation
// Turns a free-text query into a context block and splices it into prompts


use tracing::{debug, warn};

use crate::index::ContextSource;

/// Passages pulled into a prompt when no count is configured; default for
/// `[index] context_k`
pub const DEFAULT_CONTEXT_K: usize = 3;

/// Result of an operation that falls back instead of failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation completed normally
    Fresh(T),
    /// A sub-operation failed and `value` is the fallback
    Degraded { value: T, reason: String },
}

impl<T> Outcome<T> {
    #[inline]
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn value(&self) -> &T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    #[inline]
    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(value) | Self::Degraded { value, .. } => value,
        }
    }

    #[inline]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    #[inline]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Fresh(_) => None,
            Self::Degraded { reason, .. } => Some(reason),
        }
    }

    /// Transform the value, keeping any degradation
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Fresh(value) => Outcome::Fresh(f(value)),
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
        }
    }
}

/// Bridges queries to context strings over any [`ContextSource`]
pub struct RetrievalAugmenter<S> {
    source: S,
    context_k: usize,
}

impl<S: ContextSource> RetrievalAugmenter<S> {
    #[inline]
    pub fn new(source: S) -> Self {
        Self {
            source,
            context_k: DEFAULT_CONTEXT_K,
        }
    }

    #[inline]
    pub fn with_context_k(mut self, context_k: usize) -> Self {
        self.context_k = context_k;
        self
    }

    #[inline]
    pub fn context_k(&self) -> usize {
        self.context_k
    }

    /// Newline-joined `content` of the `k` nearest passages, nearest first.
    ///
    /// Search failures are logged and yield a degraded empty context.
    #[inline]
    pub fn get_relevant_context(&self, query: &str, k: usize) -> Outcome<String> {
        match self.source.search(query, k) {
            Ok(results) => {
                debug!("Retrieved {} passages for context", results.len());
                Outcome::Fresh(
                    results
                        .iter()
                        .map(|result| result.content())
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
            Err(e) => {
                warn!("Error in retrieving context: {}", e);
                Outcome::degraded(String::new(), e.to_string())
            }
        }
    }

    /// Prefix `base_prompt` with retrieved context, or return it untouched
    /// when there is none
    #[inline]
    pub fn enhance_prompt(&self, base_prompt: &str, query: &str) -> Outcome<String> {
        self.get_relevant_context(query, self.context_k)
            .map(|context| {
                if context.is_empty() {
                    base_prompt.to_string()
                } else {
                    format!(
                        "Context information:\n{}\n\nBased on the above context and your knowledge, {}",
                        context, base_prompt
                    )
                }
            })
    }
}
