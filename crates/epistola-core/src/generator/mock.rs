//! Scripted generator for tests and offline runs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::{GenerationError, GenerationRequest, GenerationResult, Generator};

#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    responses: HashMap<String, Vec<String>>,
    default_response: Vec<String>,
    failing: HashSet<String>,
    calls: Arc<AtomicUsize>,
}

impl MockGenerator {
    /// Returns `sequences` for every input.
    #[must_use]
    pub fn with_default(sequences: Vec<String>) -> Self {
        Self {
            default_response: sequences,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_response(mut self, text: impl Into<String>, sequences: Vec<String>) -> Self {
        self.responses.insert(text.into(), sequences);
        self
    }

    #[must_use]
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing.insert(text.into());
        self
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(&request.text) {
            return Err(GenerationError::Unavailable("mock failure".into()));
        }

        let sequences = self
            .responses
            .get(&request.text)
            .unwrap_or(&self.default_response)
            .iter()
            .take(request.params.num_return_sequences)
            .cloned()
            .collect();
        Ok(sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GenerationParams;

    #[tokio::test]
    async fn test_scripted_and_default_responses() {
        let mock = MockGenerator::with_default(vec!["default".into()])
            .with_response("known", vec!["a".into(), "b".into()]);

        let known = GenerationRequest::new("known", GenerationParams::default());
        let other = GenerationRequest::new("other", GenerationParams::default());

        assert_eq!(mock.generate(&known).await.unwrap(), vec!["a", "b"]);
        assert_eq!(mock.generate(&other).await.unwrap(), vec!["default"]);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_respects_sequence_count() {
        let mock = MockGenerator::with_default(vec!["1".into(), "2".into(), "3".into(), "4".into()]);
        let request = GenerationRequest::new("x", GenerationParams::default());

        assert_eq!(mock.generate(&request).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_failing_input() {
        let mock = MockGenerator::default().failing_on("bad");
        let request = GenerationRequest::new("bad", GenerationParams::default());

        assert!(mock.generate(&request).await.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
