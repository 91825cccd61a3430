use async_trait::async_trait;

use crate::config::Lang;
use crate::error::Result;
use crate::types::{QuizQuestion, SummarizeReply};

/// Information about an API backend
#[derive(Debug, Clone)]
pub struct ApiInfo {
    /// Human-readable name
    pub name: &'static str,
    /// Base URL requests are sent to, if any
    pub base_url: Option<String>,
}

/// The remote summarization service.
///
/// Every method is one request; none of them retry.
#[async_trait]
pub trait SummarizerApi: Send + Sync {
    /// Get information about this backend
    fn info(&self) -> ApiInfo;

    /// Get the backend name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Turn a video URL into summary text
    async fn summarize(&self, url: &str, language: &Lang) -> Result<SummarizeReply>;

    /// Generate comprehension questions for a summary
    async fn quiz(&self, summary: &str) -> Result<Vec<QuizQuestion>>;

    /// Translate text into `target`
    async fn translate(&self, text: &str, target: &Lang) -> Result<String>;

    /// Answer a free-form question grounded in `summary`
    async fn chat(&self, question: &str, summary: &str) -> Result<String>;
}
