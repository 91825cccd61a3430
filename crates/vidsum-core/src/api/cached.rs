use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use super::traits::{ApiInfo, SummarizerApi};
use crate::config::{CacheConfig, Lang};
use crate::error::Result;
use crate::types::{QuizQuestion, SummarizeReply};

/// Memo key for a translation.
///
/// Opaque MD5 of the source text and target language, so keys stay
/// fixed-length however long the summary is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    hash: String,
}

impl TranslationKey {
    pub fn new(text: &str, target: &Lang) -> Self {
        // Null separator keeps ("ab", "c") and ("a", "bc") apart
        let combined = format!("{}\0{}", text, target.as_str());
        Self {
            hash: format!("{:x}", md5::compute(combined.as_bytes())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

/// Wraps an API and memoises successful translations in memory.
///
/// Summaries are not memoised: resubmitting the same video must reach the
/// server. Failed translations are never stored.
pub struct CachedApi<A> {
    inner: A,
    translations: Cache<String, String>,
}

impl<A: SummarizerApi> CachedApi<A> {
    pub fn new(inner: A, config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_entries);
        if config.ttl_seconds > 0 {
            builder = builder.time_to_live(Duration::from_secs(config.ttl_seconds));
        }

        Self {
            inner,
            translations: builder.build(),
        }
    }
}

#[async_trait]
impl<A: SummarizerApi> SummarizerApi for CachedApi<A> {
    fn info(&self) -> ApiInfo {
        self.inner.info()
    }

    async fn summarize(&self, url: &str, language: &Lang) -> Result<SummarizeReply> {
        self.inner.summarize(url, language).await
    }

    async fn quiz(&self, summary: &str) -> Result<Vec<QuizQuestion>> {
        self.inner.quiz(summary).await
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let key = TranslationKey::new(text, target).to_string();
        if let Some(hit) = self.translations.get(&key).await {
            debug!("Translation cache hit for {}", target);
            return Ok(hit);
        }

        let translated = self.inner.translate(text, target).await?;
        self.translations.insert(key, translated.clone()).await;
        Ok(translated)
    }

    async fn chat(&self, question: &str, summary: &str) -> Result<String> {
        self.inner.chat(question, summary).await
    }
}
