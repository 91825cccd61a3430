//! Video Summarizer Core Library
//!
//! Client-side half of the video summarizer:
//! - Input validation for video URLs and languages
//! - A typed client for the remote summarize/quiz/translate/chat API
//! - The result orchestrator that sequences those calls per session
//! - Notification effects for whichever front-end renders the results

pub mod api;
pub mod config;
pub mod error;
pub mod input;
pub mod notify;
pub mod orchestrator;
pub mod types;
pub mod util;

pub use api::{ApiInfo, CachedApi, Endpoint, HttpApi, SummarizerApi, create_api};
pub use config::{
    ApiConfig, AppConfig, CacheConfig, Lang, LanguageOption, source_languages, target_languages,
    DEFAULT_API_BASE, DEFAULT_SOURCE_LANG,
};
pub use error::{Error, Result, ValidationError};
pub use input::{InputForm, Submission};
pub use notify::{Notice, NoticeKind, NoticeQueue, Notifier, TracingNotifier};
pub use orchestrator::{
    InteractionMode, Orchestrator, SessionSnapshot, SubmitOutcome, TranslateOutcome,
    WorkflowState,
};
pub use types::{QuizQuestion, SummarizeReply, Summary};

use std::sync::Arc;

/// Build an orchestrator talking to the configured API.
pub fn create_orchestrator(
    config: &AppConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<Orchestrator> {
    let api = create_api(config)?;
    Ok(Orchestrator::new(api, notifier))
}
