//! HTTP route handlers for the video summarizer web application.
//!
//! All routes return HTML fragments for HTMX consumption, except
//! `/api/state/{session_id}` which returns the session snapshot as JSON.
//! HTML routes use Askama templates from the `templates` module.

mod chat;
mod pages;
mod summary;

pub use chat::send_chat;
pub use pages::{app_page, index};
pub use summary::{answer_quiz, get_state, set_mode, submit_video, translate_summary};

use serde::Deserialize as SerdeDeserialize;
use std::sync::Arc;

use crate::helpers::{OptionExt, RouteResult};
use crate::state::SessionRef;
use crate::templates::{ResultsFragmentTemplate, ResultsView};

/// Form data for the language selector.
#[derive(SerdeDeserialize, Default)]
pub struct TranslateForm {
    #[serde(default)]
    pub target_language: String,
}

/// Form data for the chat input.
#[derive(SerdeDeserialize, Default)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// Build the results view for a session.
pub async fn results_view(session: &SessionRef<'_>) -> RouteResult<ResultsView> {
    let (orchestrator, chat_log, quiz_answers) = session
        .with_session(|s| {
            (
                Arc::clone(&s.orchestrator),
                s.chat_log.clone(),
                s.quiz_answers.clone(),
            )
        })
        .await
        .or_not_found("Session not found")?;

    let snapshot = orchestrator.snapshot().await;
    Ok(ResultsView::new(session.id(), &snapshot, chat_log, &quiz_answers))
}

/// Results fragment with any toasts queued since the last response.
pub async fn results_fragment(session: &SessionRef<'_>) -> RouteResult<ResultsFragmentTemplate> {
    let view = results_view(session).await?;
    let notices = session
        .with_session(|s| s.notices.drain())
        .await
        .unwrap_or_default();

    Ok(ResultsFragmentTemplate { view, notices })
}
