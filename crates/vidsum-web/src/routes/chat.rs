//! Chat route - one question/answer exchange per request.

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::ChatForm;
use crate::helpers::{OptionExt, RouteResult};
use crate::state::{AppState, ChatEntry};
use crate::templates::ChatMessageTemplate;

/// Ask a question about the current summary.
///
/// HTMX: Appends to `#chat-log` (`hx-swap="beforeend"`). Not gated by the
/// loading flag. Empty messages produce `204 No Content` and no request.
pub async fn send_chat(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Form(form): Form<ChatForm>,
) -> RouteResult<Response> {
    let message = form.message.trim().to_string();
    if message.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let orchestrator = session
        .with_session(|s| Arc::clone(&s.orchestrator))
        .await
        .or_not_found("Session not found")?;

    let entry = match orchestrator.send_chat_message(&message).await {
        Ok(answer) => ChatEntry::answered(message, answer),
        Err(e) => ChatEntry::failed(message, e.user_message()),
    };

    let notices = session
        .with_session_mut(|s| {
            s.chat_log.push(entry.clone());
            s.notices.drain()
        })
        .await
        .unwrap_or_default();

    Ok(ChatMessageTemplate { entry, notices }.into_response())
}
