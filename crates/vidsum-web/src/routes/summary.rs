//! Summary routes - submit, translate, mode switch and quiz answers.
//!
//! Every handler here re-renders `#results` so the summary, the language
//! selector and the chat/quiz panel always reflect one snapshot.

use axum::{
    Json,
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, info};
use vidsum_core::{InputForm, InteractionMode, Lang, SessionSnapshot, TranslateOutcome};

use super::{TranslateForm, results_fragment};
use crate::helpers::{OptionExt, ResultExt, RouteResult, retargeted};
use crate::state::AppState;
use crate::templates::{InputErrorTemplate, ResultsFragmentTemplate};

/// Validate the input form and run summarize + quiz.
///
/// HTMX: Replaces `#results`. A rejected form is retargeted into
/// `#input-error` and leaves the previous results untouched.
pub async fn submit_video(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Form(form): Form<InputForm>,
) -> RouteResult<Response> {
    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let submission = form.submission();

    // Keep the field values for resubmission whether or not they validate
    session.with_session_mut(|s| s.form = form).await;

    let submission = match submission {
        Ok(submission) => submission,
        Err(e) => {
            debug!("Rejected submission: {}", e);
            return retargeted(
                &InputErrorTemplate {
                    message: e.to_string(),
                },
                "#input-error",
            );
        }
    };

    let orchestrator = session
        .with_session_mut(|s| {
            s.reset_panels();
            Arc::clone(&s.orchestrator)
        })
        .await
        .or_not_found("Session not found")?;

    // Failures were already pushed to the session's toast queue
    if let Ok(outcome) = orchestrator.submit(&submission).await {
        info!("Submit for session {} finished: {:?}", session_id, outcome);
    }

    Ok(results_fragment(&session).await?.into_response())
}

/// Translate the current summary into the selected language.
///
/// HTMX: Replaces `#results`. On failure the original summary stays and an
/// error toast is appended.
pub async fn translate_summary(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Form(form): Form<TranslateForm>,
) -> RouteResult<ResultsFragmentTemplate> {
    if !vidsum_core::config::is_target_language(&form.target_language) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Unsupported language: {}", form.target_language),
        ));
    }

    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let orchestrator = session
        .with_session(|s| Arc::clone(&s.orchestrator))
        .await
        .or_not_found("Session not found")?;

    match orchestrator
        .change_language(&Lang::new(form.target_language))
        .await
    {
        Ok(TranslateOutcome::Translated) | Err(_) => {}
        Ok(other) => debug!("Translate request ignored: {:?}", other),
    }

    results_fragment(&session).await
}

/// Switch the interaction panel between chat and quiz.
pub async fn set_mode(
    State(state): State<Arc<AppState>>,
    Path((session_id, mode)): Path<(String, String)>,
) -> RouteResult<ResultsFragmentTemplate> {
    let mode: InteractionMode = mode.parse().or_bad_request()?;

    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let orchestrator = session
        .with_session(|s| Arc::clone(&s.orchestrator))
        .await
        .or_not_found("Session not found")?;

    if !orchestrator.set_mode(mode).await {
        debug!("Mode switch ignored, no summary yet");
    }

    results_fragment(&session).await
}

/// Record an answer for one quiz question.
///
/// The first answer sticks; later clicks on the same question are ignored.
pub async fn answer_quiz(
    State(state): State<Arc<AppState>>,
    Path((session_id, question, choice)): Path<(String, usize, usize)>,
) -> RouteResult<ResultsFragmentTemplate> {
    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let orchestrator = session
        .with_session(|s| Arc::clone(&s.orchestrator))
        .await
        .or_not_found("Session not found")?;

    let snapshot = orchestrator.snapshot().await;
    let option_count = snapshot
        .questions
        .get(question)
        .map(|q| q.options.len())
        .or_not_found("Question not found")?;

    if choice >= option_count {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Option {choice} out of range (question has {option_count})"),
        ));
    }

    session
        .with_session_mut(|s| {
            s.quiz_answers.entry(question).or_insert(choice);
        })
        .await;

    results_fragment(&session).await
}

/// Session snapshot as JSON, for scripts and debugging.
pub async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> RouteResult<Json<SessionSnapshot>> {
    let session = state
        .get_session(&session_id)
        .await
        .or_not_found("Session not found")?;

    let orchestrator = session
        .with_session(|s| Arc::clone(&s.orchestrator))
        .await
        .or_not_found("Session not found")?;

    Ok(Json(orchestrator.snapshot().await))
}
