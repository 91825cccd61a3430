//! Page routes - full HTML page renders.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use super::results_view;
use crate::state::AppState;
use crate::templates::AppTemplate;

/// Landing route: start a fresh session and send the browser to it.
pub async fn index(State(state): State<Arc<AppState>>) -> Redirect {
    let session_id = state.create_session().await;
    Redirect::to(&format!("/app/{session_id}"))
}

/// Full app page for a session (direct URL access and reloads).
///
/// Unknown or expired sessions are sent back to `/` for a new one.
pub async fn app_page(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session) = state.get_session(&session_id).await else {
        return Redirect::to("/").into_response();
    };

    let Some((form, notices)) = session
        .with_session(|s| (s.form.clone(), s.notices.drain()))
        .await
    else {
        return Redirect::to("/").into_response();
    };

    match results_view(&session).await {
        Ok(view) => AppTemplate::new(&form, view, notices).into_response(),
        Err(e) => e.into_response(),
    }
}
