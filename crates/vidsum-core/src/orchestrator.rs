//! Result orchestration: the summarize → quiz workflow plus the translate and
//! chat request lines that act on the current summary.
//!
//! ## State machine
//!
//! ```text
//! idle | ready | error --submit--> summarizing
//! summarizing --ok--> fetching_quiz --ok|soft fail--> ready
//! summarizing --fail--> error
//! ready --change_language--> translating --ok|fail--> ready
//! ```
//!
//! Chat requests never transition the machine and never touch the loading
//! flag.
//!
//! ## Superseded requests
//!
//! Every submit bumps a generation counter. A response that comes back after
//! a newer submit started is dropped, so a slow reply from an old video can
//! never overwrite (or attach quiz questions to) the current one.
//!
//! ## Locking
//!
//! The snapshot lock is only held in short synchronous sections, never
//! across a request `.await`.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::api::SummarizerApi;
use crate::config::Lang;
use crate::error::Result;
use crate::input::Submission;
use crate::notify::{Notice, Notifier};
use crate::types::{QuizQuestion, Summary};
use crate::util::truncate_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Idle,
    Summarizing,
    FetchingQuiz,
    Ready,
    Translating,
    Error,
}

impl WorkflowState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Summarizing => "summarizing",
            Self::FetchingQuiz => "fetching_quiz",
            Self::Ready => "ready",
            Self::Translating => "translating",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which interactive panel sits under the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Chat,
    Quiz,
}

impl InteractionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Quiz => "quiz",
        }
    }
}

impl std::str::FromStr for InteractionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "quiz" => Ok(Self::Quiz),
            other => Err(format!("unknown interaction mode: {other}")),
        }
    }
}

/// Read-only copy of everything the presentation layer renders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSnapshot {
    pub state: WorkflowState,
    pub summary: Option<Summary>,
    pub transcription: Option<String>,
    pub questions: Vec<QuizQuestion>,
    pub mode: InteractionMode,
    /// Gates the submit form and language selector
    pub loading: bool,
    pub generation: u64,
}

impl SessionSnapshot {
    pub const fn has_summary(&self) -> bool {
        self.summary.is_some()
    }

    pub fn summary_text(&self) -> &str {
        self.summary.as_ref().map_or("", |s| s.text.as_str())
    }

    fn transition(&mut self, to: WorkflowState) {
        debug!("workflow {} -> {} (generation {})", self.state, to, self.generation);
        self.state = to;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Summary stored; `quiz_loaded` is false when the quiz soft-failed or was skipped
    Ready { quiz_loaded: bool },
    /// A newer submit started before this one finished; its results were dropped
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateOutcome {
    Translated,
    /// Nothing to translate yet; no request was sent
    NoSummary,
    /// Another primary request holds the loading flag; no request was sent
    Busy,
    /// A newer submit replaced the summary while translating; the reply was dropped
    Superseded,
}

/// Owns the workflow state for one user session.
///
/// `submit`, `change_language`, `send_chat_message` and `set_mode` are the
/// only mutators.
pub struct Orchestrator {
    api: Arc<dyn SummarizerApi>,
    notifier: Arc<dyn Notifier>,
    inner: RwLock<SessionSnapshot>,
}

impl Orchestrator {
    pub fn new(api: Arc<dyn SummarizerApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            inner: RwLock::new(SessionSnapshot::default()),
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn state(&self) -> WorkflowState {
        self.inner.read().await.state
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.loading
    }

    /// Summarize a video, then fetch a quiz for the fresh summary.
    ///
    /// Clears the previous summary and questions before anything is sent.
    /// Summarize failures are notified and returned; quiz failures are only
    /// logged.
    pub async fn submit(&self, submission: &Submission) -> Result<SubmitOutcome> {
        let generation = {
            let mut s = self.inner.write().await;
            s.generation += 1;
            s.summary = None;
            s.transcription = None;
            s.questions.clear();
            s.loading = true;
            s.transition(WorkflowState::Summarizing);
            s.generation
        };

        info!(
            "Summarizing {} ({})",
            submission.url, submission.source_language
        );

        let reply = match self
            .api
            .summarize(&submission.url, &submission.source_language)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                error!("Summarization error: {}", e);
                {
                    let mut s = self.inner.write().await;
                    if s.generation != generation {
                        debug!("Dropping failed summarize from generation {}", generation);
                        return Ok(SubmitOutcome::Superseded);
                    }
                    s.loading = false;
                    s.transition(WorkflowState::Error);
                }
                self.notifier.notify(Notice::error(e.user_message()));
                return Err(e);
            }
        };

        let summary_text = reply.summary;
        {
            let mut s = self.inner.write().await;
            if s.generation != generation {
                debug!("Dropping summary from generation {}", generation);
                return Ok(SubmitOutcome::Superseded);
            }
            s.transcription = reply.transcription;

            if summary_text.is_empty() {
                warn!("Server returned an empty summary, skipping quiz");
                s.loading = false;
                s.transition(WorkflowState::Ready);
                return Ok(SubmitOutcome::Ready { quiz_loaded: false });
            }

            s.summary = Some(Summary::new(summary_text.clone()));
            s.transition(WorkflowState::FetchingQuiz);
        }

        debug!("Fetching quiz for: {}", truncate_text(&summary_text, 60));

        let questions = match self.api.quiz(&summary_text).await {
            Ok(questions) => Some(questions),
            Err(e) => {
                warn!("Quiz generation error: {}", e);
                None
            }
        };

        let mut s = self.inner.write().await;
        if s.generation != generation {
            debug!("Dropping quiz from generation {}", generation);
            return Ok(SubmitOutcome::Superseded);
        }
        let quiz_loaded = questions.is_some();
        if let Some(questions) = questions {
            info!("Loaded {} quiz questions", questions.len());
            s.questions = questions;
        }
        s.loading = false;
        s.transition(WorkflowState::Ready);

        Ok(SubmitOutcome::Ready { quiz_loaded })
    }

    /// Translate the current summary into `target`, replacing it on success.
    ///
    /// Quiz questions are left in their original language.
    pub async fn change_language(&self, target: &Lang) -> Result<TranslateOutcome> {
        let (text, generation) = {
            let mut s = self.inner.write().await;
            let Some(summary) = &s.summary else {
                debug!("No summary to translate");
                return Ok(TranslateOutcome::NoSummary);
            };
            if s.loading {
                debug!("Ignoring translate to {} while {}", target, s.state);
                return Ok(TranslateOutcome::Busy);
            }
            let text = summary.text.clone();
            s.loading = true;
            s.transition(WorkflowState::Translating);
            (text, s.generation)
        };

        info!("Translating summary to {}", target);

        match self.api.translate(&text, target).await {
            Ok(translated) => {
                let mut s = self.inner.write().await;
                if s.generation != generation {
                    debug!("Dropping translation from generation {}", generation);
                    return Ok(TranslateOutcome::Superseded);
                }
                s.summary = Some(Summary::new(translated));
                s.loading = false;
                s.transition(WorkflowState::Ready);
                Ok(TranslateOutcome::Translated)
            }
            Err(e) => {
                error!("Translation error: {}", e);
                {
                    let mut s = self.inner.write().await;
                    if s.generation != generation {
                        return Ok(TranslateOutcome::Superseded);
                    }
                    s.loading = false;
                    s.transition(WorkflowState::Ready);
                }
                self.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Ask a question about the current summary.
    ///
    /// Independent of the loading flag and workflow state. On failure the
    /// error is notified and also returned for the chat panel to show inline.
    pub async fn send_chat_message(&self, message: &str) -> Result<String> {
        let summary = self.inner.read().await.summary_text().to_string();

        match self.api.chat(message, &summary).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!("Chat error: {}", e);
                self.notifier.notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    /// Switch between chat and quiz. Ignored until a summary exists.
    pub async fn set_mode(&self, mode: InteractionMode) -> bool {
        let mut s = self.inner.write().await;
        if s.summary.is_none() {
            return false;
        }
        s.mode = mode;
        true
    }
}
