use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;
use vidsum_core::{
    AppConfig, InputForm, NoticeQueue, Notifier, Orchestrator, SummarizerApi, create_api,
};

/// Sessions older than this are dropped by the cleanup task
pub const SESSION_MAX_AGE: Duration = Duration::from_secs(3600);

/// One exchange in the chat panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub question: String,
    /// Answer text, or the failure message when `is_error` is set
    pub answer: String,
    pub is_error: bool,
}

impl ChatEntry {
    pub fn answered(question: String, answer: String) -> Self {
        Self {
            question,
            answer,
            is_error: false,
        }
    }

    pub fn failed(question: String, message: String) -> Self {
        Self {
            question,
            answer: message,
            is_error: true,
        }
    }
}

/// Browser session: one orchestrator plus the panel-local UI state.
pub struct Session {
    pub orchestrator: Arc<Orchestrator>,
    /// Pending toasts, drained into the next rendered fragment
    pub notices: Arc<NoticeQueue>,
    /// Last submitted form values, kept for resubmission
    pub form: InputForm,
    pub chat_log: Vec<ChatEntry>,
    /// Quiz question index -> chosen option index
    pub quiz_answers: HashMap<usize, usize>,
    pub created_at: Instant,
}

impl Session {
    /// Forget chat and quiz panel state (a new summary is on its way).
    pub fn reset_panels(&mut self) {
        self.chat_log.clear();
        self.quiz_answers.clear();
    }
}

/// Global application state
pub struct AppState {
    /// Active sessions indexed by UUID
    sessions: RwLock<HashMap<Uuid, Session>>,
    /// Shared API client (translation memo included)
    api: Arc<dyn SummarizerApi>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let api = create_api(&config)
            .map_err(|e| anyhow::anyhow!("Failed to create API client: {e}"))?;
        Ok(Self::with_api(config, api))
    }

    pub fn with_api(config: AppConfig, api: Arc<dyn SummarizerApi>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            api,
            config,
        }
    }

    /// Create a new session with an empty orchestrator.
    ///
    /// Returns the session ID as a string (for URL embedding).
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4();
        let notices = Arc::new(NoticeQueue::new());
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&self.api),
            Arc::clone(&notices) as Arc<dyn Notifier>,
        ));

        let session = Session {
            orchestrator,
            notices,
            form: InputForm {
                url: String::new(),
                language: Some(self.config.default_source_lang.to_string()),
            },
            chat_log: Vec::new(),
            quiz_answers: HashMap::new(),
            created_at: Instant::now(),
        };

        self.sessions.write().await.insert(id, session);
        id.to_string()
    }

    /// Get a session by ID string.
    ///
    /// Returns `None` if the ID is not a valid UUID or session doesn't exist.
    pub async fn get_session(&self, id: &str) -> Option<SessionRef<'_>> {
        let uuid = Uuid::parse_str(id).ok()?;
        let sessions = self.sessions.read().await;
        if sessions.contains_key(&uuid) {
            Some(SessionRef {
                id: uuid,
                state: self,
            })
        } else {
            None
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions older than [`SESSION_MAX_AGE`]
    pub async fn cleanup_old_sessions(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();

        sessions.retain(|_, session| now.duration_since(session.created_at) < SESSION_MAX_AGE);

        before - sessions.len()
    }
}

/// A borrowed reference to a session that provides safe access patterns.
///
/// Locks are only taken inside the synchronous closures passed to
/// `with_session`/`with_session_mut`, so no guard is ever held across an
/// `.await`. Long-running work (API calls) clones the `Arc<Orchestrator>` out
/// first and awaits outside the lock.
///
/// ```ignore
/// let orchestrator = session.with_session(|s| Arc::clone(&s.orchestrator)).await?;
/// orchestrator.submit(&submission).await;
/// ```
pub struct SessionRef<'a> {
    id: Uuid,
    state: &'a AppState,
}

impl SessionRef<'_> {
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    /// Access session data immutably within a closure.
    pub async fn with_session<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Session) -> R,
    {
        let sessions = self.state.sessions.read().await;
        sessions.get(&self.id).map(f)
    }

    /// Access session data mutably within a closure.
    pub async fn with_session_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.state.sessions.write().await;
        sessions.get_mut(&self.id).map(f)
    }
}
