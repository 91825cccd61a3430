//! Integration tests for vidsum-core
//!
//! These tests drive the orchestrator against a mock API:
//! - summarize → quiz sequencing and the data each request carries
//! - soft quiz failures vs. notified request failures
//! - translate and chat request lines
//! - responses from superseded submissions being dropped

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use vidsum_core::{
    ApiInfo, Error, InteractionMode, Lang, NoticeKind, NoticeQueue, Orchestrator, QuizQuestion,
    Result, Submission, SubmitOutcome, SummarizeReply, SummarizerApi, TranslateOutcome,
    ValidationError, WorkflowState,
};

// =============================================================================
// Mock API for Testing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Summarize { url: String, language: String },
    Quiz { summary: String },
    Translate { text: String, target: String },
    Chat { question: String, summary: String },
}

/// Records every request and answers from canned data without network calls.
///
/// A request whose gate key is registered waits until the test releases it.
#[derive(Default)]
struct MockApi {
    /// Summary returned for every URL unless `echo_url` is set
    summary: String,
    /// Summary becomes "summary of <url>"
    echo_url: bool,
    questions: Vec<QuizQuestion>,
    summarize_error: Option<String>,
    quiz_error: bool,
    translate_error: Option<String>,
    chat_error: Option<String>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockApi {
    fn new() -> Self {
        Self {
            summary: "S1".to_string(),
            questions: vec![QuizQuestion::new(
                "Q1",
                vec!["a".to_string(), "b".to_string()],
                0,
            )],
            ..Default::default()
        }
    }

    /// Hold requests matching `key` (e.g. "summarize:<url>", "quiz", "translate")
    fn gate(&self, key: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), Arc::clone(&notify));
        notify
    }

    async fn wait_gate(&self, key: &str) {
        let gate = self.gates.lock().unwrap().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn fail(endpoint: &str, message: &str) -> Error {
        Error::Request {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl SummarizerApi for MockApi {
    fn info(&self) -> ApiInfo {
        ApiInfo {
            name: "mock",
            base_url: None,
        }
    }

    async fn summarize(&self, url: &str, language: &Lang) -> Result<SummarizeReply> {
        self.record(Call::Summarize {
            url: url.to_string(),
            language: language.to_string(),
        });
        self.wait_gate(&format!("summarize:{url}")).await;

        if let Some(ref message) = self.summarize_error {
            return Err(Self::fail("summarize", message));
        }
        let summary = if self.echo_url {
            format!("summary of {url}")
        } else {
            self.summary.clone()
        };
        Ok(SummarizeReply {
            summary,
            transcription: Some("transcript".to_string()),
        })
    }

    async fn quiz(&self, summary: &str) -> Result<Vec<QuizQuestion>> {
        self.record(Call::Quiz {
            summary: summary.to_string(),
        });
        self.wait_gate("quiz").await;

        if self.quiz_error {
            return Err(Self::fail("quiz", "quiz model unavailable"));
        }
        Ok(self.questions.clone())
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        self.record(Call::Translate {
            text: text.to_string(),
            target: target.to_string(),
        });
        self.wait_gate("translate").await;

        if let Some(ref message) = self.translate_error {
            return Err(Self::fail("translate", message));
        }
        Ok(format!("[{target}] {text}"))
    }

    async fn chat(&self, question: &str, summary: &str) -> Result<String> {
        self.record(Call::Chat {
            question: question.to_string(),
            summary: summary.to_string(),
        });

        if let Some(ref message) = self.chat_error {
            return Err(Self::fail("chat", message));
        }
        Ok(format!("answer to {question}"))
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

fn setup(api: MockApi) -> (Arc<Orchestrator>, Arc<MockApi>, Arc<NoticeQueue>) {
    let api = Arc::new(api);
    let notices = Arc::new(NoticeQueue::new());
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::clone(&api) as Arc<dyn SummarizerApi>,
        Arc::clone(&notices) as Arc<dyn vidsum_core::Notifier>,
    ));
    (orchestrator, api, notices)
}

fn submission(url: &str) -> Submission {
    Submission::parse(url, Some("en")).unwrap()
}

async fn wait_for_calls(api: &MockApi, count: usize) {
    while api.calls().len() < count {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn test_invalid_input_never_reaches_the_api() {
    let (_orchestrator, api, notices) = setup(MockApi::new());

    assert_eq!(
        Submission::parse("not a url", Some("en")),
        Err(ValidationError::InvalidUrl)
    );
    assert_eq!(
        Submission::parse("https://youtu.be/abc", None),
        Err(ValidationError::MissingLanguage)
    );
    assert_eq!(
        ValidationError::InvalidUrl.to_string(),
        "Please enter a valid YouTube URL"
    );

    assert!(api.calls().is_empty());
    assert!(notices.is_empty());
}

// =============================================================================
// Summarize → Quiz
// =============================================================================

#[tokio::test]
async fn test_submit_summarizes_then_fetches_quiz() {
    let (orchestrator, api, notices) = setup(MockApi::new());

    let outcome = orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Ready { quiz_loaded: true });

    assert_eq!(
        api.calls(),
        vec![
            Call::Summarize {
                url: "https://youtu.be/abc".to_string(),
                language: "en".to_string(),
            },
            Call::Quiz {
                summary: "S1".to_string(),
            },
        ]
    );

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.state, WorkflowState::Ready);
    assert_eq!(snapshot.summary_text(), "S1");
    assert_eq!(snapshot.transcription.as_deref(), Some("transcript"));
    assert_eq!(snapshot.questions.len(), 1);
    assert_eq!(snapshot.questions[0].question, "Q1");
    assert!(!snapshot.loading);
    assert!(notices.is_empty());
}

#[tokio::test]
async fn test_quiz_failure_is_soft() {
    let (orchestrator, _api, notices) = setup(MockApi {
        quiz_error: true,
        ..MockApi::new()
    });

    let outcome = orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Ready { quiz_loaded: false });

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.state, WorkflowState::Ready);
    assert_eq!(snapshot.summary_text(), "S1");
    assert!(snapshot.questions.is_empty());
    assert!(!snapshot.loading);
    assert!(notices.is_empty(), "quiz failures must not notify");
}

#[tokio::test]
async fn test_summarize_failure_notifies_and_blocks_quiz() {
    let (orchestrator, api, notices) = setup(MockApi {
        summarize_error: Some("Video unavailable".to_string()),
        ..MockApi::new()
    });

    let err = orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Video unavailable");

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.state, WorkflowState::Error);
    assert!(snapshot.summary.is_none());
    assert!(snapshot.questions.is_empty());
    assert!(!snapshot.loading);

    assert!(!api.calls().iter().any(|c| matches!(c, Call::Quiz { .. })));

    let drained = notices.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].kind, NoticeKind::Error);
    assert!(drained[0].message.contains("Video unavailable"));
}

#[tokio::test]
async fn test_empty_summary_skips_quiz() {
    let (orchestrator, api, _notices) = setup(MockApi {
        summary: String::new(),
        ..MockApi::new()
    });

    let outcome = orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Ready { quiz_loaded: false });
    assert_eq!(api.calls().len(), 1);
    assert!(!orchestrator.snapshot().await.has_summary());
}

#[tokio::test]
async fn test_new_submit_clears_previous_results() {
    let (orchestrator, api, _notices) = setup(MockApi {
        echo_url: true,
        ..MockApi::new()
    });
    orchestrator
        .submit(&submission("https://youtu.be/one"))
        .await
        .unwrap();

    let gate = api.gate("summarize:https://youtu.be/two");
    let second = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit(&submission("https://youtu.be/two")).await })
    };
    wait_for_calls(&api, 3).await;

    let midway = orchestrator.snapshot().await;
    assert_eq!(midway.state, WorkflowState::Summarizing);
    assert!(midway.loading);
    assert!(midway.summary.is_none());
    assert!(midway.questions.is_empty());

    gate.notify_one();
    second.await.unwrap().unwrap();

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.summary_text(), "summary of https://youtu.be/two");
    assert_eq!(
        api.calls().last(),
        Some(&Call::Quiz {
            summary: "summary of https://youtu.be/two".to_string()
        })
    );
}

#[tokio::test]
async fn test_superseded_submit_is_dropped() {
    let (orchestrator, api, notices) = setup(MockApi {
        echo_url: true,
        ..MockApi::new()
    });

    let gate = api.gate("summarize:https://youtu.be/slow");
    let slow = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit(&submission("https://youtu.be/slow")).await })
    };
    wait_for_calls(&api, 1).await;

    let fast = orchestrator
        .submit(&submission("https://youtu.be/fast"))
        .await
        .unwrap();
    assert_eq!(fast, SubmitOutcome::Ready { quiz_loaded: true });

    gate.notify_one();
    assert_eq!(slow.await.unwrap().unwrap(), SubmitOutcome::Superseded);

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.summary_text(), "summary of https://youtu.be/fast");
    assert_eq!(snapshot.state, WorkflowState::Ready);
    assert!(!snapshot.loading);

    let quiz_calls: Vec<_> = api
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Quiz { .. }))
        .collect();
    assert_eq!(
        quiz_calls,
        vec![Call::Quiz {
            summary: "summary of https://youtu.be/fast".to_string()
        }]
    );
    assert!(notices.is_empty());
}

// =============================================================================
// Translate
// =============================================================================

#[tokio::test]
async fn test_translate_replaces_summary_and_keeps_quiz() {
    let (orchestrator, api, notices) = setup(MockApi::new());
    orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();
    let before = orchestrator.snapshot().await;

    let outcome = orchestrator.change_language(&Lang::new("fr")).await.unwrap();
    assert_eq!(outcome, TranslateOutcome::Translated);

    let after = orchestrator.snapshot().await;
    assert_eq!(after.summary_text(), "[fr] S1");
    assert_eq!(after.questions, before.questions);
    assert_eq!(after.state, WorkflowState::Ready);
    assert!(!after.loading);

    assert_eq!(
        api.calls().last(),
        Some(&Call::Translate {
            text: "S1".to_string(),
            target: "fr".to_string(),
        })
    );
    assert!(notices.is_empty());
}

#[tokio::test]
async fn test_translate_uses_current_text() {
    let (orchestrator, api, _notices) = setup(MockApi::new());
    orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();

    orchestrator.change_language(&Lang::new("fr")).await.unwrap();
    orchestrator.change_language(&Lang::new("de")).await.unwrap();

    assert_eq!(
        api.calls().last(),
        Some(&Call::Translate {
            text: "[fr] S1".to_string(),
            target: "de".to_string(),
        })
    );
    assert_eq!(orchestrator.snapshot().await.summary_text(), "[de] [fr] S1");
}

#[tokio::test]
async fn test_translate_without_summary_is_noop() {
    let (orchestrator, api, notices) = setup(MockApi::new());

    let outcome = orchestrator.change_language(&Lang::new("fr")).await.unwrap();
    assert_eq!(outcome, TranslateOutcome::NoSummary);

    assert!(api.calls().is_empty());
    assert!(notices.is_empty());
    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.state, WorkflowState::Idle);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_translate_failure_keeps_summary() {
    let (orchestrator, _api, notices) = setup(MockApi {
        translate_error: Some("Unsupported target".to_string()),
        ..MockApi::new()
    });
    orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();

    let err = orchestrator
        .change_language(&Lang::new("zh"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Unsupported target");

    let snapshot = orchestrator.snapshot().await;
    assert_eq!(snapshot.state, WorkflowState::Ready);
    assert_eq!(snapshot.summary_text(), "S1");
    assert_eq!(snapshot.questions.len(), 1);
    assert!(!snapshot.loading);

    let drained = notices.drain();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].message, "Unsupported target");
}

#[tokio::test]
async fn test_translate_is_busy_while_quiz_loads() {
    let (orchestrator, api, _notices) = setup(MockApi::new());

    let gate = api.gate("quiz");
    let submit = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit(&submission("https://youtu.be/abc")).await })
    };
    wait_for_calls(&api, 2).await;
    assert_eq!(orchestrator.state().await, WorkflowState::FetchingQuiz);

    let outcome = orchestrator.change_language(&Lang::new("fr")).await.unwrap();
    assert_eq!(outcome, TranslateOutcome::Busy);
    assert_eq!(api.calls().len(), 2);

    gate.notify_one();
    submit.await.unwrap().unwrap();
    assert_eq!(orchestrator.state().await, WorkflowState::Ready);
}

#[tokio::test]
async fn test_translate_superseded_by_submit() {
    let (orchestrator, api, _notices) = setup(MockApi {
        echo_url: true,
        ..MockApi::new()
    });
    orchestrator
        .submit(&submission("https://youtu.be/one"))
        .await
        .unwrap();

    let gate = api.gate("translate");
    let translate = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.change_language(&Lang::new("fr")).await })
    };
    wait_for_calls(&api, 3).await;

    orchestrator
        .submit(&submission("https://youtu.be/two"))
        .await
        .unwrap();

    gate.notify_one();
    assert_eq!(
        translate.await.unwrap().unwrap(),
        TranslateOutcome::Superseded
    );
    assert_eq!(
        orchestrator.snapshot().await.summary_text(),
        "summary of https://youtu.be/two"
    );
}

// =============================================================================
// Chat & Mode
// =============================================================================

#[tokio::test]
async fn test_chat_sends_current_summary() {
    let (orchestrator, api, _notices) = setup(MockApi::new());
    orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();
    let before = orchestrator.snapshot().await;

    let answer = orchestrator.send_chat_message("what is it?").await.unwrap();
    assert_eq!(answer, "answer to what is it?");
    assert_eq!(
        api.calls().last(),
        Some(&Call::Chat {
            question: "what is it?".to_string(),
            summary: "S1".to_string(),
        })
    );

    let after = orchestrator.snapshot().await;
    assert_eq!(after.state, before.state);
    assert_eq!(after.loading, before.loading);
}

#[tokio::test]
async fn test_chat_failure_notifies_and_rejects() {
    let (orchestrator, _api, notices) = setup(MockApi {
        chat_error: Some("Missing required parameters".to_string()),
        ..MockApi::new()
    });

    let err = orchestrator.send_chat_message("hello").await.unwrap_err();
    assert_eq!(err.user_message(), "Missing required parameters");
    assert_eq!(notices.drain().len(), 1);
    assert_eq!(orchestrator.state().await, WorkflowState::Idle);
}

#[tokio::test]
async fn test_chat_ignores_loading_flag() {
    let (orchestrator, api, _notices) = setup(MockApi::new());

    let gate = api.gate("summarize:https://youtu.be/abc");
    let submit = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.submit(&submission("https://youtu.be/abc")).await })
    };
    wait_for_calls(&api, 1).await;
    assert!(orchestrator.is_loading().await);

    let answer = orchestrator.send_chat_message("still there?").await.unwrap();
    assert_eq!(answer, "answer to still there?");

    gate.notify_one();
    submit.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_mode_requires_summary() {
    let (orchestrator, _api, _notices) = setup(MockApi::new());

    assert!(!orchestrator.set_mode(InteractionMode::Quiz).await);
    assert_eq!(orchestrator.snapshot().await.mode, InteractionMode::Chat);

    orchestrator
        .submit(&submission("https://youtu.be/abc"))
        .await
        .unwrap();
    assert!(orchestrator.set_mode(InteractionMode::Quiz).await);
    assert_eq!(orchestrator.snapshot().await.mode, InteractionMode::Quiz);
}
