//! Askama templates for HTMX responses.
//!
//! ## HTMX Patterns Used
//!
//! - **OOB Swaps**: toasts are appended to `#toasts` with
//!   `hx-swap-oob="beforeend:#toasts"` from whichever fragment is returned
//!
//! - **Retargeting**: validation messages use `HX-Retarget` to land in
//!   `#input-error` instead of `#results`
//!
//! - **Disabled Elements**: `hx-disabled-elt` keeps the submit button and
//!   language selector disabled while a primary request is in flight
//!
//! ## Template Structure
//!
//! - `base.html` - Common layout with CSS/JS
//! - `app.html` - Input form plus the results area
//! - `partials/` - Results, chat message, input error, toasts

use askama::Template;
use askama_web::WebTemplate;
use std::collections::HashMap;
use vidsum_core::{
    InputForm, InteractionMode, LanguageOption, Notice, QuizQuestion, SessionSnapshot,
    source_languages, target_languages,
};

use crate::state::ChatEntry;

/// Dropdown entry with its selection state resolved.
#[derive(Debug, Clone)]
pub struct LanguageChoice {
    pub code: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

fn choices(options: Vec<LanguageOption>, selected: Option<&str>) -> Vec<LanguageChoice> {
    options
        .into_iter()
        .map(|o| LanguageChoice {
            code: o.code,
            name: o.name,
            selected: selected == Some(o.code),
        })
        .collect()
}

/// One answer button in the quiz panel.
#[derive(Debug, Clone)]
pub struct QuizOptionView {
    pub index: usize,
    pub text: String,
    pub chosen: bool,
    pub correct: bool,
}

/// One quiz question with the user's answer resolved.
#[derive(Debug, Clone)]
pub struct QuizItemView {
    pub index: usize,
    pub question: String,
    pub options: Vec<QuizOptionView>,
    pub answered: bool,
    pub answered_correctly: bool,
}

impl QuizItemView {
    fn build(index: usize, question: &QuizQuestion, chosen: Option<usize>) -> Self {
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(i, text)| QuizOptionView {
                index: i,
                text: text.clone(),
                chosen: chosen == Some(i),
                correct: question.is_correct(i),
            })
            .collect();

        Self {
            index,
            question: question.question.clone(),
            options,
            answered: chosen.is_some(),
            answered_correctly: chosen.is_some_and(|c| question.is_correct(c)),
        }
    }
}

/// Everything the results area renders, resolved from a session.
#[derive(Debug, Clone)]
pub struct ResultsView {
    pub session_id: String,
    pub loading: bool,
    pub state: &'static str,
    pub summary: Option<String>,
    pub is_quiz: bool,
    pub quiz: Vec<QuizItemView>,
    pub chat_log: Vec<ChatEntry>,
    pub target_languages: Vec<LanguageChoice>,
}

impl ResultsView {
    pub fn new(
        session_id: String,
        snapshot: &SessionSnapshot,
        chat_log: Vec<ChatEntry>,
        quiz_answers: &HashMap<usize, usize>,
    ) -> Self {
        let quiz = snapshot
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| QuizItemView::build(i, q, quiz_answers.get(&i).copied()))
            .collect();

        Self {
            session_id,
            loading: snapshot.loading,
            state: snapshot.state.as_str(),
            summary: snapshot.summary.as_ref().map(|s| s.text.clone()),
            is_quiz: snapshot.mode == InteractionMode::Quiz,
            quiz,
            chat_log,
            target_languages: choices(target_languages(), None),
        }
    }

    pub fn quiz_score(&self) -> usize {
        self.quiz.iter().filter(|q| q.answered_correctly).count()
    }

    pub fn quiz_answered(&self) -> usize {
        self.quiz.iter().filter(|q| q.answered).count()
    }
}

// =============================================================================
// Full Page Templates
// =============================================================================

/// Main app page: input form plus results area.
#[derive(Template, WebTemplate)]
#[template(path = "app.html")]
pub struct AppTemplate {
    pub session_id: String,
    pub form_url: String,
    pub source_languages: Vec<LanguageChoice>,
    pub view: ResultsView,
    pub notices: Vec<Notice>,
}

impl AppTemplate {
    pub fn new(form: &InputForm, view: ResultsView, notices: Vec<Notice>) -> Self {
        Self {
            session_id: view.session_id.clone(),
            form_url: form.url.clone(),
            source_languages: choices(source_languages(), form.language.as_deref()),
            view,
            notices,
        }
    }
}

// =============================================================================
// Fragment Templates (HTMX partial responses)
// =============================================================================

/// Results area after submit, translate, mode switch or quiz answer.
///
/// Also clears any inline input error and appends pending toasts.
#[derive(Template, WebTemplate)]
#[template(path = "partials/results_fragment.html")]
pub struct ResultsFragmentTemplate {
    pub view: ResultsView,
    pub notices: Vec<Notice>,
}

/// Inline validation message under the input form.
#[derive(Template, WebTemplate)]
#[template(path = "partials/input_error.html")]
pub struct InputErrorTemplate {
    pub message: String,
}

/// One chat exchange appended to the chat log.
#[derive(Template, WebTemplate)]
#[template(path = "partials/chat_message.html")]
pub struct ChatMessageTemplate {
    pub entry: ChatEntry,
    pub notices: Vec<Notice>,
}
