use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Summary text currently on display.
///
/// Translation replaces `text` wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
}

impl Summary {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Successful `/summarize` reply
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SummarizeReply {
    pub summary: String,
    /// English transcript the summary was produced from, when the server sends it
    #[serde(default)]
    pub transcription: Option<String>,
}

/// One comprehension question.
///
/// The server owns the shape. Fields it sends are decoded leniently and
/// anything not understood is kept in `extra` and serialized back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawQuizQuestion")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// 0-based index of the right option, when the server's answer names one
    #[serde(rename = "correctAnswer", skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wire form of [`QuizQuestion`] before the answer is resolved.
#[derive(Deserialize)]
struct RawQuizQuestion {
    #[serde(alias = "prompt", default)]
    question: Option<Value>,
    #[serde(alias = "choices", default)]
    options: Option<Value>,
    #[serde(rename = "correctAnswer", alias = "answer", default)]
    answer: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolve an answer given as an index, a numeric string or the option text.
fn resolve_answer(answer: &Value, options: &[String]) -> Option<usize> {
    let index = match answer {
        Value::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()),
        Value::String(s) => options
            .iter()
            .position(|o| o == s)
            .or_else(|| s.trim().parse().ok()),
        _ => None,
    }?;
    (index < options.len() || options.is_empty()).then_some(index)
}

impl From<RawQuizQuestion> for QuizQuestion {
    fn from(raw: RawQuizQuestion) -> Self {
        let mut extra = raw.extra;

        let question = match raw.question {
            None | Some(Value::Null) => String::new(),
            Some(value) => value_text(&value),
        };

        let options = match raw.options {
            Some(Value::Array(items)) => items.iter().map(value_text).collect(),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                extra.insert("choices".to_string(), other);
                Vec::new()
            }
        };

        let correct_answer = match raw.answer {
            None | Some(Value::Null) => None,
            Some(answer) => {
                let resolved = resolve_answer(&answer, &options);
                if resolved.is_none() {
                    extra.insert("correctAnswer".to_string(), answer);
                }
                resolved
            }
        };

        Self {
            question,
            options,
            correct_answer,
            extra,
        }
    }
}

impl QuizQuestion {
    pub fn new(question: impl Into<String>, options: Vec<String>, correct_answer: usize) -> Self {
        Self {
            question: question.into(),
            options,
            correct_answer: Some(correct_answer),
            extra: Map::new(),
        }
    }

    /// Whether `choice` (0-based) is the right option.
    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct_answer == Some(choice)
    }
}
