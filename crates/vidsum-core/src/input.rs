//! Submission form validation.
//!
//! Everything here runs before a request is issued. A rejected form never
//! reaches the orchestrator, so prior results stay on screen.

use serde::{Deserialize, Serialize};

use crate::config::{Lang, is_source_language};
use crate::error::ValidationError;

/// Host fragments accepted as video links
const VIDEO_HOSTS: &[&str] = &["youtube.com", "youtu.be"];

/// A validated summarize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub url: String,
    pub source_language: Lang,
}

impl Submission {
    /// Validate raw form input.
    ///
    /// The URL is checked first, so a bad URL with no language reports the URL.
    pub fn parse(url: &str, language: Option<&str>) -> Result<Self, ValidationError> {
        let url = url.trim();
        if !is_video_url(url) {
            return Err(ValidationError::InvalidUrl);
        }

        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or(ValidationError::MissingLanguage)?;

        if !is_source_language(language) {
            return Err(ValidationError::UnsupportedLanguage(language.to_string()));
        }

        Ok(Self {
            url: url.to_string(),
            source_language: Lang::new(language),
        })
    }
}

/// Whether `url` references a recognized video-hosting domain.
pub fn is_video_url(url: &str) -> bool {
    VIDEO_HOSTS.iter().any(|host| url.contains(host))
}

/// Raw input form state.
///
/// Fields survive a submit so the user can edit and resubmit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl InputForm {
    pub fn submission(&self) -> Result<Submission, ValidationError> {
        Submission::parse(&self.url, self.language.as_deref())
    }
}
