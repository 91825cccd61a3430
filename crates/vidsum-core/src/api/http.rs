use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::traits::{ApiInfo, SummarizerApi};
use crate::config::{ApiConfig, Lang};
use crate::error::{Error, Result};
use crate::types::{QuizQuestion, SummarizeReply};

/// Remote operations and the message shown when the server gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Summarize,
    Quiz,
    Translate,
    Chat,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Quiz => "quiz",
            Self::Translate => "translate",
            Self::Chat => "chat",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        [Self::Summarize, Self::Quiz, Self::Translate, Self::Chat]
            .into_iter()
            .find(|e| e.path() == path)
    }

    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Summarize => "Failed to get video summary",
            Self::Quiz => "Failed to fetch quiz questions",
            Self::Translate => "Failed to translate summary",
            Self::Chat => "Failed to get response",
        }
    }
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    url: &'a str,
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct QuizRequest<'a> {
    summary: &'a str,
}

#[derive(Debug, Deserialize)]
struct QuizResponse {
    questions: Vec<QuizQuestion>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    target_language: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translated_text: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
    summary: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
}

/// JSON-over-HTTP client for the summarization API
pub struct HttpApi {
    client: Client,
    /// Base URL, e.g. "http://localhost:5000/api"
    pub api_base: String,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| Error::ConfigInvalid {
            field: "api".to_string(),
            reason: format!("cannot build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.api_base, endpoint.path())
    }

    /// POST a JSON body and decode the JSON reply.
    ///
    /// Non-2xx replies become [`Error::Request`] carrying the server's `error`
    /// field when the body has one, otherwise the endpoint's fallback message.
    async fn post_json<B, R>(&self, endpoint: Endpoint, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                if e.is_timeout() {
                    Error::Timeout {
                        endpoint: endpoint.path().to_string(),
                    }
                } else {
                    Error::Transport {
                        endpoint: endpoint.path().to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| endpoint.fallback_message().to_string());
            warn!("API error from {}: {} - {}", url, status, message);
            return Err(Error::Request {
                endpoint: endpoint.path().to_string(),
                message,
            });
        }

        response.json::<R>().await.map_err(|e| {
            warn!("Undecodable reply from {}: {}", url, e);
            Error::InvalidResponse {
                endpoint: endpoint.path().to_string(),
                reason: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl SummarizerApi for HttpApi {
    fn info(&self) -> ApiInfo {
        ApiInfo {
            name: "HTTP",
            base_url: Some(self.api_base.clone()),
        }
    }

    async fn summarize(&self, url: &str, language: &Lang) -> Result<SummarizeReply> {
        let body = SummarizeRequest {
            url,
            language: language.as_str(),
        };
        self.post_json(Endpoint::Summarize, &body).await
    }

    async fn quiz(&self, summary: &str) -> Result<Vec<QuizQuestion>> {
        let reply: QuizResponse = self.post_json(Endpoint::Quiz, &QuizRequest { summary }).await?;
        Ok(reply.questions)
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let body = TranslateRequest {
            text,
            target_language: target.as_str(),
        };
        let reply: TranslateResponse = self.post_json(Endpoint::Translate, &body).await?;
        Ok(reply.translated_text)
    }

    async fn chat(&self, question: &str, summary: &str) -> Result<String> {
        let reply: ChatResponse = self
            .post_json(Endpoint::Chat, &ChatRequest { question, summary })
            .await?;
        Ok(reply.response)
    }
}
