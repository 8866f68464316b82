//! HTTP client for the hosted generative-language API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const GENAI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, Error)]
pub enum GenerativeApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("json error: {0}")]
    Serde(String),
    #[error("missing api key: GENAI_API_KEY environment variable not set")]
    MissingApiKey,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateResponse {
    /// Text of the first candidate, if the model returned one.
    fn text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .next()
    }
}

/// Thin client for the `generateContent` endpoint.
///
/// Failures are terminal for the action — no retry or backoff; callers
/// decide how to degrade.
#[derive(Debug, Clone)]
pub struct GenerativeApiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GenerativeApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new client using the GENAI_API_KEY environment variable
    pub fn from_env() -> Result<Self, GenerativeApiError> {
        let api_key =
            std::env::var("GENAI_API_KEY").map_err(|_| GenerativeApiError::MissingApiKey)?;
        Self::new(api_key, None)
    }

    pub fn new(api_key: String, model: Option<String>) -> Result<Self, GenerativeApiError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("taskstride/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenerativeApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Send `prompt` and return the model's text reply.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerativeApiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!("{GENAI_API_URL}/{}:generateContent", self.model);
        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => {
                let body = res
                    .json::<GenerateResponse>()
                    .await
                    .map_err(|e| GenerativeApiError::Serde(e.to_string()))?;
                body.text()
                    .ok_or_else(|| GenerativeApiError::Serde("no candidates in response".to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(GenerativeApiError::InvalidApiKey)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(GenerativeApiError::RateLimited),
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(GenerativeApiError::Http { status, body })
            }
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GenerativeApiError {
    if e.is_timeout() {
        GenerativeApiError::Timeout
    } else {
        GenerativeApiError::Transport(e.to_string())
    }
}
