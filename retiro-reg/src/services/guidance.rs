//! Generative-text collaborator client
//!
//! Requests a short personalized welcome message after a successful
//! submission. Strictly best-effort: a missing credential, network
//! failure, quota error, or unparseable response all collapse to a fixed
//! fallback blessing. No failure here ever surfaces to the attendee.

use retiro_common::config::GuidanceConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Fixed blessing used whenever the collaborator is unavailable
pub const FALLBACK_BLESSING: &str =
    "Que seu Ano Novo seja repleto de paz, devoção e alegrias transcendentais! Hare Krishna!";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Guidance client errors (internal; always swallowed by `blessing`)
#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("API key not configured")]
    MissingCredential,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Empty or unparseable response")]
    EmptyResponse,
}

/// generateContent request payload
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

/// Sampling configuration forwarded to the collaborator
#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "topP")]
    top_p: f64,
}

/// generateContent response payload (the subset we read)
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Client for the generative-text collaborator
#[derive(Debug, Clone)]
pub struct GuidanceClient {
    http: reqwest::Client,
    config: GuidanceConfig,
    event_title: String,
    event_guest: String,
}

impl GuidanceClient {
    pub fn new(config: GuidanceConfig, event_title: &str, event_guest: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            config,
            event_title: event_title.to_string(),
            event_guest: event_guest.to_string(),
        }
    }

    /// Fetch a personalized blessing for the attendee.
    ///
    /// Never fails: any error path returns `FALLBACK_BLESSING`.
    pub async fn blessing(&self, user_name: &str, context: &str) -> String {
        match self.request_blessing(user_name, context).await {
            Ok(text) => text,
            Err(GuidanceError::MissingCredential) => FALLBACK_BLESSING.to_string(),
            Err(e) => {
                warn!("Guidance request failed, using fallback: {}", e);
                FALLBACK_BLESSING.to_string()
            }
        }
    }

    async fn request_blessing(
        &self,
        user_name: &str,
        context: &str,
    ) -> Result<String, GuidanceError> {
        if self.config.api_key.is_empty() {
            return Err(GuidanceError::MissingCredential);
        }

        let prompt = format!(
            "You are a spiritual assistant for the event \"{}\" featuring {}. \
             The user's name is {}. {} \
             Provide a warm, welcoming, and spiritually inspiring short message \
             (2-3 sentences) in Portuguese. Include a small Vedic blessing or a \
             reference to peace and transcendental joy for the new year.",
            self.event_title, self.event_guest, user_name, context
        );

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
            },
        };

        let response: GenerateResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .candidates
            .and_then(|mut c| c.drain(..).next())
            .and_then(|c| c.content)
            .and_then(|mut c| c.parts.drain(..).next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(GuidanceError::EmptyResponse)
    }
}
