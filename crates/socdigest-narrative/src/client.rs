//! HTTP client for an OpenAI-compatible chat completion endpoint.
//!
//! The client sends one single-turn request per narrative section and
//! returns the trimmed text of the first choice. There is no retry: a failed
//! section is reported to the caller, which decides what to print instead.

use std::time::Duration;

use reqwest::{Client, Url};
use socdigest_core::ApiSettings;

use crate::error::NarrativeError;
use crate::prompt::{insights_prompt, next_steps_prompt, NarrativeInput};
use crate::types::{ChatRequest, ChatResponse};

pub const INSIGHTS_PLACEHOLDER: &str =
    "Insights generation failed. Please check API configuration.";
pub const NEXT_STEPS_PLACEHOLDER: &str =
    "Next steps generation failed. Please check API configuration.";

const COMPLETIONS_PATH: &str = "chat/completions";

/// Client for the chat completion service named in the narrative config.
///
/// Use [`NarrativeClient::new`] to read the API key from the configured
/// environment variable, or [`NarrativeClient::with_api_key`] to supply it
/// directly (tests point this at a mock server).
pub struct NarrativeClient {
    client: Client,
    api_key: String,
    endpoint: Url,
    model: String,
}

impl std::fmt::Debug for NarrativeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeClient")
            .field("api_key", &"[redacted]")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl NarrativeClient {
    /// Creates a client whose bearer token is read from the environment
    /// variable `settings.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::MissingApiKey`] if the variable is unset or
    /// empty, and the errors of [`NarrativeClient::with_api_key`] otherwise.
    pub fn new(settings: &ApiSettings, timeout_secs: u64) -> Result<Self, NarrativeError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| NarrativeError::MissingApiKey(settings.api_key_env.clone()))?;
        Self::with_api_key(settings, &api_key, timeout_secs)
    }

    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns [`NarrativeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`NarrativeError::InvalidBaseUrl`] if
    /// `settings.base_url` is not a valid URL.
    pub fn with_api_key(
        settings: &ApiSettings,
        api_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, NarrativeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("socdigest/0.1")
            .build()?;

        let endpoint = completions_endpoint(&settings.base_url)?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
            model: settings.model.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `prompt` as a single user message and returns the trimmed text
    /// of the first choice.
    ///
    /// # Errors
    ///
    /// - [`NarrativeError::Http`] on network failure or timeout.
    /// - [`NarrativeError::Status`] on a non-2xx response.
    /// - [`NarrativeError::Deserialize`] if the body is not a completion.
    /// - [`NarrativeError::EmptyChoices`] if the completion has no choices.
    pub async fn complete(&self, prompt: &str) -> Result<String, NarrativeError> {
        let request = ChatRequest::single_user_message(&self.model, prompt);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NarrativeError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(NarrativeError::Deserialize)?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(NarrativeError::EmptyChoices)?;

        Ok(choice.message.content.trim().to_string())
    }

    /// Requests both narrative sections, one after the other.
    ///
    /// A failure in one section does not prevent the other from being
    /// requested.
    pub async fn generate_narrative(&self, input: &NarrativeInput) -> Narrative {
        let insights = self.complete(&insights_prompt(input)).await;
        let next_steps = self.complete(&next_steps_prompt(input)).await;
        Narrative {
            insights,
            next_steps,
        }
    }
}

/// Outcome of [`NarrativeClient::generate_narrative`]. Each section
/// succeeds or fails on its own.
#[derive(Debug)]
pub struct Narrative {
    pub insights: Result<String, NarrativeError>,
    pub next_steps: Result<String, NarrativeError>,
}

impl Narrative {
    /// Both sections as text, with the fixed placeholder standing in for any
    /// failed section. Failures are logged as warnings.
    #[must_use]
    pub fn into_texts(self) -> (String, String) {
        let insights = self.insights.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "insights generation failed");
            INSIGHTS_PLACEHOLDER.to_string()
        });
        let next_steps = self.next_steps.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "next steps generation failed");
            NEXT_STEPS_PLACEHOLDER.to_string()
        });
        (insights, next_steps)
    }

    /// The texts printed when narrative generation is not attempted.
    #[must_use]
    pub fn placeholders() -> (String, String) {
        (
            INSIGHTS_PLACEHOLDER.to_string(),
            NEXT_STEPS_PLACEHOLDER.to_string(),
        )
    }
}

/// `{base_url}/chat/completions`, tolerating a trailing slash on the base.
fn completions_endpoint(base_url: &str) -> Result<Url, NarrativeError> {
    let invalid = |reason: String| NarrativeError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    // A base without a trailing slash would have its last path segment
    // replaced by `join`.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("URL cannot be a base".to_string()));
    }
    base.join(COMPLETIONS_PATH)
        .map_err(|e| invalid(e.to_string()))
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
