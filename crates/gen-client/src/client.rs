//! HTTP client for the external generation collaborator.
//!
//! One `reqwest::Client` is built at construction with connect and request
//! timeouts; its connection pool is the only long-lived shared resource in
//! the system.  Every call is a single attempt — there are no retries, the
//! caller degrades to its deterministic local path on any failure.
//!
//! Without an API key (or with stub mode forced in config) the client
//! answers from a deterministic local stub, which keeps development and
//! tests hermetic.

use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::response::GenerateContentResponse;

/// Default generateContent endpoint.
const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Collaborator connection settings.
#[derive(Debug, Clone)]
pub struct GenConfig {
    /// Full generateContent endpoint URL.
    pub endpoint: String,
    /// API key; `None` forces stub mode.
    pub api_key: Option<String>,
    /// End-to-end request timeout.
    pub timeout: Duration,
    /// Connection-establishment timeout.
    pub connect_timeout: Duration,
    /// Force stub mode even when a key is configured.
    pub stub: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(5),
            stub: false,
        }
    }
}

/// A single generation request.
#[derive(Debug, Clone)]
pub struct GenRequest {
    pub text: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenRequest {
    /// Shape used for one-sentence rewrite polish.
    pub fn rewrite(instruction: impl Into<String>) -> Self {
        Self {
            text: instruction.into(),
            temperature: 0.7,
            max_output_tokens: 256,
        }
    }

    /// Shape used when forwarding an allowed prompt for completion.
    pub fn completion(prompt: impl Into<String>) -> Self {
        Self {
            text: prompt.into(),
            temperature: 0.7,
            max_output_tokens: 800,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure modes of a collaborator call.  All of them degrade to a local
/// deterministic path at the call site; none are surfaced to API clients.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Connect failure, timeout, or a body that did not deserialize.
    #[error("collaborator transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status (includes rate limiting).
    #[error("collaborator returned status {0}")]
    Status(reqwest::StatusCode),

    /// Well-formed response without any text candidate.
    #[error("collaborator response contained no text")]
    Empty,
}

// ---------------------------------------------------------------------------
// GenClient
// ---------------------------------------------------------------------------

/// Client handle for the generation collaborator.
pub struct GenClient {
    http: reqwest::Client,
    config: GenConfig,
}

impl std::fmt::Debug for GenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenClient")
            .field("endpoint", &self.config.endpoint)
            .field("stub", &self.is_stub())
            .finish()
    }
}

impl GenClient {
    /// Build the client and its pooled HTTP connection.
    pub fn new(config: GenConfig) -> Result<Self, GenError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Returns `true` when calls are answered locally instead of remotely.
    pub fn is_stub(&self) -> bool {
        self.config.stub || self.config.api_key.is_none()
    }

    /// One generation attempt, strict: any failure is returned to the
    /// caller, which is expected to fall back locally.
    pub async fn generate(&self, request: &GenRequest) -> Result<String, GenError> {
        if self.is_stub() {
            return Ok(stub_response(&request.text));
        }

        // Checked by is_stub above.
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let body = json!({
            "contents": [{
                "parts": [{ "text": request.text }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_output_tokens,
            }
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenError::Status(status));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .ok_or(GenError::Empty)
    }

    /// Generation with internal stub fallback, used on the forwarding path
    /// where some completion text must always come back.
    pub async fn complete(&self, request: &GenRequest) -> String {
        match self.generate(request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "collaborator call failed; answering from stub");
                stub_response(&request.text)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Stub
// ---------------------------------------------------------------------------

/// Deterministic local responses keyed on prompt topic.
pub(crate) fn stub_response(prompt: &str) -> String {
    let lower = prompt.to_lowercase();

    if ["explain", "teach", "learn", "understand", "concept"]
        .iter()
        .any(|t| lower.contains(t))
    {
        return "Here is a clear, step-by-step explanation of the topic, broken into \
                fundamentals, key ideas, and everyday examples suitable for newcomers."
            .to_string();
    }

    if ["code", "programming", "software", "algorithm"]
        .iter()
        .any(|t| lower.contains(t))
    {
        return "Programming solves problems with step-by-step instructions: variables \
                store data, functions group reusable logic, loops repeat work, and \
                conditionals make decisions."
            .to_string();
    }

    if ["professional", "business", "email", "communication"]
        .iter()
        .any(|t| lower.contains(t))
    {
        return "For professional communication, lead with a clear subject, state the \
                purpose early, keep the message brief and courteous, and close with \
                concrete next steps."
            .to_string();
    }

    "I'd be happy to help you learn. Break the topic into smaller parts, verify \
     information across several sources, and practice with concrete examples."
        .to_string()
}
