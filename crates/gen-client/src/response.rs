//! Typed response parsing for the generateContent wire format.
//!
//! The collaborator boundary is typed end to end: a response either
//! deserializes into these structs or the call fails with a
//! [`GenError`](crate::client::GenError).  No downstream code ever has to
//! sniff a string for structured-payload markers.

use serde::Deserialize;

/// Top-level generateContent response body.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generation candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// Candidate content: an ordered list of parts.
#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part; only text parts are meaningful here.
#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Extract the first text part of the first candidate, if any.
    pub fn first_text(&self) -> Option<String> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.clone())
    }
}
