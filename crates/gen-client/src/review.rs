//! Advisory LLM rule review.
//!
//! Sends the prompt to the collaborator under a strict JSON contract and
//! parses the answer into a typed [`RuleReview`].  The result is advisory
//! only — the deterministic gate never consults it for the verdict — and
//! every failure mode (transport, missing JSON, malformed JSON) recovers
//! into a NEEDS_FIX review carrying a descriptive reason instead of an
//! error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use review_core::{CostarProfile, Verdict};

use crate::client::{GenClient, GenRequest};

/// System instruction asking the collaborator for a structured review.
pub const RULE_REVIEW_INSTRUCTION: &str = r#"You are a strict Prompt Review Engine. For every user prompt, map it to COSTAR:
- Context: (short)
- Objective: (short)
- Style: (short)
- Tone: (short)
- Audience: (short)
- Response: (what the user expects)

Then decide a verdict: one of "ALLOW", "NEEDS_FIX", "BLOCK".
- ALLOW: safe and clear — include a sanitized prompt to forward.
- NEEDS_FIX: ambiguous / minor safety issues — provide suggestions and a corrected/sanitized prompt.
- BLOCK: disallowed (illegal, violent, sexual exploitation, instructions for wrongdoing, etc.) — give reasons.

Return EXACTLY valid JSON (no extra commentary). Example JSON schema:
{
  "verdict": "ALLOW",
  "reasons": ["short reason strings array"],
  "costar": {
    "Context":"...",
    "Objective":"...",
    "Style":"...",
    "Tone":"...",
    "Audience":"...",
    "Response":"..."
  },
  "sanitized_prompt": "..."
}

User prompt to analyze will follow after this system instruction."#;

// ---------------------------------------------------------------------------
// RuleReview
// ---------------------------------------------------------------------------

/// Typed advisory review produced by the collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReview {
    #[serde(default = "recovery_verdict")]
    pub verdict: Verdict,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub costar: CostarProfile,
    #[serde(default)]
    pub sanitized_prompt: String,
}

/// Verdict used whenever the collaborator output cannot be trusted.
fn recovery_verdict() -> Verdict {
    Verdict::NeedsFix
}

impl RuleReview {
    /// Safe default review carrying a descriptive failure reason.
    fn recovery(prompt: &str, reason: String) -> Self {
        Self {
            verdict: Verdict::NeedsFix,
            reasons: vec![reason],
            costar: CostarProfile::default(),
            sanitized_prompt: prompt.to_string(),
        }
    }
}

impl GenClient {
    /// Request an advisory structured review of `prompt`.
    ///
    /// Never fails: transport errors and malformed output both collapse
    /// into a NEEDS_FIX review with the failure described in `reasons`.
    pub async fn rule_review(&self, prompt: &str) -> RuleReview {
        if self.is_stub() {
            return stub_review();
        }

        let combined = format!("{RULE_REVIEW_INSTRUCTION}\n\nUser prompt:\n{prompt}");
        let request = GenRequest {
            text: combined,
            temperature: 0.0,
            max_output_tokens: 512,
        };

        match self.generate(&request).await {
            Ok(text) => parse_review(prompt, &text),
            Err(err) => {
                RuleReview::recovery(prompt, format!("collaborator call failed: {err}"))
            }
        }
    }
}

/// Extract and deserialize the JSON object embedded in the model output.
///
/// Models occasionally wrap the object in prose or code fences, so the
/// outermost brace window is cut out before parsing.
fn parse_review(prompt: &str, text: &str) -> RuleReview {
    let window = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => {
            return RuleReview::recovery(
                prompt,
                "no JSON object in collaborator output".to_string(),
            )
        }
    };

    match serde_json::from_str::<RuleReview>(window) {
        Ok(review) => {
            debug!(verdict = %review.verdict, "parsed collaborator review");
            review
        }
        Err(err) => RuleReview::recovery(
            prompt,
            format!("failed to parse collaborator output: {err}"),
        ),
    }
}

/// Canned review returned in stub mode.
fn stub_review() -> RuleReview {
    RuleReview {
        verdict: Verdict::Allow,
        reasons: vec!["stubbed - no API key".to_string()],
        costar: CostarProfile {
            context: "Development testing".to_string(),
            objective: "Verify system functionality".to_string(),
            style: "Professional".to_string(),
            tone: "Neutral".to_string(),
            audience: "Developer".to_string(),
            response: "Test response".to_string(),
        },
        sanitized_prompt: "Explain the concept of artificial intelligence.".to_string(),
    }
}
