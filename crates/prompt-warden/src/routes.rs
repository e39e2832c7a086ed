//! HTTP handlers for the gate endpoints.
//!
//! `/api/analyze` runs the full review pipeline and returns the verdict
//! plus the suggested rewrite; `/api/chat` wraps it and forwards to the
//! generation collaborator only when the verdict is ALLOW; `/api/llm-review`
//! exposes the advisory structured review.  Empty prompts are rejected
//! before the pipeline runs; collaborator failures never surface to the
//! caller.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use gen_client::{GenClient, GenRequest};
use review_audit::{AuditEntry, AuditEventType, AuditSink, AuditSource, GateDecisionRecord};
use review_core::rewrite;
use review_core::{CostarProfile, Highlight, Persona, ReviewEngine, RewritePlan, Verdict};

// ---------------------------------------------------------------------------
// Shared application state
// ---------------------------------------------------------------------------

/// State threaded through axum handlers via [`State`].
pub struct AppState {
    /// Compiled detector pipeline; shared by every request.
    pub engine: ReviewEngine,
    /// Collaborator client (owns the only connection pool).
    pub gen: GenClient,
    /// Audit trail handle.
    pub audit: AuditSink,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub prompt: String,
    #[serde(default)]
    pub persona: Persona,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub verdict: Verdict,
    pub score: u8,
    pub costar: CostarProfile,
    pub highlights: Vec<Highlight>,
    pub suggested_rewrite: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub allowed: bool,
    pub analysis: AnalyzeResponse,
    pub llm_response: Option<String>,
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Serialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}

/// Build a 400 response for input rejected before the pipeline.
fn validation_error(message: &str) -> Response {
    let body = ApiError {
        error: ApiErrorDetail {
            message: message.to_string(),
            error_type: "validation_error".to_string(),
        },
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/analyze` — run the review pipeline over one prompt.
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    if req.prompt.trim().is_empty() {
        return validation_error("prompt must not be empty");
    }

    let analysis = run_review(&state, &req.prompt, req.persona).await;
    Json(analysis).into_response()
}

/// `POST /api/chat` — analyze, then forward to the collaborator only when
/// the verdict is ALLOW.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    if req.prompt.trim().is_empty() {
        return validation_error("prompt must not be empty");
    }

    let analysis = run_review(&state, &req.prompt, req.persona).await;
    let allowed = analysis.verdict == Verdict::Allow;

    let llm_response = if allowed {
        // The collaborator recovers internally from every failure mode, so
        // an allowed chat always carries completion text.
        let text = state
            .gen
            .complete(&GenRequest::completion(req.prompt.clone()))
            .await;

        state
            .audit
            .log(AuditEntry::new(
                AuditEventType::GenerationForwarded,
                AuditSource::new("chat").with_persona(req.persona.to_string()),
                serde_json::json!({ "response_len": text.len() }),
            ))
            .await;

        Some(text)
    } else {
        None
    };

    Json(ChatResponse {
        allowed,
        analysis,
        llm_response,
    })
    .into_response()
}

/// `POST /api/llm-review` — advisory structured review by the collaborator.
///
/// The returned verdict is advisory only; the deterministic gate never
/// consults it.
pub async fn llm_review_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    if req.prompt.trim().is_empty() {
        return validation_error("prompt must not be empty");
    }

    let review = state.gen.rule_review(&req.prompt).await;

    state
        .audit
        .log(AuditEntry::new(
            AuditEventType::LlmReviewRequested,
            AuditSource::new("llm-review"),
            serde_json::json!({ "verdict": review.verdict.to_string() }),
        ))
        .await;

    Json(review).into_response()
}

/// `GET /health` — liveness plus collaborator configuration state.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Response {
    Json(serde_json::json!({
        "status": "ok",
        "stub": state.gen.is_stub(),
        "generation_configured": !state.gen.is_stub(),
    }))
    .into_response()
}

// ---------------------------------------------------------------------------
// Review pipeline glue
// ---------------------------------------------------------------------------

/// Run detection, resolve the rewrite plan, and record the audit event.
async fn run_review(state: &AppState, prompt: &str, persona: Persona) -> AnalyzeResponse {
    let analysis = state.engine.analyze(prompt);

    let suggested_rewrite = match state.engine.rewrite_plan(&analysis, prompt, persona) {
        // Severe content never reaches the collaborator.
        RewritePlan::SafeTemplate => rewrite::safe_template(persona).to_string(),
        RewritePlan::Delegate { instruction } => {
            match state.gen.generate(&GenRequest::rewrite(instruction)).await {
                Ok(candidate) if rewrite::candidate_is_acceptable(&candidate) => {
                    candidate.trim().to_string()
                }
                Ok(candidate) => {
                    warn!(
                        candidate_len = candidate.len(),
                        "rewrite candidate rejected by validation; using local rewrite"
                    );
                    log_fallback(state, persona, "candidate_rejected").await;
                    state.engine.local_rewrite(prompt)
                }
                Err(err) => {
                    warn!(%err, "collaborator rewrite failed; using local rewrite");
                    log_fallback(state, persona, "collaborator_failure").await;
                    state.engine.local_rewrite(prompt)
                }
            }
        }
    };

    info!(
        verdict = %analysis.verdict,
        score = analysis.score,
        highlights = analysis.highlights.len(),
        "prompt reviewed"
    );

    let event_type = if analysis.verdict == Verdict::Block {
        AuditEventType::PromptBlocked
    } else {
        AuditEventType::PromptAnalyzed
    };
    state
        .audit
        .log(
            AuditEntry::new(
                event_type,
                AuditSource::new("gate").with_persona(persona.to_string()),
                serde_json::json!({ "highlights": analysis.highlights.len() }),
            )
            .with_gate_decision(GateDecisionRecord {
                verdict: analysis.verdict.to_string(),
                score: analysis.score,
                reason_count: analysis.reasons.len(),
            }),
        )
        .await;

    AnalyzeResponse {
        verdict: analysis.verdict,
        score: analysis.score,
        costar: analysis.costar,
        highlights: analysis.highlights,
        suggested_rewrite,
        reasons: analysis.reasons,
    }
}

async fn log_fallback(state: &AppState, persona: Persona, cause: &str) {
    state
        .audit
        .log(AuditEntry::new(
            AuditEventType::GenerationFellBack,
            AuditSource::new("gate").with_persona(persona.to_string()),
            serde_json::json!({ "cause": cause }),
        ))
        .await;
}
