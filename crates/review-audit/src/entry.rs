use serde::{Deserialize, Serialize};

/// A single audit record for one event in the gate's lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: uuid::Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    pub source: AuditSource,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_decision: Option<GateDecisionRecord>,
}

impl AuditEntry {
    /// Create an entry with a fresh UUID v4 and the current UTC timestamp.
    /// `gate_decision` defaults to `None`.
    pub fn new(
        event_type: AuditEventType,
        source: AuditSource,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            event_type,
            source,
            details,
            gate_decision: None,
        }
    }

    /// Attach the gate decision, builder-style.
    pub fn with_gate_decision(mut self, decision: GateDecisionRecord) -> Self {
        self.gate_decision = Some(decision);
        self
    }
}

/// The category of event being recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    ProcessStarted,
    ProcessStopped,
    ConfigLoaded,
    PromptAnalyzed,
    PromptBlocked,
    GenerationForwarded,
    GenerationFellBack,
    LlmReviewRequested,
}

/// Identifies the component that emitted the event plus request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSource {
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AuditSource {
    /// Constructor requiring only the component name.
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            persona: None,
            remote_addr: None,
            request_id: None,
        }
    }

    /// Attach the persona label, builder-style.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }
}

/// Outcome of the gate evaluation attached to analysis events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDecisionRecord {
    pub verdict: String,
    pub score: u8,
    pub reason_count: usize,
}
