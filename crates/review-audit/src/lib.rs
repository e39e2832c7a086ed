//! Append-only structured JSON-lines audit trail for the prompt-warden
//! gate.
//!
//! Every gate decision, generation forward, and lifecycle event is
//! serialised as one newline-terminated JSON object and appended to a log
//! file.  Producers hold a cheap [`AuditSink`] clone and never touch disk;
//! a background task owns the file.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use review_audit::{AuditEntry, AuditEventType, AuditSink, AuditSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, _handle) = AuditSink::start("audit.jsonl").await?;
//!
//! sink.log(AuditEntry::new(
//!     AuditEventType::ProcessStarted,
//!     AuditSource::new("prompt-warden"),
//!     serde_json::json!({"version": "0.1.0"}),
//! ))
//! .await;
//! # Ok(())
//! # }
//! ```

pub mod entry;
pub mod sink;

pub use entry::{AuditEntry, AuditEventType, AuditSource, GateDecisionRecord};
pub use sink::{AuditError, AuditSink};
