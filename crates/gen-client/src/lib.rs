//! # gen-client
//!
//! The boundary to the external generation collaborator.  Everything the
//! rest of the system knows about remote generation lives here:
//!
//! 1. **[`client`]** -- the [`GenClient`](client::GenClient) with bounded
//!    timeouts, a single-attempt call contract, and a deterministic stub
//!    mode for keyless development and tests.
//! 2. **[`response`]** -- typed parsing of the generateContent wire format,
//!    so malformed bodies surface as typed errors instead of being sniffed
//!    downstream.
//! 3. **[`review`]** -- the advisory structured rule review, with safe
//!    NEEDS_FIX recovery whenever the collaborator's JSON cannot be parsed.
//!
//! Collaborator output is treated as untrusted: it is used for rewrite
//! polish and completion text only, never for the gate verdict.

pub mod client;
pub mod response;
pub mod review;

pub use client::{GenClient, GenConfig, GenError, GenRequest};
pub use response::GenerateContentResponse;
pub use review::{RuleReview, RULE_REVIEW_INSTRUCTION};
