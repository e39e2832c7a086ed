//! # review-core
//!
//! Deterministic prompt review for the prompt-warden gate.  Every decision
//! is rule-based and explainable: a fixed set of pattern catalogues feeds
//! four independent detectors, their findings are aggregated into an
//! ordered highlight list, and a short-circuiting rule chain resolves the
//! final ALLOW / NEEDS_FIX / BLOCK verdict.
//!
//! The crate is organised in layers:
//!
//! 1. **[`vocabulary`]** -- static catalogues compiled once into an
//!    immutable [`Vocabulary`](vocabulary::Vocabulary).
//! 2. **Detectors** -- [`lexical`], [`injection`], [`language`], and the
//!    [`costar`] extractor, each a pure function over borrowed vocabulary.
//! 3. **Resolution** -- [`score`], [`verdict`], and [`rewrite`] planning.
//! 4. **[`analyzer`]** -- the [`ReviewEngine`](analyzer::ReviewEngine)
//!    that wires the pipeline together.
//!
//! ## Quick start
//!
//! ```rust
//! use review_core::{ReviewEngine, Verdict};
//!
//! let engine = ReviewEngine::new().unwrap();
//! let analysis = engine.analyze("bruh wanna lol");
//! assert_eq!(analysis.verdict, Verdict::Block);
//! ```
//!
//! Everything here is synchronous and free of I/O; the external
//! generation collaborator lives behind the `gen-client` crate and is only
//! consulted for rewrite polish, never for the verdict.

pub mod analyzer;
pub mod costar;
pub mod injection;
pub mod language;
pub mod lexical;
pub mod report;
pub mod rewrite;
pub mod score;
pub mod verdict;
pub mod vocabulary;

// Re-export the primary public API at the crate root.
pub use analyzer::ReviewEngine;
pub use report::{Analysis, CostarProfile, Highlight, HighlightCategory, Persona, Verdict};
pub use rewrite::RewritePlan;
pub use vocabulary::{Vocabulary, VocabularyError};
