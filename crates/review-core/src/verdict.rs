//! Verdict decision machine.
//!
//! An ordered, short-circuiting rule chain over the aggregated highlights.
//! Severity-based rules strictly precede count-based rules, so a single
//! explicit-content match blocks even though the count rules alone would
//! grant NEEDS_FIX for a lone issue.  The ordering is observable behavior
//! and must not change.

use crate::report::{Highlight, HighlightCategory, Verdict};

/// Two or more distinct slang hits block on their own.
const SLANG_BLOCK_THRESHOLD: usize = 2;

/// Resolve the verdict from the highlight sequence and the injection flag.
///
/// First matching rule wins:
/// 1. any explicit or harmful highlight -> BLOCK
/// 2. injection found -> BLOCK
/// 3. slang count >= 2 -> BLOCK
/// 4. zero highlights -> ALLOW
/// 5. at most one highlight -> NEEDS_FIX
/// 6. otherwise -> BLOCK
pub fn decide(highlights: &[Highlight], injection_found: bool) -> Verdict {
    if highlights.iter().any(|h| {
        matches!(
            h.category,
            HighlightCategory::Explicit | HighlightCategory::Harmful
        )
    }) {
        return Verdict::Block;
    }

    if injection_found {
        return Verdict::Block;
    }

    let slang_count = highlights
        .iter()
        .filter(|h| h.category == HighlightCategory::Slang)
        .count();
    if slang_count >= SLANG_BLOCK_THRESHOLD {
        return Verdict::Block;
    }

    match highlights.len() {
        0 => Verdict::Allow,
        1 => Verdict::NeedsFix,
        _ => Verdict::Block,
    }
}
