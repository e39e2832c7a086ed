//! Score calculator.
//!
//! The score is a flat issue-density signal: every highlight costs the same
//! 18 points regardless of severity class.  Severity differentiation lives
//! in the verdict machine, not here.

use crate::report::CostarProfile;

/// Points deducted per flagged issue.
const ISSUE_PENALTY: i32 = 18;

/// Flat deduction when no domain context was inferred.
const NO_CONTEXT_PENALTY: i32 = 5;

/// Compute the 0-100 review score from the aggregated issue count and the
/// inferred context profile.
pub fn compute(issue_count: usize, costar: &CostarProfile) -> u8 {
    let mut score = (100 - issue_count as i32 * ISSUE_PENALTY).clamp(0, 100);
    if costar.has_no_context() {
        score -= NO_CONTEXT_PENALTY;
    }
    score.clamp(0, 100) as u8
}
