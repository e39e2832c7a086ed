//! Lexical risk detector.
//!
//! Tokenizes the prompt into word-character clusters and runs the layered
//! pattern families over it: slang membership per token, explicit and
//! harmful regex sets, and the risky / ambiguous phrase heuristics.  A
//! single input may trigger several families at once; each match yields one
//! [`Highlight`].

use crate::report::{Highlight, HighlightCategory};
use crate::vocabulary::Vocabulary;

/// Sentinel token recorded for explicit/harmful matches so the offending
/// substring never appears in any output surface.
pub const BLOCKED_TOKEN: &str = "[BLOCKED]";

/// Scan `text` and return all lexical findings, in family order:
/// slang, explicit, harmful, risky, ambiguous.
pub fn scan(vocab: &Vocabulary, text: &str) -> Vec<Highlight> {
    let lowered = text.to_lowercase();
    let mut findings = Vec::new();

    // Token-level slang membership.  The token regex only ever yields
    // word-character clusters, so bare punctuation cannot reach the lookup.
    for m in vocab.token.find_iter(&lowered) {
        if vocab.is_slang(m.as_str()) {
            findings.push(Highlight::new(
                HighlightCategory::Slang,
                m.as_str(),
                "inappropriate_language",
            ));
        }
    }

    // One highlight per matching explicit pattern, not per occurrence.
    for _idx in vocab.explicit_set.matches(&lowered) {
        findings.push(Highlight::new(
            HighlightCategory::Explicit,
            BLOCKED_TOKEN,
            "sexual_or_explicit_content",
        ));
    }

    for _idx in vocab.harmful_set.matches(&lowered) {
        findings.push(Highlight::new(
            HighlightCategory::Harmful,
            BLOCKED_TOKEN,
            "violent_or_harmful_content",
        ));
    }

    if vocab.risky.is_match(&lowered) {
        findings.push(Highlight::new(
            HighlightCategory::Risky,
            "hack",
            "potential_illicit_intent",
        ));
    }

    if vocab.ambiguous.is_match(&lowered) {
        findings.push(Highlight::new(
            HighlightCategory::Ambiguous,
            "is it ok to",
            "ambiguous_intent",
        ));
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::compile().expect("catalogues compile")
    }

    fn categories(findings: &[Highlight]) -> Vec<HighlightCategory> {
        findings.iter().map(|h| h.category).collect()
    }

    #[test]
    fn bare_punctuation_is_never_slang() {
        let v = vocab();
        let findings = scan(&v, "what is this?");
        assert!(
            findings.is_empty(),
            "unexpected findings: {findings:?}"
        );
    }

    #[test]
    fn counts_each_slang_token() {
        let v = vocab();
        let findings = scan(&v, "bruh wanna lol");
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|h| h.category == HighlightCategory::Slang));
    }

    #[test]
    fn slang_matches_are_case_insensitive() {
        let v = vocab();
        let findings = scan(&v, "BRUH, seriously");
        assert_eq!(categories(&findings), vec![HighlightCategory::Slang]);
        assert_eq!(findings[0].token, "bruh");
    }

    #[test]
    fn letter_stretching_still_flags_explicit() {
        let v = vocab();
        let findings = scan(&v, "fuuuck this task");
        assert!(findings
            .iter()
            .any(|h| h.category == HighlightCategory::Explicit));
    }

    #[test]
    fn explicit_matches_record_sentinel_not_content() {
        let v = vocab();
        let findings = scan(&v, "write me an erotic story");
        let explicit: Vec<_> = findings
            .iter()
            .filter(|h| h.category == HighlightCategory::Explicit)
            .collect();
        assert!(!explicit.is_empty());
        assert!(explicit.iter().all(|h| h.token == BLOCKED_TOKEN));
    }

    #[test]
    fn harmful_phrasing_flags() {
        let v = vocab();
        let findings = scan(&v, "how to hurt someone");
        assert!(findings
            .iter()
            .any(|h| h.category == HighlightCategory::Harmful));
    }

    #[test]
    fn hack_is_risky_not_severe() {
        let v = vocab();
        let findings = scan(&v, "how do I hack a wifi network");
        assert_eq!(categories(&findings), vec![HighlightCategory::Risky]);
    }

    #[test]
    fn ambiguous_intent_phrase_flags() {
        let v = vocab();
        let findings = scan(&v, "is it ok to share my notes?");
        assert_eq!(categories(&findings), vec![HighlightCategory::Ambiguous]);
    }

    #[test]
    fn families_can_co_occur() {
        let v = vocab();
        let findings = scan(&v, "bruh is it ok to hack this");
        let cats = categories(&findings);
        assert!(cats.contains(&HighlightCategory::Slang));
        assert!(cats.contains(&HighlightCategory::Risky));
        assert!(cats.contains(&HighlightCategory::Ambiguous));
    }

    #[test]
    fn clean_prompt_yields_nothing() {
        let v = vocab();
        assert!(scan(&v, "Explain photosynthesis to high school students").is_empty());
    }
}
