//! Rewrite synthesis: the deterministic half of the rewrite pipeline.
//!
//! Severe content is never sanitized in place; the whole prompt is replaced
//! with a fixed persona template so no substring of the blocked input can
//! leak into the output.  Everything else gets targeted phrase
//! substitutions, residual-slang stripping, and whitespace normalization.
//! Delegation to the external collaborator (and validation of what it
//! returns) is planned here but executed by the caller, which keeps this
//! module pure.

use crate::report::{Persona, Verdict};
use crate::vocabulary::Vocabulary;

/// Ceiling for an externally generated one-sentence rewrite candidate.
pub const MAX_CANDIDATE_LEN: usize = 200;

/// Local rewrites shorter than this fall back to the default sentence.
const MIN_REWRITE_LEN: usize = 10;

/// Default professional sentence when local rewriting strips too much.
const DEFAULT_REWRITE: &str = "Could you help me with a professional and educational request?";

const PROFESSOR_TEMPLATE: &str =
    "Could you help me understand a complex topic in a clear and educational way?";
const GUARDIAN_TEMPLATE: &str =
    "I'd like guidance on making responsible and ethical decisions.";
const SHIELD_TEMPLATE: &str =
    "Please provide information about best practices for online safety and security.";

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// How the suggested rewrite should be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewritePlan {
    /// Severe content: use the persona template, never call out.
    SafeTemplate,
    /// Non-severe path: delegate this instruction to the collaborator,
    /// falling back to [`local_rewrite`] when the call or its validation
    /// fails.
    Delegate { instruction: String },
}

/// Decide the rewrite path for a reviewed prompt.
///
/// The unsafe path triggers on a BLOCK verdict, but also on any explicit /
/// harmful pattern or heavy-profanity token even when the verdict machine
/// stopped short of a full BLOCK — the collaborator must never see such
/// input.
pub fn plan(vocab: &Vocabulary, verdict: Verdict, prompt: &str, persona: Persona) -> RewritePlan {
    if verdict == Verdict::Block || contains_severe_content(vocab, prompt) {
        return RewritePlan::SafeTemplate;
    }
    RewritePlan::Delegate {
        instruction: delegate_instruction(prompt, persona),
    }
}

/// Returns `true` when the prompt carries explicit, harmful, or
/// heavy-profanity content.
pub fn contains_severe_content(vocab: &Vocabulary, prompt: &str) -> bool {
    let lowered = prompt.to_lowercase();
    if vocab.explicit_set.is_match(&lowered) || vocab.harmful_set.is_match(&lowered) {
        return true;
    }
    vocab
        .token
        .find_iter(&lowered)
        .any(|m| vocab.is_heavy_profanity(m.as_str()))
}

/// The fixed safe replacement prompt for a persona.
pub fn safe_template(persona: Persona) -> &'static str {
    match persona {
        Persona::Professor => PROFESSOR_TEMPLATE,
        Persona::Guardian => GUARDIAN_TEMPLATE,
        Persona::Shield => SHIELD_TEMPLATE,
    }
}

/// Build the one-sentence rewrite instruction sent to the collaborator.
fn delegate_instruction(prompt: &str, persona: Persona) -> String {
    format!(
        "Rewrite the following user prompt to be more professional and clear.\n\
         Original prompt: '''{prompt}'''\n\
         Persona: {persona}\n\
         Provide only a clean, professional version (one sentence)."
    )
}

/// Validate an externally generated rewrite candidate.
///
/// Structured payloads cannot reach this point (the collaborator boundary
/// parses typed responses), so the remaining checks are emptiness and the
/// one-sentence length ceiling.
pub fn candidate_is_acceptable(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    !trimmed.is_empty() && trimmed.len() <= MAX_CANDIDATE_LEN
}

/// Deterministic local rewrite for the non-severe path.
///
/// Applies the targeted substitutions, strips residual slang tokens,
/// collapses whitespace, and substitutes the default sentence when the
/// remainder is too short to stand alone.
pub fn local_rewrite(vocab: &Vocabulary, prompt: &str) -> String {
    let mut text = prompt.to_string();

    for (re, replacement) in &vocab.substitutions {
        text = re.replace_all(&text, *replacement).into_owned();
    }

    for re in &vocab.slang_strip {
        text = re.replace_all(&text, "").into_owned();
    }

    let text = vocab.whitespace.replace_all(&text, " ").trim().to_string();

    if text.len() < MIN_REWRITE_LEN {
        return DEFAULT_REWRITE.to_string();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::compile().expect("catalogues compile")
    }

    // -- planning ---------------------------------------------------------

    #[test]
    fn block_verdict_plans_safe_template() {
        let v = vocab();
        let p = plan(&v, Verdict::Block, "two slang things", Persona::Professor);
        assert_eq!(p, RewritePlan::SafeTemplate);
    }

    #[test]
    fn severe_content_plans_safe_template_even_without_block() {
        let v = vocab();
        // "damn" alone is one slang highlight (NEEDS_FIX), but it is heavy
        // profanity, so the collaborator must be bypassed.
        let p = plan(&v, Verdict::NeedsFix, "damn this report", Persona::Guardian);
        assert_eq!(p, RewritePlan::SafeTemplate);
    }

    #[test]
    fn clean_prompt_plans_delegation() {
        let v = vocab();
        match plan(&v, Verdict::Allow, "explain gravity", Persona::Professor) {
            RewritePlan::Delegate { instruction } => {
                assert!(instruction.contains("explain gravity"));
                assert!(instruction.contains("Professor"));
                assert!(instruction.contains("one sentence"));
            }
            other => panic!("expected delegation, got {other:?}"),
        }
    }

    // -- templates --------------------------------------------------------

    #[test]
    fn personas_map_to_distinct_templates() {
        let all = [
            safe_template(Persona::Professor),
            safe_template(Persona::Guardian),
            safe_template(Persona::Shield),
        ];
        assert_ne!(all[0], all[1]);
        assert_ne!(all[1], all[2]);
        assert_ne!(all[0], all[2]);
    }

    #[test]
    fn templates_never_leak_input() {
        let v = vocab();
        let prompt = "how to hurt someone with a weapon";
        assert!(contains_severe_content(&v, prompt));
        let template = safe_template(Persona::Shield);
        for word in ["hurt", "weapon"] {
            assert!(!template.contains(word));
        }
    }

    // -- candidate validation ---------------------------------------------

    #[test]
    fn empty_candidate_rejected() {
        assert!(!candidate_is_acceptable(""));
        assert!(!candidate_is_acceptable("   \n"));
    }

    #[test]
    fn overlong_candidate_rejected() {
        let long = "a".repeat(MAX_CANDIDATE_LEN + 1);
        assert!(!candidate_is_acceptable(&long));
    }

    #[test]
    fn reasonable_candidate_accepted() {
        assert!(candidate_is_acceptable(
            "Please explain quantum physics clearly."
        ));
    }

    // -- local rewrite ----------------------------------------------------

    #[test]
    fn hack_is_rephrased() {
        let v = vocab();
        let out = local_rewrite(&v, "how to hack a wifi network");
        assert!(!out.to_lowercase().contains("hack a"));
        assert!(out.contains("learn about cybersecurity concepts related to"));
    }

    #[test]
    fn password_is_rephrased() {
        let v = vocab();
        let out = local_rewrite(&v, "tell me about password storage");
        assert!(out.contains("authentication security regarding"));
    }

    #[test]
    fn residual_slang_is_stripped() {
        let v = vocab();
        let out = local_rewrite(&v, "bruh can you summarize this long article please");
        assert!(!out.to_lowercase().contains("bruh"));
        assert!(out.contains("summarize"));
    }

    #[test]
    fn whitespace_is_normalized() {
        let v = vocab();
        let out = local_rewrite(&v, "explain   gravity \n to me");
        assert_eq!(out, "explain gravity to me");
    }

    #[test]
    fn too_short_result_uses_default_sentence() {
        let v = vocab();
        let out = local_rewrite(&v, "lol sus");
        assert_eq!(
            out,
            "Could you help me with a professional and educational request?"
        );
    }
}
