//! Pattern and vocabulary catalogues.
//!
//! Contains the static catalogues behind every detector: the slang token
//! vocabulary, the explicit/harmful/injection regex families, the risky and
//! ambiguous phrase heuristics, and the rewrite substitution table.  Each
//! regex entry carries a short name used in logs and reasons, and every
//! catalogue is compiled exactly once into a [`Vocabulary`] that detectors
//! borrow — there is no ambient global state.

use std::collections::HashSet;

use regex::{Regex, RegexSet};

// ---------------------------------------------------------------------------
// Static catalogues
// ---------------------------------------------------------------------------

/// A single named detection pattern.
pub struct RiskPattern {
    /// Short, snake_case identifier used in logs and reasons.
    pub name: &'static str,
    /// A regex string (compiled by [`Vocabulary::compile`]).
    pub pattern: &'static str,
}

/// Casual / profane tokens flagged by the lexical detector.
///
/// Membership is checked per word token, never per substring, so "class"
/// does not trip on "ass" and a bare punctuation mark can never match.
pub static SLANG_TOKENS: &[&str] = &[
    "oi", "bruh", "wtf", "wanna", "gonna", "sus", "lol", "yeet", "slay", "fire", "bet", "fuck",
    "fucking", "shit", "damn",
];

/// The subset of [`SLANG_TOKENS`] that forces the safe-template rewrite path
/// on its own.  These are never stripped in place; their presence replaces
/// the whole prompt.
pub static HEAVY_PROFANITY: &[&str] = &["fuck", "fucking", "shit", "damn"];

/// Explicit-content patterns.
///
/// The single-word entries tolerate letter-stretching evasion (`fuuuck`),
/// the phrase entries catch explicit-topic requests.
pub static EXPLICIT_PATTERNS: &[RiskPattern] = &[
    RiskPattern { name: "stretched_profanity", pattern: r"(?i)\bf+u+c+k+\b" },
    RiskPattern { name: "stretched_sex", pattern: r"(?i)\bs+e+x+\b" },
    RiskPattern { name: "stretched_porn", pattern: r"(?i)\bp+o+r+n+\b" },
    RiskPattern { name: "stretched_nude", pattern: r"(?i)\bn+u+d+e+\b" },
    RiskPattern { name: "explicit_topic", pattern: r"(?i)\b(sexual|erotic|xxx|adult)\b" },
    RiskPattern { name: "solicitation", pattern: r"(?i)\b(prostitut|escort|hookup)\b" },
    RiskPattern { name: "sexual_act", pattern: r"(?i)\b(masturbat|orgasm|climax)\b" },
    RiskPattern {
        name: "anatomy",
        pattern: r"(?i)\b(penis|vagina|breast|ass|dick|cock|pussy)\b",
    },
    RiskPattern {
        name: "sexual_intent",
        pattern: r"(?i)want.*to.*(fuck|have sex|sleep with)",
    },
    RiskPattern {
        name: "adult_seeking",
        pattern: r"(?i)looking for.*(sex|hookup|adult fun)",
    },
];

/// Violent / harmful content patterns.
pub static HARMFUL_PATTERNS: &[RiskPattern] = &[
    RiskPattern { name: "violence", pattern: r"(?i)\b(kill|murder|suicide|self.?harm)\b" },
    RiskPattern { name: "weapons", pattern: r"(?i)\b(bomb|explosive|weapon|gun)\b" },
    RiskPattern { name: "drugs", pattern: r"(?i)\b(drug|cocaine|heroin|meth)\b" },
    RiskPattern { name: "how_to_harm", pattern: r"(?i)how to (hurt|harm|attack|assault)" },
    RiskPattern { name: "ways_to_harm", pattern: r"(?i)ways to (die|kill|harm)" },
];

/// Instruction-override / jailbreak phrasing plus system-token markers.
pub static INJECTION_PATTERNS: &[RiskPattern] = &[
    RiskPattern { name: "ignore_above", pattern: r"(?i)ignore (the )?above" },
    RiskPattern { name: "ignore_previous", pattern: r"(?i)ignore previous instructions" },
    RiskPattern { name: "disregard_above", pattern: r"(?i)disregard.*above" },
    RiskPattern {
        name: "follow_only_below",
        pattern: r"(?i)follow only the instructions below",
    },
    RiskPattern { name: "override_system", pattern: r"(?i)override system prompt" },
    RiskPattern { name: "do_anything_now", pattern: r"(?i)do anything now" },
    RiskPattern { name: "jailbreak", pattern: r"(?i)jailbreak" },
    RiskPattern { name: "pretend_you_are", pattern: r"(?i)pretend you are" },
    RiskPattern { name: "deny_ai", pattern: r"(?i)act as if you are not an ai" },
    RiskPattern { name: "system_token", pattern: r"(?i)<system>|system:" },
];

/// Risky-phrase heuristic: a literal "hack" marks potential illicit intent.
pub const RISKY_PHRASE: &str = r"(?i)\bhack\b";

/// Ambiguous-intent heuristic: "is it ok to ..." is a low-confidence marker.
pub const AMBIGUOUS_PHRASE: &str = r"(?i)\bis it ok to\b";

/// Kannada Unicode block; any codepoint here flags a mixed-script prompt.
pub const KANNADA_BLOCK: &str = r"[\u{0C80}-\u{0CFF}]";

/// Word tokens: contiguous word-character clusters with an optional
/// apostrophe contraction.  Punctuation and whitespace never form a token.
const WORD_TOKEN: &str = r"[A-Za-z0-9_]+(?:'[A-Za-z0-9_]+)?";

/// Targeted phrase substitutions applied by the local rewrite.
pub static REWRITE_SUBSTITUTIONS: &[(&str, &str)] = &[
    (r"(?i)\bhack\b", "learn about cybersecurity concepts related to"),
    (r"(?i)\bpassword\b", "authentication security regarding"),
    (r"(?i)\bcrack\b", "understand the security of"),
    (r"(?i)\bsteal\b", "learn about protecting"),
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while compiling the vocabulary.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to compile catalogue pattern: {0}")]
    RegexCompile(#[from] regex::Error),
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// All catalogues compiled into ready-to-use matchers.
///
/// Compiled once at engine construction and passed by reference into the
/// stateless detectors, so a single instance is shared safely across
/// concurrent analyses.
pub struct Vocabulary {
    pub(crate) slang: HashSet<&'static str>,
    pub(crate) heavy_profanity: HashSet<&'static str>,
    pub(crate) token: Regex,
    pub(crate) explicit_set: RegexSet,
    pub(crate) harmful_set: RegexSet,
    pub(crate) injection_set: RegexSet,
    pub(crate) injection: Vec<Regex>,
    pub(crate) risky: Regex,
    pub(crate) ambiguous: Regex,
    pub(crate) kannada: Regex,
    pub(crate) substitutions: Vec<(Regex, &'static str)>,
    pub(crate) slang_strip: Vec<Regex>,
    pub(crate) whitespace: Regex,
    pub(crate) objective_explain: Regex,
    pub(crate) objective_generate: Regex,
    pub(crate) response_code: Regex,
    pub(crate) response_summary: Regex,
}

impl Vocabulary {
    /// Compile every catalogue and return a ready-to-share vocabulary.
    pub fn compile() -> Result<Self, VocabularyError> {
        let explicit_set =
            RegexSet::new(EXPLICIT_PATTERNS.iter().map(|p| p.pattern))?;
        let harmful_set = RegexSet::new(HARMFUL_PATTERNS.iter().map(|p| p.pattern))?;
        let injection_set =
            RegexSet::new(INJECTION_PATTERNS.iter().map(|p| p.pattern))?;

        // Individual injection regexes are kept alongside the set so the
        // detector can report the literal substring that matched.
        let injection = INJECTION_PATTERNS
            .iter()
            .map(|p| Regex::new(p.pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let substitutions = REWRITE_SUBSTITUTIONS
            .iter()
            .map(|(pat, repl)| Regex::new(pat).map(|re| (re, *repl)))
            .collect::<Result<Vec<_>, _>>()?;

        let heavy_profanity: HashSet<&'static str> =
            HEAVY_PROFANITY.iter().copied().collect();

        // Heavy profanity is handled by whole-prompt replacement, so only
        // the remaining slang tokens get strip regexes.
        let slang_strip = SLANG_TOKENS
            .iter()
            .filter(|t| !heavy_profanity.contains(**t))
            .map(|t| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(t))))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            slang: SLANG_TOKENS.iter().copied().collect(),
            heavy_profanity,
            token: Regex::new(WORD_TOKEN)?,
            explicit_set,
            harmful_set,
            injection_set,
            injection,
            risky: Regex::new(RISKY_PHRASE)?,
            ambiguous: Regex::new(AMBIGUOUS_PHRASE)?,
            kannada: Regex::new(KANNADA_BLOCK)?,
            substitutions,
            slang_strip,
            whitespace: Regex::new(r"\s+")?,
            objective_explain: Regex::new(r"(?i)\b(explain|describe|what is)\b")?,
            objective_generate: Regex::new(r"(?i)\b(generate|write|create|compose)\b")?,
            response_code: Regex::new(r"(?i)\b(code|script|program)\b")?,
            response_summary: Regex::new(r"(?i)\b(summary|summarize)\b")?,
        })
    }

    /// Returns `true` when `token` (already lowercased) is in the slang
    /// vocabulary.
    pub fn is_slang(&self, token: &str) -> bool {
        self.slang.contains(token)
    }

    /// Returns `true` when `token` (already lowercased) is heavy profanity.
    pub fn is_heavy_profanity(&self, token: &str) -> bool {
        self.heavy_profanity.contains(token)
    }
}
