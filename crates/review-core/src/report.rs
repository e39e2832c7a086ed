//! Result types shared by the detectors, the verdict machine, and the
//! transport layer.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// Voice selector shaping rewrite phrasing.  Has no effect on the safety
/// decision itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Persona {
    /// Clear, educational phrasing.
    #[default]
    Professor,
    /// Responsible / ethics-guidance phrasing.
    Guardian,
    /// Safety and security-practice phrasing.
    Shield,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Professor => write!(f, "Professor"),
            Self::Guardian => write!(f, "Guardian"),
            Self::Shield => write!(f, "Shield"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The tri-state gate outcome.
///
/// Variants are ordered by ascending severity, so `Verdict::Block` compares
/// greater than the other two.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Verdict {
    /// Safe and clear; the prompt may be forwarded.
    #[serde(rename = "ALLOW")]
    Allow,
    /// Ambiguous or a single minor issue; a corrected rewrite is suggested.
    #[serde(rename = "NEEDS_FIX")]
    NeedsFix,
    /// Disallowed content or injection; never forwarded.
    #[serde(rename = "BLOCK")]
    Block,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "ALLOW"),
            Self::NeedsFix => write!(f, "NEEDS_FIX"),
            Self::Block => write!(f, "BLOCK"),
        }
    }
}

// ---------------------------------------------------------------------------
// Highlights
// ---------------------------------------------------------------------------

/// Classification of a single flagged issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightCategory {
    Slang,
    Explicit,
    Harmful,
    Risky,
    Ambiguous,
    Injection,
    MixedLanguage,
}

impl fmt::Display for HighlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slang => write!(f, "slang"),
            Self::Explicit => write!(f, "explicit"),
            Self::Harmful => write!(f, "harmful"),
            Self::Risky => write!(f, "risky"),
            Self::Ambiguous => write!(f, "ambiguous"),
            Self::Injection => write!(f, "injection"),
            Self::MixedLanguage => write!(f, "mixed_language"),
        }
    }
}

/// One flagged issue instance, produced by exactly one detector and never
/// mutated afterwards.
///
/// Explicit and harmful matches carry the `[BLOCKED]` sentinel as their
/// token rather than the offending substring, which is what keeps blocked
/// content out of every downstream surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(rename = "type")]
    pub category: HighlightCategory,
    pub token: String,
    pub reason: String,
}

impl Highlight {
    pub fn new(
        category: HighlightCategory,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            category,
            token: token.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// COSTAR profile
// ---------------------------------------------------------------------------

/// The six-field structured context profile inferred from a prompt.
///
/// Fields are never empty strings: unset fields carry the "None" sentinel,
/// Audience falls back to "General" and Response to the Objective value or
/// "Text".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CostarProfile {
    pub context: String,
    pub objective: String,
    pub style: String,
    pub tone: String,
    pub audience: String,
    pub response: String,
}

impl Default for CostarProfile {
    fn default() -> Self {
        Self {
            context: "None".to_string(),
            objective: "None".to_string(),
            style: "None".to_string(),
            tone: "None".to_string(),
            audience: "General".to_string(),
            response: "Text".to_string(),
        }
    }
}

impl CostarProfile {
    /// Returns `true` when no domain context was inferred.
    pub fn has_no_context(&self) -> bool {
        self.context.is_empty() || self.context == "None"
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// The aggregate outcome of one review pass, constructed fresh per request
/// and immutable once built.  The suggested rewrite is attached by the
/// caller after executing the rewrite plan, since producing it may involve
/// the external collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub verdict: Verdict,
    pub score: u8,
    pub costar: CostarProfile,
    pub highlights: Vec<Highlight>,
    pub reasons: Vec<String>,
}

impl Analysis {
    /// Count of highlights in the given category.
    pub fn count_of(&self, category: HighlightCategory) -> usize {
        self.highlights
            .iter()
            .filter(|h| h.category == category)
            .count()
    }
}
