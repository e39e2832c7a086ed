//! Script-mixing detector.
//!
//! Flags prompts containing any codepoint from the Kannada Unicode block
//! (U+0C80..U+0CFF).  Transliterated Kannada written in Latin script is not
//! detected; only native-script characters trip the flag.

use crate::vocabulary::Vocabulary;

/// Returns `true` when `text` contains at least one Kannada codepoint.
pub fn has_mixed_script(vocab: &Vocabulary, text: &str) -> bool {
    vocab.kannada.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::compile().expect("catalogues compile")
    }

    #[test]
    fn detects_kannada_characters() {
        let v = vocab();
        assert!(has_mixed_script(&v, "please translate ಕನ್ನಡ for me"));
    }

    #[test]
    fn plain_ascii_is_clean() {
        let v = vocab();
        assert!(!has_mixed_script(&v, "explain quantum physics"));
    }

    #[test]
    fn other_non_latin_scripts_do_not_trip() {
        let v = vocab();
        // Devanagari and CJK are outside the watched block.
        assert!(!has_mixed_script(&v, "नमस्ते 你好"));
    }
}
