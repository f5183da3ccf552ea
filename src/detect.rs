//! Heuristic language detection.
//!
//! Scores free-form text against two per-language signal tables:
//!
//! - **Script signals** — inclusive Unicode code-point ranges for each
//!   writing system. Every character inside a language's range adds 3 to
//!   that language's score. Languages sharing a script (Hindi/Marathi on
//!   Devanagari, Bengali/Assamese on Bengali) accumulate identical script
//!   scores by construction; that ambiguity is expected and resolved by
//!   the lexical pass or the tie-break rule, never hidden.
//! - **Lexical signals** — short high-frequency function words. Each
//!   non-overlapping whole-word occurrence adds 2.
//!
//! Confidence is `min(winning_score / normalized_length, 1.0)` where the
//! length is counted in Unicode scalar values. Two sentinel results exist
//! and must not be conflated by callers:
//!
//! - empty or whitespace-only input → `(En, 0.0)` — no evidence at all;
//! - winning confidence below 0.1 → `(En, 0.5)` — low-confidence fallback.
//!
//! [`detect`] is a pure total function: it never fails, has no side
//! effects, and characters outside every script range simply score
//! nowhere. The signal tables are built once at first use and never
//! mutated, so the detector is thread-safe by construction.

use serde::Serialize;
use std::sync::OnceLock;

use crate::language::{LanguageCode, ALL_LANGUAGES};

/// Points per character matching a language's script range.
const SCRIPT_WEIGHT: u32 = 3;
/// Points per whole-word lexical marker occurrence.
const LEXICAL_WEIGHT: u32 = 2;
/// Winning confidence below this triggers the English fallback.
const FALLBACK_THRESHOLD: f64 = 0.1;
/// Fixed confidence reported on the low-confidence fallback path.
const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Best-guess language for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionResult {
    pub language: LanguageCode,
    /// Heuristic certainty in `[0, 1]`; not a calibrated probability.
    pub confidence: f64,
}

/// One language's signal row: script ranges plus lexical markers.
struct SignalEntry {
    language: LanguageCode,
    /// Inclusive code-point ranges for the writing system.
    script: &'static [(u32, u32)],
    /// Common function words and particles, matched as whole words.
    markers: &'static [&'static str],
}

/// The immutable per-language signal tables.
///
/// Constructed once at process start (or first use via [`signals`]) and
/// shared read-only. Rows are ordered by [`ALL_LANGUAGES`], which defines
/// the tie-break preference.
pub struct LanguageSignals {
    entries: Vec<SignalEntry>,
}

fn entry(lang: LanguageCode) -> SignalEntry {
    let script: &'static [(u32, u32)] = match lang {
        // Latin letters; text is lowercased first but the uppercase range
        // is kept for symmetry with the other tables.
        LanguageCode::En => &[(0x0041, 0x005A), (0x0061, 0x007A)],
        // Devanagari, shared by Hindi and Marathi.
        LanguageCode::Hi | LanguageCode::Mr => &[(0x0900, 0x097F)],
        LanguageCode::Te => &[(0x0C00, 0x0C7F)],
        LanguageCode::Ta => &[(0x0B80, 0x0BFF)],
        // Bengali script, shared by Bengali and Assamese.
        LanguageCode::Bn | LanguageCode::As => &[(0x0980, 0x09FF)],
        LanguageCode::Gu => &[(0x0A80, 0x0AFF)],
        LanguageCode::Kn => &[(0x0C80, 0x0CFF)],
        LanguageCode::Ml => &[(0x0D00, 0x0D7F)],
        // Gurmukhi.
        LanguageCode::Pa => &[(0x0A00, 0x0A7F)],
        // Oriya.
        LanguageCode::Or => &[(0x0B00, 0x0B7F)],
        // Arabic script.
        LanguageCode::Ur => &[(0x0600, 0x06FF)],
    };

    let markers: &'static [&'static str] = match lang {
        LanguageCode::En => &[
            "the", "is", "and", "to", "of", "in", "for", "with", "on", "at", "by", "from",
        ],
        LanguageCode::Hi => &[
            "है", "में", "के", "की", "को", "और", "या", "से", "पर", "मैं", "आप", "यह", "वह",
        ],
        LanguageCode::Te => &[
            "లో", "కు", "నుండి", "తో", "అని", "ఉంది", "అవుతుంది", "చేయాలి", "వచ్చింది", "మరియు",
        ],
        LanguageCode::Ta => &[
            "இல்", "கு", "ஆக", "ல்", "உம்", "ஆன", "என்று", "செய்", "வரும்", "மற்றும்",
        ],
        LanguageCode::Bn => &["এর", "তে", "কে", "হয়", "করে", "থেকে", "সাথে", "আমি", "তুমি", "এবং"],
        LanguageCode::Mr => &[
            "मध्ये", "ला", "ने", "आहे", "करून", "पासून", "सोबत", "मी", "तुम्ही", "आणि",
        ],
        LanguageCode::Gu => &["માં", "ને", "થી", "સાથે", "છે", "કરીને", "હું", "તમે", "અને"],
        LanguageCode::Kn => &["ಯಲ್ಲಿ", "ಗೆ", "ಇಂದ", "ಜೊತೆ", "ಇದೆ", "ಮಾಡಿ", "ನಾನು", "ನೀವು", "ಮತ್ತು"],
        LanguageCode::Ml => &["ൽ", "ക്ക്", "ൽ നിന്ന്", "ഓട്", "ആണ്", "ചെയ്ത്", "ഞാൻ", "നിങ്ങൾ", "ഉം"],
        LanguageCode::Pa => &["ਵਿੱਚ", "ਨੂੰ", "ਤੋਂ", "ਨਾਲ", "ਹੈ", "ਕਰਕੇ", "ਮੈਂ", "ਤੁਸੀਂ", "ਅਤੇ"],
        LanguageCode::Or => &["ରେ", "କୁ", "ରୁ", "ସହିତ", "ଅଛି", "କରି", "ମୁଁ", "ଆପଣ", "ଏବଂ"],
        LanguageCode::As => &["ত", "লৈ", "ৰ পৰা", "সৈতে", "আছে", "কৰি", "মই", "আপুনি", "আৰু"],
        LanguageCode::Ur => &["میں", "کو", "سے", "کے ساتھ", "ہے", "کرکے", "آپ", "اور"],
    };

    SignalEntry {
        language: lang,
        script,
        markers,
    }
}

impl LanguageSignals {
    /// Build the full signal tables, one row per supported language.
    pub fn new() -> Self {
        Self {
            entries: ALL_LANGUAGES.iter().map(|&l| entry(l)).collect(),
        }
    }

    /// Detect the language of `text`.
    ///
    /// See the module docs for the scoring rules and sentinel results.
    pub fn detect(&self, text: &str) -> DetectionResult {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return DetectionResult {
                language: LanguageCode::En,
                confidence: 0.0,
            };
        }

        let text_len = normalized.chars().count();

        let mut winner = LanguageCode::En;
        let mut best_score = 0u32;

        for row in &self.entries {
            let mut score = 0u32;

            for ch in normalized.chars() {
                let cp = ch as u32;
                if row.script.iter().any(|&(lo, hi)| cp >= lo && cp <= hi) {
                    score += SCRIPT_WEIGHT;
                }
            }

            for marker in row.markers {
                score += whole_word_count(&normalized, marker) as u32 * LEXICAL_WEIGHT;
            }

            // Strictly-greater keeps the earliest row on ties, so the
            // ALL_LANGUAGES order is the tie-break rule.
            if score > best_score {
                best_score = score;
                winner = row.language;
            }
        }

        let confidence = (best_score as f64 / text_len as f64).min(1.0);

        if confidence < FALLBACK_THRESHOLD {
            return DetectionResult {
                language: LanguageCode::En,
                confidence: FALLBACK_CONFIDENCE,
            };
        }

        DetectionResult {
            language: winner,
            confidence,
        }
    }
}

impl Default for LanguageSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide signal tables, built on first use.
pub fn signals() -> &'static LanguageSignals {
    static SIGNALS: OnceLock<LanguageSignals> = OnceLock::new();
    SIGNALS.get_or_init(LanguageSignals::new)
}

/// Detect the language of `text` using the shared signal tables.
pub fn detect(text: &str) -> DetectionResult {
    signals().detect(text)
}

/// Count non-overlapping whole-word occurrences of `marker` in `text`.
///
/// An occurrence counts when the characters adjacent to it (if any) are
/// not alphanumeric, which works for Indic scripts where ASCII `\b`
/// boundaries do not.
fn whole_word_count(text: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(marker) {
        let begin = search_from + offset;
        let end = begin + marker.len();

        let before_ok = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());

        if before_ok && after_ok {
            count += 1;
            search_from = end;
        } else {
            let step = text[begin..].chars().next().map_or(1, |c| c.len_utf8());
            search_from = begin + step;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_whitespace_no_evidence() {
        for input in ["", "   ", "\n\t "] {
            let r = detect(input);
            assert_eq!(r.language, LanguageCode::En);
            assert_eq!(r.confidence, 0.0);
        }
    }

    #[test]
    fn test_low_confidence_fallback_sentinel() {
        // Digits and punctuation match no script range: score 0, which
        // falls below the threshold and returns the fixed 0.5 sentinel.
        let r = detect("1234567890 ?!");
        assert_eq!(r.language, LanguageCode::En);
        assert_eq!(r.confidence, 0.5);
    }

    #[test]
    fn test_pure_script_detection() {
        assert_eq!(detect("నమస్కారం అండి").language, LanguageCode::Te);
        assert_eq!(detect("வணக்கம் நண்பரே").language, LanguageCode::Ta);
        assert_eq!(detect("ಹೇಗಿದ್ದೀರಾ ನೀವು").language, LanguageCode::Kn);
        assert_eq!(detect("કેમ છો તમે").language, LanguageCode::Gu);
        assert_eq!(detect("ਸਤ ਸ੍ਰੀ ਅਕਾਲ ਜੀ").language, LanguageCode::Pa);

        for text in ["నమస్కారం అండి", "வணக்கம் நண்பரே"] {
            assert!(detect(text).confidence > 0.1);
        }
    }

    #[test]
    fn test_hindi_beats_marathi_on_script_tie() {
        // Pure Devanagari with no lexical markers for either language:
        // script scores tie and the declaration order prefers Hindi.
        let r = detect("नमस्ते");
        assert_eq!(r.language, LanguageCode::Hi);
    }

    #[test]
    fn test_lexical_markers_break_shared_script_tie() {
        // Shared Devanagari range; "मैं" is a Hindi marker, so the
        // lexical pass pushes Hindi ahead of Marathi.
        let r = detect("नमस्ते, मैं किसान हूं");
        assert_eq!(r.language, LanguageCode::Hi);
        assert!(r.confidence > 0.3, "confidence {} too low", r.confidence);

        // And the Marathi markers push the other way.
        let r = detect("नमस्कार, मी शेतकरी आहे");
        assert_eq!(r.language, LanguageCode::Mr);
    }

    #[test]
    fn test_bengali_markers_beat_assamese() {
        let r = detect("আমি কৃষক");
        assert_eq!(r.language, LanguageCode::Bn);
    }

    #[test]
    fn test_english_sentence() {
        let r = detect("Tell me about farmer schemes");
        assert_eq!(r.language, LanguageCode::En);
        assert!(r.confidence > 0.1);
    }

    #[test]
    fn test_deterministic() {
        let a = detect("नमस्ते, मैं किसान हूं");
        let b = detect("नमस्ते, मैं किसान हूं");
        assert_eq!(a, b);
    }

    #[test]
    fn test_confidence_monotone_in_signals() {
        // Same length, one extra English marker. The digit padding keeps
        // the score below the length so the cap does not mask the change.
        let without = detect("cat sat mat 00000000000000000000000000");
        let with = detect("the sat mat 00000000000000000000000000");
        assert!(without.confidence < 1.0);
        assert!(with.confidence > without.confidence);
    }

    #[test]
    fn test_additive_scoring_on_bilingual_text() {
        // The Hindi half contributes far more raw score (script weight 3
        // per character) than the short English tail, so the concatenation
        // keeps the Hindi winner.
        let r = detect("नमस्ते, मैं किसान हूं ok");
        assert_eq!(r.language, LanguageCode::Hi);
    }

    #[test]
    fn test_whole_word_boundaries() {
        // "in" inside "inside" must not count; standalone "in" must.
        assert_eq!(whole_word_count("inside the bin", "in"), 0);
        assert_eq!(whole_word_count("in the house", "in"), 1);
        assert_eq!(whole_word_count("in in in", "in"), 3);
        // Punctuation is a boundary.
        assert_eq!(whole_word_count("go in, then out", "in"), 1);
    }

    #[test]
    fn test_signal_tables_total_over_enum() {
        let tables = LanguageSignals::new();
        assert_eq!(tables.entries.len(), ALL_LANGUAGES.len());
        for row in &tables.entries {
            assert!(
                !row.script.is_empty(),
                "{} has no script range",
                row.language
            );
            assert!(!row.markers.is_empty(), "{} has no markers", row.language);
        }
    }
}
