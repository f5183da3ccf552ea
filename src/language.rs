//! Supported languages and localized text.
//!
//! Defines the closed set of language codes the assistant understands
//! (English plus twelve Indian official languages) and [`LocalizedText`],
//! a per-language string table with an explicit fallback chain.
//!
//! The declaration order of [`LanguageCode`] is significant: the language
//! detector resolves score ties by preferring the earliest variant, so
//! Hindi wins over Marathi (shared Devanagari script) and Bengali over
//! Assamese (shared Bengali script).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A supported language tag.
///
/// Serialized on the wire as the lowercase ISO 639-1 code (`"en"`, `"hi"`, …).
/// The set is fixed at compile time; unknown codes are rejected during
/// request deserialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    En,
    Hi,
    Te,
    Ta,
    Bn,
    Mr,
    Gu,
    Kn,
    Ml,
    Pa,
    Or,
    As,
    Ur,
}

/// All supported languages, in tie-break order.
pub const ALL_LANGUAGES: [LanguageCode; 13] = [
    LanguageCode::En,
    LanguageCode::Hi,
    LanguageCode::Te,
    LanguageCode::Ta,
    LanguageCode::Bn,
    LanguageCode::Mr,
    LanguageCode::Gu,
    LanguageCode::Kn,
    LanguageCode::Ml,
    LanguageCode::Pa,
    LanguageCode::Or,
    LanguageCode::As,
    LanguageCode::Ur,
];

impl LanguageCode {
    /// Lowercase ISO code used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Hi => "hi",
            LanguageCode::Te => "te",
            LanguageCode::Ta => "ta",
            LanguageCode::Bn => "bn",
            LanguageCode::Mr => "mr",
            LanguageCode::Gu => "gu",
            LanguageCode::Kn => "kn",
            LanguageCode::Ml => "ml",
            LanguageCode::Pa => "pa",
            LanguageCode::Or => "or",
            LanguageCode::As => "as",
            LanguageCode::Ur => "ur",
        }
    }

    /// Parse a lowercase ISO code. Returns `None` for anything outside the
    /// supported set.
    pub fn from_code(code: &str) -> Option<Self> {
        ALL_LANGUAGES.iter().copied().find(|l| l.as_str() == code)
    }

    /// English display name.
    pub fn english_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Hi => "Hindi",
            LanguageCode::Te => "Telugu",
            LanguageCode::Ta => "Tamil",
            LanguageCode::Bn => "Bengali",
            LanguageCode::Mr => "Marathi",
            LanguageCode::Gu => "Gujarati",
            LanguageCode::Kn => "Kannada",
            LanguageCode::Ml => "Malayalam",
            LanguageCode::Pa => "Punjabi",
            LanguageCode::Or => "Odia",
            LanguageCode::As => "Assamese",
            LanguageCode::Ur => "Urdu",
        }
    }

    /// Name in the language's own script, used when instructing the model
    /// which language to answer in.
    pub fn native_name(self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Hi => "हिंदी",
            LanguageCode::Te => "తెలుగు",
            LanguageCode::Ta => "தமிழ்",
            LanguageCode::Bn => "বাংলা",
            LanguageCode::Mr => "मराठी",
            LanguageCode::Gu => "ગુજરાતી",
            LanguageCode::Kn => "ಕನ್ನಡ",
            LanguageCode::Ml => "മലയാളം",
            LanguageCode::Pa => "ਪੰਜਾਬੀ",
            LanguageCode::Or => "ଓଡ଼ିଆ",
            LanguageCode::As => "অসমীয়া",
            LanguageCode::Ur => "اردو",
        }
    }

    /// BCP-47 tag for browser speech recognition/synthesis clients.
    pub fn speech_tag(self) -> &'static str {
        match self {
            LanguageCode::En => "en-US",
            LanguageCode::Hi => "hi-IN",
            LanguageCode::Te => "te-IN",
            LanguageCode::Ta => "ta-IN",
            LanguageCode::Bn => "bn-IN",
            LanguageCode::Mr => "mr-IN",
            LanguageCode::Gu => "gu-IN",
            LanguageCode::Kn => "kn-IN",
            LanguageCode::Ml => "ml-IN",
            LanguageCode::Pa => "pa-IN",
            LanguageCode::Or => "or-IN",
            LanguageCode::As => "as-IN",
            LanguageCode::Ur => "ur-IN",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string table keyed by language with a deterministic fallback chain.
///
/// Lookup order: requested language, then English, then the first entry
/// present. This replaces ad hoc `table[lang] || table[default]` indexing
/// at call sites with a single total lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<LanguageCode, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from a single English string. Seed data that has not been
    /// translated yet uses this.
    pub fn english(text: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(LanguageCode::En, text.into());
        Self(map)
    }

    pub fn with(mut self, lang: LanguageCode, text: impl Into<String>) -> Self {
        self.0.insert(lang, text.into());
        self
    }

    /// Resolve the text for `lang`, falling back to English, then to the
    /// first entry. Returns an empty string only for an empty table.
    pub fn get(&self, lang: LanguageCode) -> &str {
        self.0
            .get(&lang)
            .or_else(|| self.0.get(&LanguageCode::En))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for lang in ALL_LANGUAGES {
            assert_eq!(LanguageCode::from_code(lang.as_str()), Some(lang));
        }
        assert_eq!(LanguageCode::from_code("fr"), None);
        assert_eq!(LanguageCode::from_code(""), None);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&LanguageCode::Hi).unwrap();
        assert_eq!(json, "\"hi\"");
        let parsed: LanguageCode = serde_json::from_str("\"ta\"").unwrap();
        assert_eq!(parsed, LanguageCode::Ta);
        assert!(serde_json::from_str::<LanguageCode>("\"xx\"").is_err());
    }

    #[test]
    fn test_localized_fallback_chain() {
        let t = LocalizedText::english("hello").with(LanguageCode::Hi, "नमस्ते");
        assert_eq!(t.get(LanguageCode::Hi), "नमस्ते");
        // Missing language falls back to English
        assert_eq!(t.get(LanguageCode::Ta), "hello");

        // No English entry: first entry wins
        let t = LocalizedText::new().with(LanguageCode::Te, "హలో");
        assert_eq!(t.get(LanguageCode::En), "హలో");

        // Empty table resolves to the empty string
        assert_eq!(LocalizedText::new().get(LanguageCode::En), "");
    }

    #[test]
    fn test_speech_tag_default() {
        assert_eq!(LanguageCode::En.speech_tag(), "en-US");
        assert_eq!(LanguageCode::Hi.speech_tag(), "hi-IN");
    }
}
