//! Prompt assembly and localized canned responses.
//!
//! Builds the instruction preamble sent to the generative model and holds
//! the localized apology shown when a collaborator fails. All per-language
//! strings go through [`LocalizedText`] so the fallback chain is uniform.

use std::sync::OnceLock;

use crate::language::{LanguageCode, LocalizedText};
use crate::models::{ChatTurn, Scheme};

/// System preamble for the conversational call.
///
/// Scheme names and categories are inlined so the model can ground its
/// answer in what the repository actually holds.
pub fn system_prompt(language: LanguageCode, schemes: &[Scheme]) -> String {
    let scheme_lines: String = schemes
        .iter()
        .map(|s| {
            format!(
                "- {} ({}): {}",
                s.name.get(language),
                s.category.as_str(),
                s.description.get(language)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful assistant for Indian government welfare schemes. \
         You help citizens discover schemes they may be eligible for, explain \
         benefits and required documents in simple words, and guide them to \
         the application process.\n\n\
         Available schemes:\n{}",
        scheme_lines
    )
}

/// Full prompt for the conversational call: preamble, a bounded window of
/// prior turns, the user query, and the reply-language directive.
pub fn chat_prompt(
    language: LanguageCode,
    schemes: &[Scheme],
    history: &[ChatTurn],
    history_window: usize,
    message: &str,
) -> String {
    let start = history.len().saturating_sub(history_window);
    let context: String = history[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.sender, turn.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nPrevious conversation:\n{}\n\nUser query: {}\n\n\
         IMPORTANT: You MUST respond ONLY in {} ({}). Do not use any other \
         language in your response. Be helpful and conversational while \
         maintaining the specified language throughout your entire response.",
        system_prompt(language, schemes),
        context,
        message,
        language.english_name(),
        language.native_name(),
    )
}

/// Prompt for the structured-extraction call. The model is asked for bare
/// JSON; the caller strips code fences before parsing.
pub fn extraction_prompt(message: &str, language: LanguageCode) -> String {
    format!(
        "Extract user information from this query in JSON format. Only \
         include fields that are explicitly mentioned:\n\
         - age (number)\n\
         - income (monthly income in rupees)\n\
         - state (Indian state name)\n\
         - occupation (job/profession)\n\
         - familySize (number of family members)\n\n\
         Query: \"{}\"\nLanguage: {}\n\n\
         Respond with only valid JSON. Example: {{\"age\": 25, \"state\": \"Maharashtra\"}}",
        message, language
    )
}

/// Localized apology used when the store or the model call fails. Surfaced
/// with the stable `PROCESSING_ERROR` code, never the raw failure.
pub fn apology(language: LanguageCode) -> &'static str {
    static APOLOGIES: OnceLock<LocalizedText> = OnceLock::new();
    APOLOGIES
        .get_or_init(|| {
            LocalizedText::english(
                "Sorry, something went wrong on our side. Please try again later.",
            )
            .with(
                LanguageCode::Hi,
                "क्षमा करें, कुछ तकनीकी समस्या है। कृपया बाद में कोशिश करें।",
            )
            .with(
                LanguageCode::Te,
                "క్షమించండి, సాంకేతిక సమస్య ఉంది. దయచేసి తరువాత ప్రయత్నించండి.",
            )
            .with(
                LanguageCode::Ta,
                "மன்னிக்கவும், தொழில்நுட்பக் கோளாறு உள்ளது. பின்னர் முயற்சிக்கவும்.",
            )
            .with(
                LanguageCode::Bn,
                "দুঃখিত, একটি প্রযুক্তিগত সমস্যা হয়েছে। অনুগ্রহ করে পরে চেষ্টা করুন।",
            )
        })
        .get(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_windows_history() {
        let history: Vec<ChatTurn> = (0..6)
            .map(|i| ChatTurn {
                sender: "user".to_string(),
                text: format!("turn-{}", i),
            })
            .collect();

        let prompt = chat_prompt(LanguageCode::En, &[], &history, 4, "hello");
        // Only the last 4 turns survive
        assert!(!prompt.contains("turn-0"));
        assert!(!prompt.contains("turn-1"));
        assert!(prompt.contains("turn-2"));
        assert!(prompt.contains("turn-5"));
        assert!(prompt.contains("User query: hello"));
    }

    #[test]
    fn test_chat_prompt_names_reply_language() {
        let prompt = chat_prompt(LanguageCode::Ta, &[], &[], 4, "வணக்கம்");
        assert!(prompt.contains("ONLY in Tamil"));
        assert!(prompt.contains("தமிழ்"));
    }

    #[test]
    fn test_apology_localized_with_fallback() {
        assert!(apology(LanguageCode::Hi).contains("क्षमा"));
        // No Kannada entry: falls back to English
        assert!(apology(LanguageCode::Kn).starts_with("Sorry"));
    }
}
