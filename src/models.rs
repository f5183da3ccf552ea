//! Core data models: scheme records, conversation turns, and the JSON
//! bodies exchanged over the HTTP API.

use serde::{Deserialize, Serialize};

use crate::language::{LanguageCode, LocalizedText};

/// A government welfare scheme record.
///
/// Name, description, and benefit amount are localized tables; callers
/// resolve them with [`LocalizedText::get`]. `state` is `None` for
/// nationwide schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub category: SchemeCategory,
    /// Unstructured eligibility criteria (land holding, income caps, ...).
    pub eligibility: serde_json::Value,
    pub documents: Vec<String>,
    pub application_process: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benefit_amount: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub is_active: bool,
}

/// Scheme category. Closed set; `Other` absorbs anything the seed data
/// or a future import does not classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeCategory {
    Agriculture,
    Education,
    Health,
    Housing,
    Women,
    Employment,
    Financial,
    Other,
}

impl SchemeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemeCategory::Agriculture => "agriculture",
            SchemeCategory::Education => "education",
            SchemeCategory::Health => "health",
            SchemeCategory::Housing => "housing",
            SchemeCategory::Women => "women",
            SchemeCategory::Employment => "employment",
            SchemeCategory::Financial => "financial",
            SchemeCategory::Other => "other",
        }
    }

    pub fn from_str_loose(s: &str) -> Self {
        match s {
            "agriculture" => SchemeCategory::Agriculture,
            "education" => SchemeCategory::Education,
            "health" => SchemeCategory::Health,
            "housing" => SchemeCategory::Housing,
            "women" => SchemeCategory::Women,
            "employment" => SchemeCategory::Employment,
            "financial" => SchemeCategory::Financial,
            _ => SchemeCategory::Other,
        }
    }
}

/// One prior turn of a conversation, as sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// `"user"` or `"assistant"`.
    pub sender: String,
    pub text: String,
}

/// User attributes extracted best-effort from the query by the model.
/// Every field is optional; extraction failure degrades to the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Monthly income in rupees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_size: Option<u32>,
}

impl ExtractedInfo {
    pub fn is_empty(&self) -> bool {
        *self == ExtractedInfo::default()
    }
}

// ============ HTTP bodies ============

/// `POST /api/chat` request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Defaults to Hindi when the client sends no language.
    #[serde(default = "default_chat_language")]
    pub language: LanguageCode,
    #[serde(default)]
    pub conversation_history: Vec<ChatTurn>,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn default_chat_language() -> LanguageCode {
    LanguageCode::Hi
}

/// `POST /api/chat` success response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub schemes: Vec<Scheme>,
    pub session_id: String,
    pub extracted_info: ExtractedInfo,
}

/// `GET /api/schemes` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemeQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
}

impl SchemeQuery {
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.category.is_none() && self.state.is_none()
    }
}

/// `GET /api/schemes` response body.
#[derive(Debug, Clone, Serialize)]
pub struct SchemeListResponse {
    pub success: bool,
    pub data: Vec<Scheme>,
    pub count: usize,
}

/// `GET /api/schemes/{id}` success response body.
#[derive(Debug, Clone, Serialize)]
pub struct SchemeResponse {
    pub success: bool,
    pub data: Scheme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert_eq!(req.language, LanguageCode::Hi);
        assert!(req.conversation_history.is_empty());
        assert!(req.session_id.is_none());
    }

    #[test]
    fn test_chat_request_rejects_unknown_language() {
        let res = serde_json::from_str::<ChatRequest>(r#"{"message":"hi","language":"xx"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_category_loose_parse() {
        assert_eq!(
            SchemeCategory::from_str_loose("agriculture"),
            SchemeCategory::Agriculture
        );
        assert_eq!(
            SchemeCategory::from_str_loose("anything-else"),
            SchemeCategory::Other
        );
    }
}
