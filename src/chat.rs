//! Chat orchestration.
//!
//! One request, one response: validate the message, ensure a session id,
//! ask the model for a reply in the requested language, extract user
//! attributes best-effort, match the query against scheme categories by
//! keyword, and resolve the suggested ids to full records.
//!
//! Collaborator failures (store or model) are wrapped in
//! [`ApiError::Dependency`], which logs the cause and shows the caller a
//! localized apology with the stable `PROCESSING_ERROR` code.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::assistant::{parse_extraction, LanguageModel};
use crate::config::AssistantConfig;
use crate::error::ApiError;
use crate::models::{ChatRequest, ChatResponse, Scheme, SchemeCategory};
use crate::prompts;
use crate::store;

/// Keyword → category table used to suggest schemes for a query. Matching
/// is plain lowercase substring search, as cheap as it looks.
const CATEGORY_KEYWORDS: &[(&str, SchemeCategory)] = &[
    ("किसान", SchemeCategory::Agriculture),
    ("farmer", SchemeCategory::Agriculture),
    ("agriculture", SchemeCategory::Agriculture),
    ("छात्रवृत्ति", SchemeCategory::Education),
    ("scholarship", SchemeCategory::Education),
    ("education", SchemeCategory::Education),
    ("घर", SchemeCategory::Housing),
    ("house", SchemeCategory::Housing),
    ("housing", SchemeCategory::Housing),
    ("इलाज", SchemeCategory::Health),
    ("health", SchemeCategory::Health),
    ("hospital", SchemeCategory::Health),
    ("महिला", SchemeCategory::Women),
    ("women", SchemeCategory::Women),
    ("mother", SchemeCategory::Women),
    ("रोजगार", SchemeCategory::Employment),
    ("job", SchemeCategory::Employment),
    ("employment", SchemeCategory::Employment),
];

/// Process one chat message end to end.
pub async fn process_message(
    pool: &SqlitePool,
    model: &dyn LanguageModel,
    config: &AssistantConfig,
    request: ChatRequest,
) -> Result<ChatResponse, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::validation("message is required"));
    }

    let language = request.language;
    let session_id = request
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let available = store::all_active(pool)
        .await
        .map_err(|e| ApiError::dependency(language, e))?;

    let prompt = prompts::chat_prompt(
        language,
        &available,
        &request.conversation_history,
        config.history_window,
        &request.message,
    );

    let reply = model
        .generate(&prompt)
        .await
        .map_err(|e| ApiError::dependency(language, e))?;

    // Extraction is best-effort: a failed call or unparseable reply
    // degrades to the empty extraction.
    let extracted_info = match model
        .generate(&prompts::extraction_prompt(&request.message, language))
        .await
    {
        Ok(raw) => parse_extraction(&raw),
        Err(e) => {
            tracing::warn!("extraction call failed: {:#}", e);
            Default::default()
        }
    };

    let suggested = suggest_schemes(&request.message, &available, config.suggestion_limit);
    let schemes = store::by_ids(pool, &suggested)
        .await
        .map_err(|e| ApiError::dependency(language, e))?;

    tracing::info!(
        session = %session_id,
        language = %language,
        schemes = schemes.len(),
        "chat reply generated"
    );

    Ok(ChatResponse {
        response: reply,
        schemes,
        session_id,
        extracted_info,
    })
}

/// Pick scheme ids whose category matches a keyword found in the query.
fn suggest_schemes(message: &str, schemes: &[Scheme], limit: usize) -> Vec<String> {
    let keywords = message.to_lowercase();

    let mut ids = Vec::new();
    for scheme in schemes {
        let hit = CATEGORY_KEYWORDS
            .iter()
            .any(|(kw, cat)| *cat == scheme.category && keywords.contains(kw));
        if hit && !ids.contains(&scheme.id) {
            ids.push(scheme.id.clone());
        }
    }

    ids.truncate(limit);
    ids
}
