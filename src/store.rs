//! Scheme repository.
//!
//! Read-heavy SQLite access for welfare scheme records. Localized fields
//! are stored as JSON text columns and decoded into [`LocalizedText`]
//! tables. The only write path is [`upsert_by_name`], an idempotent
//! seeding operation keyed on the English scheme name — not a runtime
//! concern.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::language::{LanguageCode, LocalizedText};
use crate::models::{Scheme, SchemeCategory, SchemeQuery};

/// Maximum rows returned by [`search`].
pub const SEARCH_LIMIT: i64 = 10;

/// Fetch every active scheme.
pub async fn all_active(pool: &SqlitePool) -> Result<Vec<Scheme>> {
    let rows = sqlx::query("SELECT * FROM schemes WHERE is_active = 1 ORDER BY name_key")
        .fetch_all(pool)
        .await?;

    rows.iter().map(decode_row).collect()
}

/// Fetch full records for a list of scheme ids. Unknown ids are skipped,
/// not errors: the model may suggest ids that no longer exist.
pub async fn by_ids(pool: &SqlitePool, ids: &[String]) -> Result<Vec<Scheme>> {
    let mut schemes = Vec::with_capacity(ids.len());

    for id in ids {
        let row = sqlx::query("SELECT * FROM schemes WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        if let Some(row) = row {
            schemes.push(decode_row(&row)?);
        }
    }

    Ok(schemes)
}

/// Fetch a single scheme by id.
pub async fn by_id(pool: &SqlitePool, id: &str) -> Result<Option<Scheme>> {
    let row = sqlx::query("SELECT * FROM schemes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(decode_row).transpose()
}

/// Keyword/category/state search over active schemes, capped at
/// [`SEARCH_LIMIT`] rows.
///
/// The keyword matches case-insensitively against the localized name and
/// description JSON and the category. A state filter also admits rows
/// with no state, which are nationwide schemes.
pub async fn search(pool: &SqlitePool, query: &SchemeQuery) -> Result<Vec<Scheme>> {
    let keyword = query.query.as_deref().unwrap_or("").trim().to_lowercase();
    let pattern = format!("%{}%", keyword);

    let mut sql = String::from(
        "SELECT * FROM schemes WHERE is_active = 1 \
         AND (LOWER(name_json) LIKE ? OR LOWER(description_json) LIKE ? OR LOWER(category) LIKE ?)",
    );
    if query.category.is_some() {
        sql.push_str(" AND category = ?");
    }
    if query.state.is_some() {
        sql.push_str(" AND (state = ? OR state IS NULL)");
    }
    sql.push_str(" ORDER BY name_key LIMIT ?");

    let mut q = sqlx::query(&sql).bind(&pattern).bind(&pattern).bind(&pattern);
    if let Some(category) = &query.category {
        q = q.bind(category);
    }
    if let Some(state) = &query.state {
        q = q.bind(state);
    }
    q = q.bind(SEARCH_LIMIT);

    let rows = q.fetch_all(pool).await?;
    rows.iter().map(decode_row).collect()
}

/// Insert or update a scheme keyed on its English name. Idempotent: the
/// seeding path can run on every startup without duplicating rows.
pub async fn upsert_by_name(pool: &SqlitePool, scheme: &Scheme) -> Result<()> {
    let name_key = scheme.name.get(LanguageCode::En).to_string();
    let now = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO schemes (
            id, name_key, name_json, description_json, category,
            eligibility_json, documents_json, application_process,
            benefit_json, application_url, state, is_active,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(name_key) DO UPDATE SET
            name_json = excluded.name_json,
            description_json = excluded.description_json,
            category = excluded.category,
            eligibility_json = excluded.eligibility_json,
            documents_json = excluded.documents_json,
            application_process = excluded.application_process,
            benefit_json = excluded.benefit_json,
            application_url = excluded.application_url,
            state = excluded.state,
            is_active = excluded.is_active,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&scheme.id)
    .bind(&name_key)
    .bind(serde_json::to_string(&scheme.name)?)
    .bind(serde_json::to_string(&scheme.description)?)
    .bind(scheme.category.as_str())
    .bind(serde_json::to_string(&scheme.eligibility)?)
    .bind(serde_json::to_string(&scheme.documents)?)
    .bind(&scheme.application_process)
    .bind(
        scheme
            .benefit_amount
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?,
    )
    .bind(&scheme.application_url)
    .bind(&scheme.state)
    .bind(scheme.is_active as i64)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Upsert the sample scheme records. Returns the number of rows written.
pub async fn seed(pool: &SqlitePool) -> Result<usize> {
    let schemes = sample_schemes();
    for scheme in &schemes {
        upsert_by_name(pool, scheme).await?;
    }
    Ok(schemes.len())
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> Result<Scheme> {
    let name_json: String = row.get("name_json");
    let description_json: String = row.get("description_json");
    let eligibility_json: String = row.get("eligibility_json");
    let documents_json: String = row.get("documents_json");
    let benefit_json: Option<String> = row.get("benefit_json");
    let category: String = row.get("category");
    let is_active: i64 = row.get("is_active");

    Ok(Scheme {
        id: row.get("id"),
        name: serde_json::from_str(&name_json).context("bad name_json")?,
        description: serde_json::from_str(&description_json).context("bad description_json")?,
        category: SchemeCategory::from_str_loose(&category),
        eligibility: serde_json::from_str(&eligibility_json).unwrap_or(serde_json::json!({})),
        documents: serde_json::from_str(&documents_json).unwrap_or_default(),
        application_process: row.get("application_process"),
        benefit_amount: benefit_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .context("bad benefit_json")?,
        application_url: row.get("application_url"),
        state: row.get("state"),
        is_active: is_active != 0,
    })
}

/// The sample scheme records, one per category of interest.
pub fn sample_schemes() -> Vec<Scheme> {
    vec![
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english("PM-KISAN Samman Nidhi")
                .with(LanguageCode::Hi, "पीएम-किसान सम्मान निधि"),
            description: LocalizedText::english(
                "Financial assistance to small and marginal farmers",
            )
            .with(LanguageCode::Hi, "छोटे और सीमांत किसानों के लिए वित्तीय सहायता"),
            category: SchemeCategory::Agriculture,
            eligibility: serde_json::json!({
                "landHolding": "up to 2 hectares",
                "farmer": true,
                "citizenship": "Indian"
            }),
            documents: vec![
                "Aadhaar Card".to_string(),
                "Bank Account Details".to_string(),
                "Land Records".to_string(),
            ],
            application_process:
                "Apply online at pmkisan.gov.in or visit nearest Common Service Center".to_string(),
            benefit_amount: Some(
                LocalizedText::english("₹6,000 per year")
                    .with(LanguageCode::Hi, "₹6,000 प्रति वर्ष"),
            ),
            application_url: Some("https://pmkisan.gov.in".to_string()),
            state: None,
            is_active: true,
        },
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english("Pradhan Mantri Awas Yojana")
                .with(LanguageCode::Hi, "प्रधानमंत्री आवास योजना"),
            description: LocalizedText::english(
                "Housing scheme for economically weaker sections",
            )
            .with(LanguageCode::Hi, "आर्थिक रूप से कमजोर वर्गों के लिए आवास योजना"),
            category: SchemeCategory::Housing,
            eligibility: serde_json::json!({
                "income": "below 18 lakh annually",
                "firstTimeHomeBuyer": true,
                "citizenship": "Indian"
            }),
            documents: vec![
                "Aadhaar Card".to_string(),
                "Income Certificate".to_string(),
                "Bank Statements".to_string(),
            ],
            application_process: "Apply through authorized banks or online portal".to_string(),
            benefit_amount: Some(LocalizedText::english("Subsidy up to ₹2.67 lakh")),
            application_url: Some("https://pmaymis.gov.in".to_string()),
            state: None,
            is_active: true,
        },
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english("National Scholarship Portal Schemes")
                .with(LanguageCode::Hi, "राष्ट्रीय छात्रवृत्ति पोर्टल योजनाएं"),
            description: LocalizedText::english(
                "Merit and means based scholarships for students",
            ),
            category: SchemeCategory::Education,
            eligibility: serde_json::json!({
                "student": true,
                "familyIncome": "below 2.5 lakh annually"
            }),
            documents: vec![
                "Aadhaar Card".to_string(),
                "Marksheets".to_string(),
                "Income Certificate".to_string(),
            ],
            application_process: "Register and apply at scholarships.gov.in".to_string(),
            benefit_amount: Some(LocalizedText::english("Varies by scholarship")),
            application_url: Some("https://scholarships.gov.in".to_string()),
            state: None,
            is_active: true,
        },
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english("Ayushman Bharat PM-JAY")
                .with(LanguageCode::Hi, "आयुष्मान भारत पीएम-जय"),
            description: LocalizedText::english(
                "Health insurance cover for poor and vulnerable families",
            ),
            category: SchemeCategory::Health,
            eligibility: serde_json::json!({
                "seccListed": true,
                "citizenship": "Indian"
            }),
            documents: vec!["Aadhaar Card".to_string(), "Ration Card".to_string()],
            application_process: "Check eligibility and enroll at an empanelled hospital"
                .to_string(),
            benefit_amount: Some(LocalizedText::english("₹5 lakh cover per family per year")),
            application_url: Some("https://pmjay.gov.in".to_string()),
            state: None,
            is_active: true,
        },
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english("Pradhan Mantri Matru Vandana Yojana")
                .with(LanguageCode::Hi, "प्रधानमंत्री मातृ वंदना योजना"),
            description: LocalizedText::english(
                "Maternity benefit for pregnant women and lactating mothers",
            ),
            category: SchemeCategory::Women,
            eligibility: serde_json::json!({
                "pregnantOrLactating": true,
                "firstLivingChild": true
            }),
            documents: vec![
                "Aadhaar Card".to_string(),
                "MCP Card".to_string(),
                "Bank Account Details".to_string(),
            ],
            application_process: "Apply at the nearest Anganwadi centre".to_string(),
            benefit_amount: Some(LocalizedText::english("₹5,000 in three installments")),
            application_url: Some("https://pmmvy.wcd.gov.in".to_string()),
            state: None,
            is_active: true,
        },
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english("MGNREGA")
                .with(LanguageCode::Hi, "मनरेगा"),
            description: LocalizedText::english(
                "Guaranteed wage employment for rural households",
            ),
            category: SchemeCategory::Employment,
            eligibility: serde_json::json!({
                "ruralHousehold": true,
                "adultMember": true
            }),
            documents: vec!["Job Card".to_string(), "Aadhaar Card".to_string()],
            application_process: "Apply for a job card at the Gram Panchayat".to_string(),
            benefit_amount: Some(LocalizedText::english("100 days of wage employment per year")),
            application_url: Some("https://nrega.nic.in".to_string()),
            state: None,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::migrate::apply(&pool).await.unwrap();
        pool
    }

    fn scheme(name: &str, category: SchemeCategory, state: Option<&str>) -> Scheme {
        Scheme {
            id: Uuid::new_v4().to_string(),
            name: LocalizedText::english(name),
            description: LocalizedText::english(format!("{} description", name)),
            category,
            eligibility: serde_json::json!({}),
            documents: vec![],
            application_process: String::new(),
            benefit_amount: None,
            application_url: None,
            state: state.map(String::from),
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_upsert_by_name_idempotent() {
        let pool = test_pool().await;

        let first = scheme("PM-KISAN", SchemeCategory::Agriculture, None);
        upsert_by_name(&pool, &first).await.unwrap();

        // Same name, new uuid: must update in place, not duplicate.
        let mut second = scheme("PM-KISAN", SchemeCategory::Agriculture, None);
        second.description = LocalizedText::english("updated description");
        upsert_by_name(&pool, &second).await.unwrap();

        let all = all_active(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        // The original id survives the update.
        assert_eq!(all[0].id, first.id);
        assert_eq!(
            all[0].description.get(LanguageCode::En),
            "updated description"
        );
    }

    #[tokio::test]
    async fn test_seed_idempotent() {
        let pool = test_pool().await;
        let n1 = seed(&pool).await.unwrap();
        let n2 = seed(&pool).await.unwrap();
        assert_eq!(n1, n2);
        assert_eq!(all_active(&pool).await.unwrap().len(), n1);
    }

    #[tokio::test]
    async fn test_by_ids_skips_unknown() {
        let pool = test_pool().await;
        let s = scheme("Scheme A", SchemeCategory::Health, None);
        upsert_by_name(&pool, &s).await.unwrap();

        let found = by_ids(&pool, &[s.id.clone(), "no-such-id".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, s.id);
    }

    #[tokio::test]
    async fn test_search_keyword_and_cap() {
        let pool = test_pool().await;
        for i in 0..12 {
            let s = scheme(
                &format!("Farm Support {}", i),
                SchemeCategory::Agriculture,
                None,
            );
            upsert_by_name(&pool, &s).await.unwrap();
        }

        let query = SchemeQuery {
            query: Some("farm".to_string()),
            ..Default::default()
        };
        let results = search(&pool, &query).await.unwrap();
        assert_eq!(results.len(), SEARCH_LIMIT as usize);

        let query = SchemeQuery {
            query: Some("no-such-keyword".to_string()),
            ..Default::default()
        };
        assert!(search(&pool, &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_state_admits_nationwide() {
        let pool = test_pool().await;
        upsert_by_name(&pool, &scheme("State Scheme", SchemeCategory::Education, Some("Bihar")))
            .await
            .unwrap();
        upsert_by_name(&pool, &scheme("National Scheme", SchemeCategory::Education, None))
            .await
            .unwrap();
        upsert_by_name(&pool, &scheme("Other State", SchemeCategory::Education, Some("Kerala")))
            .await
            .unwrap();

        let query = SchemeQuery {
            state: Some("Bihar".to_string()),
            ..Default::default()
        };
        let results = search(&pool, &query).await.unwrap();
        let names: Vec<&str> = results
            .iter()
            .map(|s| s.name.get(LanguageCode::En))
            .collect();
        assert!(names.contains(&"State Scheme"));
        assert!(names.contains(&"National Scheme"));
        assert!(!names.contains(&"Other State"));
    }

    #[tokio::test]
    async fn test_search_category_filter() {
        let pool = test_pool().await;
        upsert_by_name(&pool, &scheme("Crop Aid", SchemeCategory::Agriculture, None))
            .await
            .unwrap();
        upsert_by_name(&pool, &scheme("School Aid", SchemeCategory::Education, None))
            .await
            .unwrap();

        let query = SchemeQuery {
            query: Some("aid".to_string()),
            category: Some("education".to_string()),
            ..Default::default()
        };
        let results = search(&pool, &query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, SchemeCategory::Education);
    }

    #[tokio::test]
    async fn test_inactive_schemes_hidden() {
        let pool = test_pool().await;
        let mut s = scheme("Retired Scheme", SchemeCategory::Other, None);
        s.is_active = false;
        upsert_by_name(&pool, &s).await.unwrap();

        assert!(all_active(&pool).await.unwrap().is_empty());
        let query = SchemeQuery {
            query: Some("retired".to_string()),
            ..Default::default()
        };
        assert!(search(&pool, &query).await.unwrap().is_empty());
        // by_id still resolves it (used after a direct link)
        assert!(by_id(&pool, &s.id).await.unwrap().is_some());
    }
}
