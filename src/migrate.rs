use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(&config.db).await?;
    apply(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Apply the schema to an open pool. Idempotent.
pub async fn apply(pool: &SqlitePool) -> Result<()> {
    // Localized fields (name, description, benefit) are JSON objects keyed
    // by language code; eligibility and documents are JSON as well.
    // name_key is the English name, the natural key for upsert-by-name
    // seeding.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schemes (
            id TEXT PRIMARY KEY,
            name_key TEXT NOT NULL UNIQUE,
            name_json TEXT NOT NULL,
            description_json TEXT NOT NULL,
            category TEXT NOT NULL,
            eligibility_json TEXT NOT NULL DEFAULT '{}',
            documents_json TEXT NOT NULL DEFAULT '[]',
            application_process TEXT NOT NULL DEFAULT '',
            benefit_json TEXT,
            application_url TEXT,
            state TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_schemes_category ON schemes(category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_schemes_state ON schemes(state)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_schemes_is_active ON schemes(is_active)")
        .execute(pool)
        .await?;

    Ok(())
}
