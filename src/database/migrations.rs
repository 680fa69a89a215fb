//! Sequential schema migrations, embedded at compile time.
//!
//! Applied versions are recorded in `schema_migrations`; re-running the
//! full sequence against an already-initialized store is a no-op.

use sqlx::sqlite::SqlitePool;
use sqlx::Executor;
use tracing::info;

use crate::database::error::DbError;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: include_str!("../../migrations/001_initial_schema.sql"),
    },
    Migration {
        version: 2,
        name: "seed_content",
        sql: include_str!("../../migrations/002_seed_content.sql"),
    },
];

/// Apply all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<(), DbError> {
    create_ledger(pool).await?;

    let applied = applied_versions(pool).await?;
    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        apply(pool, migration).await?;
        info!(
            version = migration.version,
            name = migration.name,
            "migration applied"
        );
    }

    Ok(())
}

/// Versions from the embedded sequence not yet recorded in the ledger.
pub async fn pending_versions(pool: &SqlitePool) -> Result<Vec<i64>, DbError> {
    let applied = applied_versions(pool).await?;
    Ok(MIGRATIONS
        .iter()
        .map(|m| m.version)
        .filter(|v| !applied.contains(v))
        .collect())
}

async fn create_ledger(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DbError::wrap(e, "create schema_migrations table"))?;
    Ok(())
}

async fn applied_versions(pool: &SqlitePool) -> Result<Vec<i64>, DbError> {
    sqlx::query_scalar("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .map_err(|e| DbError::wrap(e, "read applied migrations"))
}

/// One migration plus its ledger entry, in one transaction.
async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), DbError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::wrap(e, "begin migration transaction"))?;

    (&mut *tx).execute(migration.sql).await.map_err(|e| {
        DbError::wrap(e, &format!("apply migration {}", migration.version))
    })?;

    sqlx::query("INSERT INTO schema_migrations (version) VALUES (?1)")
        .bind(migration.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::wrap(e, "record migration"))?;

    tx.commit()
        .await
        .map_err(|e| DbError::wrap(e, "commit migration"))?;
    Ok(())
}
