//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete
//! implementation of the `BriefingStore` port from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use briefing_core::domain::BriefingRecord;
use briefing_core::ports::{BriefingStore, PortError, PortResult};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Postgres error code for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `BriefingStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Maps database failures onto the port taxonomy, singling out the
    /// missing-table condition so the handler can surface the migration
    /// diagnostic instead of a generic 500.
    fn map_db_error(e: sqlx::Error) -> PortError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(UNDEFINED_TABLE) {
                return PortError::MissingSchema(
                    "Table 'document_briefings' is missing. Run the provided SQL migration \
                     to create it before saving history."
                        .to_string(),
                );
            }
        }
        PortError::Storage(e.to_string())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct BriefingRow {
    id: Uuid,
    user_id: Uuid,
    file_name: String,
    summary: Option<String>,
    created_at: DateTime<Utc>,
}

impl BriefingRow {
    fn into_domain(self) -> BriefingRecord {
        BriefingRecord {
            id: self.id,
            user_id: self.user_id,
            file_name: self.file_name,
            summary: self.summary,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `BriefingStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl BriefingStore for DbAdapter {
    async fn save_briefing(
        &self,
        user_id: Uuid,
        file_name: &str,
        summary: Option<&str>,
    ) -> PortResult<BriefingRecord> {
        let row = sqlx::query_as::<_, BriefingRow>(
            "INSERT INTO document_briefings (id, user_id, file_name, summary) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, file_name, summary, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(file_name)
        .bind(summary)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_db_error)?;

        Ok(row.into_domain())
    }

    async fn list_briefings(&self, user_id: Uuid) -> PortResult<Vec<BriefingRecord>> {
        let rows = sqlx::query_as::<_, BriefingRow>(
            "SELECT id, user_id, file_name, summary, created_at \
             FROM document_briefings WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 20",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Self::map_db_error)?;

        Ok(rows.into_iter().map(BriefingRow::into_domain).collect())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_db_error)?;

        user_id.ok_or(PortError::Unauthorized)
    }
}
