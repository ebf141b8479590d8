use async_trait::async_trait;
use sqlx::PgPool;

use super::CompetitionStore;
use crate::dto::competition::{CompetitionFilter, CreateCompetitionRequest};
use crate::error::{Result, StorageError};
use crate::models::Competition;

const COMPETITION_COLUMNS: &str = r#"
    competition_id, name, scheduled_at, category, is_active, is_running,
    started_at, finished_at
"#;

/// Repository for Competition database operations
pub struct CompetitionRepository {
    pool: PgPool,
}

impl CompetitionRepository {
    /// Create a new CompetitionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompetitionStore for CompetitionRepository {
    /// List competitions matching the filter, most recent first
    async fn list(&self, filter: &CompetitionFilter) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(&format!(
            r#"
            SELECT {COMPETITION_COLUMNS}
            FROM competitions
            WHERE ($1::BOOLEAN IS NULL OR is_active = $1)
              AND ($2::BOOLEAN IS NULL OR is_running = $2)
            ORDER BY scheduled_at DESC, competition_id DESC
            "#
        ))
        .bind(filter.active)
        .bind(filter.running)
        .fetch_all(&self.pool)
        .await?;

        Ok(competitions)
    }

    /// Get a competition by ID
    async fn find_by_id(&self, id: i64) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            SELECT {COMPETITION_COLUMNS}
            FROM competitions
            WHERE competition_id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    async fn find_running_except(&self, exclude_id: i64) -> Result<Option<Competition>> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            SELECT {COMPETITION_COLUMNS}
            FROM competitions
            WHERE is_running AND competition_id <> $1
            LIMIT 1
            "#
        ))
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(competition)
    }

    /// Create a new competition
    async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            r#"
            INSERT INTO competitions (name, scheduled_at, category, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(&req.name)
        .bind(req.scheduled_at)
        .bind(req.category)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(competition)
    }

    async fn save_run_state(&self, competition: &Competition) -> Result<Competition> {
        let saved = sqlx::query_as::<_, Competition>(&format!(
            r#"
            UPDATE competitions
            SET
                is_running = $2,
                started_at = $3,
                finished_at = $4
            WHERE competition_id = $1
            RETURNING {COMPETITION_COLUMNS}
            "#
        ))
        .bind(competition.competition_id)
        .bind(competition.is_running)
        .bind(competition.started_at)
        .bind(competition.finished_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            // competitions_single_running partial index
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.code().as_deref() == Some("23505") {
                    return StorageError::ConstraintViolation(
                        "Another competition is already running".to_string(),
                    );
                }
            }
            StorageError::from(e)
        })?
        .ok_or(StorageError::NotFound)?;

        Ok(saved)
    }
}
