use async_trait::async_trait;
use sqlx::PgPool;

use super::TeamStore;
use crate::dto::team::{CreateTeamRequest, TeamFilter};
use crate::error::{Result, StorageError};
use crate::models::Team;

/// Repository for Team database operations
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for TeamRepository {
    async fn find_by_id(&self, id: i64) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, name, bib_number, judge_id
            FROM teams
            WHERE team_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn list(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT team_id, name, bib_number, judge_id
            FROM teams
            WHERE ($1::BIGINT IS NULL OR judge_id = $1)
            ORDER BY bib_number, team_id
            "#,
        )
        .bind(filter.judge_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    async fn create(&self, req: &CreateTeamRequest) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, bib_number, judge_id)
            VALUES ($1, $2, $3)
            RETURNING team_id, name, bib_number, judge_id
            "#,
        )
        .bind(&req.name)
        .bind(req.bib_number)
        .bind(req.judge_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_foreign_key_violation() {
                StorageError::ConstraintViolation("Judge does not exist".to_string())
            } else {
                err
            }
        })
    }
}
