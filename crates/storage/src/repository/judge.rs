use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::JudgeStore;
use crate::dto::judge::CreateJudgeRequest;
use crate::error::{Result, StorageError};
use crate::models::Judge;

const JUDGE_COLUMNS: &str = r#"
    judge_id, username, first_name, last_name, email, phone, is_active,
    competition_id, last_login
"#;

/// Repository for Judge database operations
pub struct JudgeRepository {
    pool: PgPool,
}

impl JudgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JudgeStore for JudgeRepository {
    async fn find_by_id(&self, id: i64) -> Result<Judge> {
        sqlx::query_as::<_, Judge>(&format!(
            "SELECT {JUDGE_COLUMNS} FROM judges WHERE judge_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    async fn list_by_competition(&self, competition_id: i64) -> Result<Vec<Judge>> {
        let judges = sqlx::query_as::<_, Judge>(&format!(
            r#"
            SELECT {JUDGE_COLUMNS}
            FROM judges
            WHERE competition_id = $1
            ORDER BY judge_id
            "#
        ))
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(judges)
    }

    async fn create(&self, req: &CreateJudgeRequest) -> Result<Judge> {
        sqlx::query_as::<_, Judge>(&format!(
            r#"
            INSERT INTO judges (username, first_name, last_name, email, phone, competition_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {JUDGE_COLUMNS}
            "#
        ))
        .bind(&req.username)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.email)
        .bind(&req.phone)
        .bind(req.competition_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation("Username already exists".to_string())
            } else {
                err
            }
        })
    }

    async fn record_login(&self, judge_id: i64, at: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query("UPDATE judges SET last_login = $2 WHERE judge_id = $1")
            .bind(judge_id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
