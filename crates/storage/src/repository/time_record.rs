use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};

use super::TimeRecordStore;
use crate::error::{Result, StorageError};
use crate::models::{NewTimeRecord, TimeRecord};

/// Repository for TimeRecord database operations
pub struct TimeRecordRepository {
    pool: PgPool,
}

impl TimeRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(tx: &mut Transaction<'_, Postgres>, record: TimeRecord) -> Result<TimeRecord> {
        let saved = sqlx::query_as::<_, TimeRecord>(
            r#"
            INSERT INTO time_records (
                record_id, team_id, elapsed_ms, hours, minutes, seconds,
                milliseconds, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING record_id, team_id, elapsed_ms, hours, minutes, seconds,
                      milliseconds, created_at
            "#,
        )
        .bind(record.record_id)
        .bind(record.team_id)
        .bind(record.elapsed_ms)
        .bind(record.hours)
        .bind(record.minutes)
        .bind(record.seconds)
        .bind(record.milliseconds)
        .bind(record.created_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(saved)
    }
}

#[async_trait]
impl TimeRecordStore for TimeRecordRepository {
    async fn create(&self, record: NewTimeRecord) -> Result<TimeRecord> {
        self.create_batch(vec![record])
            .await?
            .pop()
            .ok_or(StorageError::NotFound)
    }

    async fn create_batch(&self, records: Vec<NewTimeRecord>) -> Result<Vec<TimeRecord>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());

        for record in records {
            created.push(Self::insert(&mut tx, record.into_record(now)).await?);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn list_by_team(&self, team_id: i64) -> Result<Vec<TimeRecord>> {
        let records = sqlx::query_as::<_, TimeRecord>(
            r#"
            SELECT record_id, team_id, elapsed_ms, hours, minutes, seconds,
                   milliseconds, created_at
            FROM time_records
            WHERE team_id = $1
            ORDER BY created_at, record_id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
