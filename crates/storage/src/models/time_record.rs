use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Immutable arrival time of one team.
///
/// The decomposed `hours`/`minutes`/`seconds`/`milliseconds` fields are
/// informational and are not checked against `elapsed_ms`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeRecord {
    pub record_id: Uuid,
    pub team_id: i64,
    pub elapsed_ms: i64,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub milliseconds: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a time record; the identity is assigned on creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTimeRecord {
    pub team_id: i64,
    pub elapsed_ms: i64,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub milliseconds: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTimeRecord {
    pub fn into_record(self, now: DateTime<Utc>) -> TimeRecord {
        TimeRecord {
            record_id: Uuid::new_v4(),
            team_id: self.team_id,
            elapsed_ms: self.elapsed_ms,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            milliseconds: self.milliseconds,
            created_at: self.created_at.unwrap_or(now),
        }
    }
}
