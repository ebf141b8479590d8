use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Team, TimeRecord};

/// Single arrival-time submission. `team_id` and `elapsed_ms` are required;
/// absent decomposed fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTimeRequest {
    #[serde(rename = "equipo_id")]
    pub team_id: Option<i64>,
    #[serde(rename = "tiempo")]
    pub elapsed_ms: Option<i64>,
    #[serde(rename = "horas")]
    pub hours: Option<i32>,
    #[serde(rename = "minutos")]
    pub minutes: Option<i32>,
    #[serde(rename = "segundos")]
    pub seconds: Option<i32>,
    #[serde(rename = "milisegundos")]
    pub milliseconds: Option<i32>,
}

/// A created record with the team's display data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeRecordResponse {
    #[serde(rename = "id_registro")]
    pub record_id: Uuid,
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    #[serde(rename = "equipo_nombre")]
    pub team_name: String,
    #[serde(rename = "equipo_dorsal")]
    pub team_bib: i32,
    #[serde(rename = "tiempo")]
    pub elapsed_ms: i64,
    #[serde(rename = "horas")]
    pub hours: i32,
    #[serde(rename = "minutos")]
    pub minutes: i32,
    #[serde(rename = "segundos")]
    pub seconds: i32,
    #[serde(rename = "milisegundos")]
    pub milliseconds: i32,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TimeRecordResponse {
    pub fn new(record: TimeRecord, team: &Team) -> Self {
        Self {
            record_id: record.record_id,
            team_id: record.team_id,
            team_name: team.name.clone(),
            team_bib: team.bib_number,
            elapsed_ms: record.elapsed_ms,
            hours: record.hours,
            minutes: record.minutes,
            seconds: record.seconds,
            milliseconds: record.milliseconds,
            created_at: record.created_at,
        }
    }
}

/// One entry of a batch submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimedEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "tiempo")]
    pub elapsed_ms: i64,
}

/// Batch submission for one team
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitTimesRequest {
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    #[serde(rename = "registros")]
    pub entries: Vec<TimedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitTimesResponse {
    pub created: Vec<Uuid>,
}
