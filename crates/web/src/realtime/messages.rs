use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::dto::time_record::{RegisterTimeRequest, TimeRecordResponse};
use storage::models::Competition;

/// Inbound envelope, discriminated by `tipo`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "tipo")]
pub enum ClientMessage {
    #[serde(rename = "registrar_tiempo")]
    RegisterTime(RegisterTimeRequest),

    #[serde(other)]
    Unrecognized,
}

/// Reply sent on the connection that issued the request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "tipo")]
pub enum ServerMessage {
    #[serde(rename = "tiempo_registrado")]
    TimeRegistered {
        #[serde(rename = "registro")]
        record: TimeRecordResponse,
    },

    #[serde(rename = "error")]
    Error {
        #[serde(rename = "mensaje")]
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Competition state change pushed to every session of a judge group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum CompetitionEvent {
    #[serde(rename = "carrera.iniciada")]
    RaceStarted(RaceSnapshot),

    #[serde(rename = "carrera.finalizada")]
    RaceFinished(RaceSnapshot),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaceSnapshot {
    pub competition_id: i64,
    pub name: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<&Competition> for RaceSnapshot {
    fn from(competition: &Competition) -> Self {
        Self {
            competition_id: competition.competition_id,
            name: competition.name.clone(),
            status: competition.status().code().to_string(),
            started_at: competition.started_at,
            finished_at: competition.finished_at,
        }
    }
}
