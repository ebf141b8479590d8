use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "competition_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CompetitionCategory {
    Estudiantes,
    Interfacultades,
}

impl CompetitionCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Estudiantes => "Estudiantes por Equipos",
            Self::Interfacultades => "Interfacultades por Equipos",
        }
    }
}

/// Lifecycle status, derived from the running flag and the finish timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Scheduled,
    Running,
    Finished,
}

impl CompetitionStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Scheduled => "Programada",
            Self::Running => "En Curso",
            Self::Finished => "Finalizada",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: i64,
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub category: CompetitionCategory,
    pub is_active: bool,
    pub is_running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Competition {
    pub fn status(&self) -> CompetitionStatus {
        if self.is_running {
            CompetitionStatus::Running
        } else if self.finished_at.is_some() {
            CompetitionStatus::Finished
        } else {
            CompetitionStatus::Scheduled
        }
    }
}
