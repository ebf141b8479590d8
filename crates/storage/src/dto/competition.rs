use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Competition, CompetitionCategory};

/// Query filters for listing competitions
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CompetitionFilter {
    /// Only competitions with this `is_active` value
    pub active: Option<bool>,
    /// Only competitions with this `is_running` value
    pub running: Option<bool>,
}

impl CompetitionFilter {
    pub fn matches(&self, competition: &Competition) -> bool {
        self.active.is_none_or(|a| competition.is_active == a)
            && self.running.is_none_or(|r| competition.is_running == r)
    }
}

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: String,

    pub scheduled_at: DateTime<Utc>,

    pub category: CompetitionCategory,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Response containing competition details and derived status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: i64,
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub category: CompetitionCategory,
    pub category_label: String,
    pub is_active: bool,
    pub is_running: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: String,
    pub status_label: String,
}

impl From<Competition> for CompetitionResponse {
    fn from(comp: Competition) -> Self {
        let status = comp.status();
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            scheduled_at: comp.scheduled_at,
            category: comp.category,
            category_label: comp.category.label().to_string(),
            is_active: comp.is_active,
            is_running: comp.is_running,
            started_at: comp.started_at,
            finished_at: comp.finished_at,
            status: status.code().to_string(),
            status_label: status.label().to_string(),
        }
    }
}
