use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Team;

/// Query filters for listing teams
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TeamFilter {
    /// Only teams owned by this judge
    pub judge_id: Option<i64>,
}

impl TeamFilter {
    pub fn for_judge(judge_id: i64) -> Self {
        Self {
            judge_id: Some(judge_id),
        }
    }

    pub fn matches(&self, team: &Team) -> bool {
        self.judge_id.is_none_or(|id| team.judge_id == id)
    }
}

/// Request payload for creating a team
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTeamRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Name must be between 1 and 200 characters"
    ))]
    pub name: String,

    #[validate(range(min = 0, message = "Bib number must not be negative"))]
    pub bib_number: i32,

    pub judge_id: i64,
}
