use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A race team. Exactly one judge records its arrival times.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub team_id: i64,
    pub name: String,
    pub bib_number: i32,
    pub judge_id: i64,
}

impl Team {
    pub fn is_owned_by(&self, judge_id: i64) -> bool {
        self.judge_id == judge_id
    }
}
