use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for creating a judge account
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateJudgeRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub first_name: String,

    #[validate(length(max = 150))]
    #[serde(default)]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    pub competition_id: Option<i64>,
}
