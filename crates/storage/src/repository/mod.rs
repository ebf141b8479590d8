//! Repository traits and their PostgreSQL and in-memory implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Database;
use crate::dto::competition::{CompetitionFilter, CreateCompetitionRequest};
use crate::dto::judge::CreateJudgeRequest;
use crate::dto::team::{CreateTeamRequest, TeamFilter};
use crate::error::Result;
use crate::models::{Competition, Judge, NewTimeRecord, Team, TimeRecord};

pub mod competition;
pub mod judge;
pub mod memory;
pub mod team;
pub mod time_record;

pub use competition::CompetitionRepository;
pub use judge::JudgeRepository;
pub use memory::InMemoryStore;
pub use team::TeamRepository;
pub use time_record::TimeRecordRepository;

#[async_trait]
pub trait CompetitionStore: Send + Sync {
    async fn list(&self, filter: &CompetitionFilter) -> Result<Vec<Competition>>;

    async fn find_by_id(&self, id: i64) -> Result<Competition>;

    /// First running competition whose id differs from `exclude_id`
    async fn find_running_except(&self, exclude_id: i64) -> Result<Option<Competition>>;

    async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition>;

    /// Persist the running flag and the start/finish timestamps.
    ///
    /// Fails with `ConstraintViolation` if this would leave two competitions
    /// running.
    async fn save_run_state(&self, competition: &Competition) -> Result<Competition>;
}

#[async_trait]
pub trait JudgeStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Judge>;

    async fn list_by_competition(&self, competition_id: i64) -> Result<Vec<Judge>>;

    async fn create(&self, req: &CreateJudgeRequest) -> Result<Judge>;

    async fn record_login(&self, judge_id: i64, at: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Team>;

    async fn list(&self, filter: &TeamFilter) -> Result<Vec<Team>>;

    async fn create(&self, req: &CreateTeamRequest) -> Result<Team>;
}

#[async_trait]
pub trait TimeRecordStore: Send + Sync {
    async fn create(&self, record: NewTimeRecord) -> Result<TimeRecord>;

    /// Insert every record or none of them
    async fn create_batch(&self, records: Vec<NewTimeRecord>) -> Result<Vec<TimeRecord>>;

    async fn list_by_team(&self, team_id: i64) -> Result<Vec<TimeRecord>>;
}

/// Handles to every repository, shareable across tasks
#[derive(Clone)]
pub struct Repositories {
    pub competitions: Arc<dyn CompetitionStore>,
    pub judges: Arc<dyn JudgeStore>,
    pub teams: Arc<dyn TeamStore>,
    pub time_records: Arc<dyn TimeRecordStore>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        let pool = db.pool().clone();
        Self {
            competitions: Arc::new(CompetitionRepository::new(pool.clone())),
            judges: Arc::new(JudgeRepository::new(pool.clone())),
            teams: Arc::new(TeamRepository::new(pool.clone())),
            time_records: Arc::new(TimeRecordRepository::new(pool)),
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            competitions: store.clone(),
            judges: store.clone(),
            teams: store.clone(),
            time_records: store,
        }
    }
}
