//! Process-local store implementing every repository trait.
//!
//! Used by the test suites and for running the service without PostgreSQL.
//! One mutex guards all tables, so every operation is atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::{CompetitionStore, JudgeStore, TeamStore, TimeRecordStore};
use crate::dto::competition::{CompetitionFilter, CreateCompetitionRequest};
use crate::dto::judge::CreateJudgeRequest;
use crate::dto::team::{CreateTeamRequest, TeamFilter};
use crate::error::{Result, StorageError};
use crate::models::{Competition, Judge, NewTimeRecord, Team, TimeRecord};

#[derive(Default)]
struct Tables {
    competitions: BTreeMap<i64, Competition>,
    judges: BTreeMap<i64, Judge>,
    teams: BTreeMap<i64, Team>,
    time_records: Vec<TimeRecord>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a judge active or inactive
    pub fn set_judge_active(&self, judge_id: i64, active: bool) -> Result<()> {
        let mut tables = self.tables.lock();
        let judge = tables
            .judges
            .get_mut(&judge_id)
            .ok_or(StorageError::NotFound)?;
        judge.is_active = active;
        Ok(())
    }

    pub fn time_record_count(&self) -> usize {
        self.tables.lock().time_records.len()
    }
}

#[async_trait]
impl CompetitionStore for InMemoryStore {
    async fn list(&self, filter: &CompetitionFilter) -> Result<Vec<Competition>> {
        let tables = self.tables.lock();
        let mut competitions: Vec<Competition> = tables
            .competitions
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        competitions.sort_by(|a, b| {
            b.scheduled_at
                .cmp(&a.scheduled_at)
                .then(b.competition_id.cmp(&a.competition_id))
        });
        Ok(competitions)
    }

    async fn find_by_id(&self, id: i64) -> Result<Competition> {
        self.tables
            .lock()
            .competitions
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn find_running_except(&self, exclude_id: i64) -> Result<Option<Competition>> {
        Ok(self
            .tables
            .lock()
            .competitions
            .values()
            .find(|c| c.is_running && c.competition_id != exclude_id)
            .cloned())
    }

    async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let mut tables = self.tables.lock();
        let competition = Competition {
            competition_id: tables.next_id(),
            name: req.name.clone(),
            scheduled_at: req.scheduled_at,
            category: req.category,
            is_active: req.is_active,
            is_running: false,
            started_at: None,
            finished_at: None,
        };
        tables
            .competitions
            .insert(competition.competition_id, competition.clone());
        Ok(competition)
    }

    async fn save_run_state(&self, competition: &Competition) -> Result<Competition> {
        let mut tables = self.tables.lock();
        if competition.is_running
            && tables
                .competitions
                .values()
                .any(|c| c.is_running && c.competition_id != competition.competition_id)
        {
            return Err(StorageError::ConstraintViolation(
                "Another competition is already running".to_string(),
            ));
        }

        let stored = tables
            .competitions
            .get_mut(&competition.competition_id)
            .ok_or(StorageError::NotFound)?;
        stored.is_running = competition.is_running;
        stored.started_at = competition.started_at;
        stored.finished_at = competition.finished_at;
        Ok(stored.clone())
    }
}

#[async_trait]
impl JudgeStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Judge> {
        self.tables
            .lock()
            .judges
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_by_competition(&self, competition_id: i64) -> Result<Vec<Judge>> {
        Ok(self
            .tables
            .lock()
            .judges
            .values()
            .filter(|j| j.competition_id == Some(competition_id))
            .cloned()
            .collect())
    }

    async fn create(&self, req: &CreateJudgeRequest) -> Result<Judge> {
        let mut tables = self.tables.lock();
        if tables.judges.values().any(|j| j.username == req.username) {
            return Err(StorageError::ConstraintViolation(
                "Username already exists".to_string(),
            ));
        }
        let judge = Judge {
            judge_id: tables.next_id(),
            username: req.username.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
            is_active: true,
            competition_id: req.competition_id,
            last_login: None,
        };
        tables.judges.insert(judge.judge_id, judge.clone());
        Ok(judge)
    }

    async fn record_login(&self, judge_id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.tables.lock();
        let judge = tables
            .judges
            .get_mut(&judge_id)
            .ok_or(StorageError::NotFound)?;
        judge.last_login = Some(at);
        Ok(())
    }
}

#[async_trait]
impl TeamStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Team> {
        self.tables
            .lock()
            .teams
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list(&self, filter: &TeamFilter) -> Result<Vec<Team>> {
        let tables = self.tables.lock();
        let mut teams: Vec<Team> = tables
            .teams
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        teams.sort_by_key(|t| (t.bib_number, t.team_id));
        Ok(teams)
    }

    async fn create(&self, req: &CreateTeamRequest) -> Result<Team> {
        let mut tables = self.tables.lock();
        if !tables.judges.contains_key(&req.judge_id) {
            return Err(StorageError::ConstraintViolation(
                "Judge does not exist".to_string(),
            ));
        }
        let team = Team {
            team_id: tables.next_id(),
            name: req.name.clone(),
            bib_number: req.bib_number,
            judge_id: req.judge_id,
        };
        tables.teams.insert(team.team_id, team.clone());
        Ok(team)
    }
}

#[async_trait]
impl TimeRecordStore for InMemoryStore {
    async fn create(&self, record: NewTimeRecord) -> Result<TimeRecord> {
        self.create_batch(vec![record])
            .await?
            .pop()
            .ok_or(StorageError::NotFound)
    }

    async fn create_batch(&self, records: Vec<NewTimeRecord>) -> Result<Vec<TimeRecord>> {
        let now = Utc::now();
        let mut tables = self.tables.lock();
        if let Some(missing) = records
            .iter()
            .find(|r| !tables.teams.contains_key(&r.team_id))
        {
            return Err(StorageError::ConstraintViolation(format!(
                "Team {} does not exist",
                missing.team_id
            )));
        }

        let created: Vec<TimeRecord> = records.into_iter().map(|r| r.into_record(now)).collect();
        tables.time_records.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_by_team(&self, team_id: i64) -> Result<Vec<TimeRecord>> {
        Ok(self
            .tables
            .lock()
            .time_records
            .iter()
            .filter(|r| r.team_id == team_id)
            .cloned()
            .collect())
    }
}
