use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::dto::time_record::{RegisterTimeRequest, TimeRecordResponse, TimedEntry};
use crate::error::StorageError;
use crate::models::{NewTimeRecord, Team};
use crate::repository::{TeamStore, TimeRecordStore};

/// Entries accepted per batch call. Extra entries are dropped, not rejected.
pub const MAX_BATCH_ENTRIES: usize = 15;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Faltan datos requeridos: equipo_id y tiempo son obligatorios")]
    MissingFields,

    #[error("El equipo con ID {0} no existe")]
    TeamNotFound(i64),

    #[error("El equipo con ID {0} no pertenece a tu lista de equipos asignados")]
    NotAuthorized(i64),

    #[error("Error al registrar tiempo")]
    Storage(#[from] StorageError),
}

/// Validates and persists arrival times submitted by judges.
///
/// A judge may only register times for teams assigned to them. The same
/// checks apply to single submissions and to batches.
#[derive(Clone)]
pub struct TimeRegistrationService {
    teams: Arc<dyn TeamStore>,
    time_records: Arc<dyn TimeRecordStore>,
}

impl TimeRegistrationService {
    pub fn new(teams: Arc<dyn TeamStore>, time_records: Arc<dyn TimeRecordStore>) -> Self {
        Self {
            teams,
            time_records,
        }
    }

    async fn owned_team(&self, judge_id: i64, team_id: i64) -> Result<Team, RegistrationError> {
        let team = match self.teams.find_by_id(team_id).await {
            Ok(team) => team,
            Err(StorageError::NotFound) => return Err(RegistrationError::TeamNotFound(team_id)),
            Err(e) => return Err(e.into()),
        };

        if !team.is_owned_by(judge_id) {
            tracing::warn!(judge_id, team_id, "Judge attempted to register a foreign team");
            return Err(RegistrationError::NotAuthorized(team_id));
        }

        Ok(team)
    }

    /// Register one arrival time for `judge_id`
    pub async fn register(
        &self,
        judge_id: i64,
        req: RegisterTimeRequest,
    ) -> Result<TimeRecordResponse, RegistrationError> {
        let (Some(team_id), Some(elapsed_ms)) = (req.team_id, req.elapsed_ms) else {
            return Err(RegistrationError::MissingFields);
        };

        let team = self.owned_team(judge_id, team_id).await?;

        let record = self
            .time_records
            .create(NewTimeRecord {
                team_id,
                elapsed_ms,
                hours: req.hours.unwrap_or(0),
                minutes: req.minutes.unwrap_or(0),
                seconds: req.seconds.unwrap_or(0),
                milliseconds: req.milliseconds.unwrap_or(0),
                created_at: None,
            })
            .await?;

        tracing::debug!(judge_id, team_id, record_id = %record.record_id, "Time registered");

        Ok(TimeRecordResponse::new(record, &team))
    }

    /// Register several arrival times for one team in a single call.
    ///
    /// Only the first [`MAX_BATCH_ENTRIES`] entries are kept. Ownership is
    /// checked before anything is written and the records are stored all
    /// together or not at all. Returns the new identities in input order.
    pub async fn register_batch(
        &self,
        judge_id: i64,
        team_id: i64,
        mut entries: Vec<TimedEntry>,
    ) -> Result<Vec<Uuid>, RegistrationError> {
        if entries.len() > MAX_BATCH_ENTRIES {
            tracing::debug!(
                judge_id,
                team_id,
                submitted = entries.len(),
                "Truncating batch to {} entries",
                MAX_BATCH_ENTRIES
            );
            entries.truncate(MAX_BATCH_ENTRIES);
        }

        self.owned_team(judge_id, team_id).await?;

        let records = entries
            .into_iter()
            .map(|entry| NewTimeRecord {
                team_id,
                elapsed_ms: entry.elapsed_ms,
                created_at: Some(entry.timestamp),
                ..Default::default()
            })
            .collect();

        let created = self.time_records.create_batch(records).await?;

        Ok(created.into_iter().map(|r| r.record_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::judge::CreateJudgeRequest;
    use crate::dto::team::CreateTeamRequest;
    use crate::repository::{InMemoryStore, JudgeStore};
    use chrono::{Duration, TimeZone, Utc};

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: TimeRegistrationService,
        owner_id: i64,
        other_judge_id: i64,
        team_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let mut judge_ids = Vec::new();
        for username in ["juez1", "juez2"] {
            let judge = JudgeStore::create(
                store.as_ref(),
                &CreateJudgeRequest {
                    username: username.to_string(),
                    first_name: String::new(),
                    last_name: String::new(),
                    email: format!("{username}@example.com"),
                    phone: None,
                    competition_id: None,
                },
            )
            .await
            .unwrap();
            judge_ids.push(judge.judge_id);
        }
        let team = TeamStore::create(
            store.as_ref(),
            &CreateTeamRequest {
                name: "Equipo Azul".to_string(),
                bib_number: 7,
                judge_id: judge_ids[0],
            },
        )
        .await
        .unwrap();

        let service = TimeRegistrationService::new(store.clone(), store.clone());
        Fixture {
            store,
            service,
            owner_id: judge_ids[0],
            other_judge_id: judge_ids[1],
            team_id: team.team_id,
        }
    }

    fn entries(count: usize) -> Vec<TimedEntry> {
        let base = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
        (0..count)
            .map(|i| TimedEntry {
                timestamp: base + Duration::seconds(i as i64),
                elapsed_ms: 1_000 * (i as i64 + 1),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_register_returns_team_display_fields() {
        let fx = fixture().await;

        let registered = fx
            .service
            .register(
                fx.owner_id,
                RegisterTimeRequest {
                    team_id: Some(fx.team_id),
                    elapsed_ms: Some(1_234_567),
                    minutes: Some(20),
                    seconds: Some(34),
                    milliseconds: Some(567),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(registered.team_bib, 7);
        assert_eq!(registered.team_name, "Equipo Azul");
        assert_eq!(registered.elapsed_ms, 1_234_567);
        assert_eq!(registered.hours, 0);
        assert_eq!(registered.minutes, 20);
        assert_eq!(registered.seconds, 34);
        assert_eq!(registered.milliseconds, 567);
        assert_eq!(fx.store.time_record_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_creates_nothing() {
        let fx = fixture().await;

        let err = fx
            .service
            .register(
                fx.owner_id,
                RegisterTimeRequest {
                    team_id: Some(fx.team_id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingFields));

        let err = fx
            .service
            .register(
                fx.owner_id,
                RegisterTimeRequest {
                    elapsed_ms: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingFields));
        assert_eq!(fx.store.time_record_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_judge_is_not_authorized() {
        let fx = fixture().await;

        let err = fx
            .service
            .register(
                fx.other_judge_id,
                RegisterTimeRequest {
                    team_id: Some(fx.team_id),
                    elapsed_ms: Some(5_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::NotAuthorized(id) if id == fx.team_id));
        assert_eq!(fx.store.time_record_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_team() {
        let fx = fixture().await;

        let err = fx
            .service
            .register(
                fx.owner_id,
                RegisterTimeRequest {
                    team_id: Some(9_999),
                    elapsed_ms: Some(5_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::TeamNotFound(9_999)));
        assert_eq!(err.to_string(), "El equipo con ID 9999 no existe");
    }

    #[tokio::test]
    async fn test_batch_keeps_first_fifteen_in_order() {
        let fx = fixture().await;
        let submitted = entries(20);

        let ids = fx
            .service
            .register_batch(fx.owner_id, fx.team_id, submitted.clone())
            .await
            .unwrap();

        assert_eq!(ids.len(), MAX_BATCH_ENTRIES);
        let stored = TimeRecordStore::list_by_team(fx.store.as_ref(), fx.team_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), MAX_BATCH_ENTRIES);
        for ((id, record), entry) in ids.iter().zip(&stored).zip(&submitted) {
            assert_eq!(*id, record.record_id);
            assert_eq!(record.elapsed_ms, entry.elapsed_ms);
            assert_eq!(record.created_at, entry.timestamp);
        }
    }

    #[tokio::test]
    async fn test_batch_for_foreign_team_creates_nothing() {
        let fx = fixture().await;

        let err = fx
            .service
            .register_batch(fx.other_judge_id, fx.team_id, entries(3))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistrationError::NotAuthorized(_)));
        assert_eq!(fx.store.time_record_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_batch_is_accepted() {
        let fx = fixture().await;

        let ids = fx
            .service
            .register_batch(fx.owner_id, fx.team_id, Vec::new())
            .await
            .unwrap();

        assert!(ids.is_empty());
    }
}
