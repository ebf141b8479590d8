use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::models::Competition;
use crate::repository::CompetitionStore;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Competition is already running")]
    AlreadyRunning,

    #[error("Competition '{name}' ({id}) is already running")]
    AnotherCompetitionRunning { id: i64, name: String },

    #[error("Competition is not running")]
    NotRunning,

    #[error("Competition not found")]
    NotFound,

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for LifecycleError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl LifecycleError {
    /// Short machine-readable reason
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "already_running",
            Self::AnotherCompetitionRunning { .. } => "another_running",
            Self::NotRunning => "not_running",
            Self::NotFound => "not_found",
            Self::Storage(_) => "storage_error",
        }
    }
}

/// Start/stop transitions for competitions.
///
/// At most one competition may be running system-wide. Transitions are
/// serialized through `transition_lock`, so the check for another running
/// competition and the write that follows cannot interleave with a
/// concurrent transition in this process. Across processes the
/// `competitions_single_running` index rejects the second writer.
pub struct CompetitionLifecycle {
    competitions: Arc<dyn CompetitionStore>,
    transition_lock: Mutex<()>,
}

impl CompetitionLifecycle {
    pub fn new(competitions: Arc<dyn CompetitionStore>) -> Self {
        Self {
            competitions,
            transition_lock: Mutex::new(()),
        }
    }

    pub async fn start(&self, competition_id: i64) -> Result<Competition, LifecycleError> {
        self.start_with(competition_id, |_| async {}).await
    }

    /// Start a competition and run `after` on the saved row before the
    /// transition lock is released, so observers see transitions in the
    /// order they were committed.
    pub async fn start_with<F, Fut>(
        &self,
        competition_id: i64,
        after: F,
    ) -> Result<Competition, LifecycleError>
    where
        F: FnOnce(Competition) -> Fut,
        Fut: Future<Output = ()>,
    {
        let _guard = self.transition_lock.lock().await;

        let mut competition = self.competitions.find_by_id(competition_id).await?;
        if competition.is_running {
            return Err(LifecycleError::AlreadyRunning);
        }

        if let Some(other) = self
            .competitions
            .find_running_except(competition_id)
            .await?
        {
            return Err(LifecycleError::AnotherCompetitionRunning {
                id: other.competition_id,
                name: other.name,
            });
        }

        competition.is_running = true;
        competition.started_at = Some(Utc::now());
        competition.finished_at = None;

        match self.competitions.save_run_state(&competition).await {
            Ok(saved) => {
                tracing::info!(competition_id, name = %saved.name, "Competition started");
                after(saved.clone()).await;
                Ok(saved)
            }
            Err(StorageError::ConstraintViolation(msg)) => {
                tracing::warn!(competition_id, "Concurrent start rejected: {}", msg);
                match self
                    .competitions
                    .find_running_except(competition_id)
                    .await?
                {
                    Some(other) => Err(LifecycleError::AnotherCompetitionRunning {
                        id: other.competition_id,
                        name: other.name,
                    }),
                    None => Err(LifecycleError::Storage(StorageError::ConstraintViolation(
                        msg,
                    ))),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn stop(&self, competition_id: i64) -> Result<Competition, LifecycleError> {
        self.stop_with(competition_id, |_| async {}).await
    }

    /// Stop a competition; `after` runs under the transition lock like
    /// in [`Self::start_with`]
    pub async fn stop_with<F, Fut>(
        &self,
        competition_id: i64,
        after: F,
    ) -> Result<Competition, LifecycleError>
    where
        F: FnOnce(Competition) -> Fut,
        Fut: Future<Output = ()>,
    {
        let _guard = self.transition_lock.lock().await;

        let mut competition = self.competitions.find_by_id(competition_id).await?;
        if !competition.is_running {
            return Err(LifecycleError::NotRunning);
        }

        competition.is_running = false;
        competition.finished_at = Some(Utc::now());

        let saved = self.competitions.save_run_state(&competition).await?;
        tracing::info!(competition_id, name = %saved.name, "Competition stopped");
        after(saved.clone()).await;

        Ok(saved)
    }
}
