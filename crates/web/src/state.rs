use std::sync::Arc;

use storage::repository::Repositories;
use storage::services::competition_lifecycle::CompetitionLifecycle;
use storage::services::time_registration::TimeRegistrationService;

use crate::auth::TokenVerifier;
use crate::middleware::auth::ApiKeys;
use crate::realtime::{BroadcastDispatcher, SessionManager};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub lifecycle: Arc<CompetitionLifecycle>,
    pub registration: TimeRegistrationService,
    pub verifier: Arc<dyn TokenVerifier>,
    pub dispatcher: Arc<BroadcastDispatcher>,
    pub sessions: Arc<SessionManager>,
    pub api_keys: ApiKeys,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        verifier: Arc<dyn TokenVerifier>,
        api_keys: ApiKeys,
        channel_capacity: usize,
    ) -> Self {
        let lifecycle = Arc::new(CompetitionLifecycle::new(repos.competitions.clone()));
        let registration =
            TimeRegistrationService::new(repos.teams.clone(), repos.time_records.clone());
        let dispatcher = Arc::new(BroadcastDispatcher::new(channel_capacity));
        let sessions = Arc::new(SessionManager::new(
            verifier.clone(),
            repos.judges.clone(),
            registration.clone(),
            dispatcher.clone(),
        ));

        Self {
            repos,
            lifecycle,
            registration,
            verifier,
            dispatcher,
            sessions,
            api_keys,
        }
    }
}
