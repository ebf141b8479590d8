use storage::{
    dto::competition::CompetitionFilter,
    error::Result,
    models::Competition,
    repository::{CompetitionStore, JudgeStore},
    services::competition_lifecycle::{CompetitionLifecycle, LifecycleError},
};

use crate::realtime::{BroadcastDispatcher, CompetitionEvent, group_name};
use crate::realtime::messages::RaceSnapshot;

/// List competitions matching the filter
pub async fn list_competitions(
    competitions: &dyn CompetitionStore,
    filter: &CompetitionFilter,
) -> Result<Vec<Competition>> {
    competitions.list(filter).await
}

/// Get competition by ID
pub async fn get_competition(competitions: &dyn CompetitionStore, id: i64) -> Result<Competition> {
    competitions.find_by_id(id).await
}

/// Start a competition and notify its judges.
///
/// The broadcast happens before the next transition may begin, so judges
/// never receive a start after the matching stop.
pub async fn start_competition(
    lifecycle: &CompetitionLifecycle,
    judges: &dyn JudgeStore,
    dispatcher: &BroadcastDispatcher,
    id: i64,
) -> std::result::Result<Competition, LifecycleError> {
    lifecycle
        .start_with(id, |competition| async move {
            let event = CompetitionEvent::RaceStarted(RaceSnapshot::from(&competition));
            notify_judges(judges, dispatcher, &competition, &event).await;
        })
        .await
}

/// Stop a competition and notify its judges
pub async fn stop_competition(
    lifecycle: &CompetitionLifecycle,
    judges: &dyn JudgeStore,
    dispatcher: &BroadcastDispatcher,
    id: i64,
) -> std::result::Result<Competition, LifecycleError> {
    lifecycle
        .stop_with(id, |competition| async move {
            let event = CompetitionEvent::RaceFinished(RaceSnapshot::from(&competition));
            notify_judges(judges, dispatcher, &competition, &event).await;
        })
        .await
}

/// Publish `event` to the group of every judge assigned to the competition.
/// The transition already happened, so failures are only logged.
async fn notify_judges(
    judges: &dyn JudgeStore,
    dispatcher: &BroadcastDispatcher,
    competition: &Competition,
    event: &CompetitionEvent,
) {
    let assigned = match judges.list_by_competition(competition.competition_id).await {
        Ok(assigned) => assigned,
        Err(e) => {
            tracing::error!(
                competition_id = competition.competition_id,
                "Failed to load judges for broadcast: {}",
                e
            );
            return;
        }
    };

    let mut delivered = 0;
    for judge in &assigned {
        delivered += dispatcher.publish(&group_name(judge.judge_id), event);
    }

    tracing::info!(
        competition_id = competition.competition_id,
        judges = assigned.len(),
        sessions = delivered,
        "Broadcast competition state change"
    );
}
