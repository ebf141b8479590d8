use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use storage::models::Judge;
use storage::repository::JudgeStore;
use storage::services::time_registration::{RegistrationError, TimeRegistrationService};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dispatcher::{BroadcastDispatcher, SessionId, group_name};
use super::messages::{ClientMessage, CompetitionEvent, ServerMessage};
use crate::auth::{AuthError, TokenVerifier};

/// Why a connection was refused. Never sent to the client.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("missing token")]
    MissingToken,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("token belongs to judge {verified}, connection targets {claimed}")]
    IdentityMismatch { verified: i64, claimed: String },
}

/// A live connection bound to one authenticated judge and its group
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub judge: Judge,
    pub group: String,
    events: mpsc::Receiver<CompetitionEvent>,
}

impl Session {
    /// Next event published to this session's group; `None` once the
    /// session has been removed from the dispatcher
    pub async fn next_event(&mut self) -> Option<CompetitionEvent> {
        self.events.recv().await
    }
}

pub struct SessionManager {
    verifier: Arc<dyn TokenVerifier>,
    judges: Arc<dyn JudgeStore>,
    registration: TimeRegistrationService,
    dispatcher: Arc<BroadcastDispatcher>,
}

impl SessionManager {
    pub fn new(
        verifier: Arc<dyn TokenVerifier>,
        judges: Arc<dyn JudgeStore>,
        registration: TimeRegistrationService,
        dispatcher: Arc<BroadcastDispatcher>,
    ) -> Self {
        Self {
            verifier,
            judges,
            registration,
            dispatcher,
        }
    }

    /// Authenticate a connecting judge and join it to its group.
    ///
    /// The group is only joined once the token is valid and belongs to
    /// `claimed_judge_id`.
    pub async fn connect(
        &self,
        token: Option<&str>,
        claimed_judge_id: &str,
    ) -> Result<Session, ConnectError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ConnectError::MissingToken)?;

        let judge = self.verifier.verify(token).await?;

        if judge.judge_id.to_string() != claimed_judge_id {
            return Err(ConnectError::IdentityMismatch {
                verified: judge.judge_id,
                claimed: claimed_judge_id.to_string(),
            });
        }

        if let Err(e) = self.judges.record_login(judge.judge_id, Utc::now()).await {
            warn!(judge_id = judge.judge_id, "Failed to record judge login: {}", e);
        }

        let id = Uuid::new_v4();
        let group = group_name(judge.judge_id);
        let events = self.dispatcher.join(&group, id);

        info!(
            judge_id = judge.judge_id,
            session_id = %id,
            group = %group,
            members = self.dispatcher.group_size(&group),
            "Judge session opened"
        );

        Ok(Session {
            id,
            judge,
            group,
            events,
        })
    }

    /// Leave the session's group. Never fails.
    pub fn disconnect(&self, session: &Session) {
        if !self.dispatcher.leave(&session.group, session.id) {
            debug!(session_id = %session.id, "Session was no longer in its group");
        }
        info!(judge_id = session.judge.judge_id, session_id = %session.id, "Judge session closed");
    }

    /// Handle one inbound text frame and produce the reply for it
    pub async fn handle_message(&self, session: &Session, text: &str) -> ServerMessage {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                debug!(session_id = %session.id, "Undecodable message: {}", e);
                return ServerMessage::error("Mensaje no reconocido");
            }
        };

        let tipo = describe_tipo(&value);

        match serde_json::from_value::<ClientMessage>(value) {
            Ok(ClientMessage::RegisterTime(req)) => {
                match self.registration.register(session.judge.judge_id, req).await {
                    Ok(record) => ServerMessage::TimeRegistered { record },
                    Err(RegistrationError::Storage(e)) => {
                        warn!(session_id = %session.id, "Time registration failed: {}", e);
                        ServerMessage::error(RegistrationError::Storage(e).to_string())
                    }
                    Err(e) => ServerMessage::error(e.to_string()),
                }
            }
            Ok(ClientMessage::Unrecognized) => {
                ServerMessage::error(format!("Tipo de mensaje no reconocido: {tipo}"))
            }
            Err(e) if tipo == "registrar_tiempo" => {
                ServerMessage::error(format!("Formato de mensaje inválido: {e}"))
            }
            Err(_) => ServerMessage::error(format!("Tipo de mensaje no reconocido: {tipo}")),
        }
    }
}

fn describe_tipo(value: &Value) -> String {
    match value.get("tipo") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtVerifier;
    use crate::auth::token::tests::{SECRET, judge_request, token_for};
    use crate::realtime::messages::RaceSnapshot;
    use serde_json::json;
    use storage::dto::team::CreateTeamRequest;
    use storage::repository::{InMemoryStore, TeamStore};

    struct Fixture {
        store: Arc<InMemoryStore>,
        dispatcher: Arc<BroadcastDispatcher>,
        manager: SessionManager,
        judge_id: i64,
        other_judge_id: i64,
        team_id: i64,
        foreign_team_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let judge = JudgeStore::create(store.as_ref(), &judge_request("juez1"))
            .await
            .unwrap();
        let other = JudgeStore::create(store.as_ref(), &judge_request("juez2"))
            .await
            .unwrap();
        let team = TeamStore::create(
            store.as_ref(),
            &CreateTeamRequest {
                name: "Equipo Azul".to_string(),
                bib_number: 7,
                judge_id: judge.judge_id,
            },
        )
        .await
        .unwrap();
        let foreign = TeamStore::create(
            store.as_ref(),
            &CreateTeamRequest {
                name: "Equipo Amarillo".to_string(),
                bib_number: 4,
                judge_id: other.judge_id,
            },
        )
        .await
        .unwrap();

        let dispatcher = Arc::new(BroadcastDispatcher::new(8));
        let manager = SessionManager::new(
            Arc::new(JwtVerifier::new(SECRET, store.clone())),
            store.clone(),
            TimeRegistrationService::new(store.clone(), store.clone()),
            dispatcher.clone(),
        );

        Fixture {
            store,
            dispatcher,
            manager,
            judge_id: judge.judge_id,
            other_judge_id: other.judge_id,
            team_id: team.team_id,
            foreign_team_id: foreign.team_id,
        }
    }

    async fn connect(fx: &Fixture) -> Session {
        fx.manager
            .connect(Some(&token_for(fx.judge_id, 600)), &fx.judge_id.to_string())
            .await
            .unwrap()
    }

    async fn reply(fx: &Fixture, session: &Session, message: Value) -> Value {
        let reply = fx
            .manager
            .handle_message(session, &message.to_string())
            .await;
        serde_json::to_value(reply).unwrap()
    }

    #[tokio::test]
    async fn test_connect_joins_judge_group_and_records_login() {
        let fx = fixture().await;
        let session = connect(&fx).await;

        assert_eq!(session.group, format!("juez_{}", fx.judge_id));
        assert_eq!(fx.dispatcher.group_size(&session.group), 1);

        let judge = JudgeStore::find_by_id(fx.store.as_ref(), fx.judge_id)
            .await
            .unwrap();
        assert!(judge.last_login.is_some());
    }

    #[tokio::test]
    async fn test_missing_token_rejected() {
        let fx = fixture().await;
        let claimed = fx.judge_id.to_string();

        let err = fx.manager.connect(None, &claimed).await.unwrap_err();
        assert!(matches!(err, ConnectError::MissingToken));

        let err = fx.manager.connect(Some(""), &claimed).await.unwrap_err();
        assert!(matches!(err, ConnectError::MissingToken));
    }

    #[tokio::test]
    async fn test_identity_mismatch_rejected_before_join() {
        let fx = fixture().await;
        let token = token_for(fx.judge_id, 600);

        let err = fx
            .manager
            .connect(Some(&token), &fx.other_judge_id.to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectError::IdentityMismatch { .. }));
        assert_eq!(fx.dispatcher.group_size(&group_name(fx.judge_id)), 0);
        assert_eq!(fx.dispatcher.group_size(&group_name(fx.other_judge_id)), 0);
    }

    #[tokio::test]
    async fn test_inactive_judge_rejected() {
        let fx = fixture().await;
        fx.store.set_judge_active(fx.judge_id, false).unwrap();

        let err = fx
            .manager
            .connect(Some(&token_for(fx.judge_id, 600)), &fx.judge_id.to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectError::Auth(AuthError::InactiveJudge(_))));
        assert_eq!(fx.dispatcher.group_size(&group_name(fx.judge_id)), 0);
    }

    #[tokio::test]
    async fn test_register_time_over_session() {
        let fx = fixture().await;
        let session = connect(&fx).await;

        let value = reply(
            &fx,
            &session,
            json!({
                "tipo": "registrar_tiempo",
                "equipo_id": fx.team_id,
                "tiempo": 1234567,
                "minutos": 20,
                "segundos": 34,
                "milisegundos": 567
            }),
        )
        .await;

        assert_eq!(value["tipo"], "tiempo_registrado");
        let registro = &value["registro"];
        assert_eq!(registro["equipo_id"], fx.team_id);
        assert_eq!(registro["equipo_nombre"], "Equipo Azul");
        assert_eq!(registro["equipo_dorsal"], 7);
        assert_eq!(registro["tiempo"], 1234567);
        assert_eq!(registro["horas"], 0);
        assert_eq!(registro["minutos"], 20);
        assert_eq!(registro["segundos"], 34);
        assert_eq!(registro["milisegundos"], 567);
        assert!(registro["id_registro"].is_string());
        assert!(registro["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_foreign_team_reported_and_not_stored() {
        let fx = fixture().await;
        let session = connect(&fx).await;

        let value = reply(
            &fx,
            &session,
            json!({ "tipo": "registrar_tiempo", "equipo_id": fx.foreign_team_id, "tiempo": 10 }),
        )
        .await;

        assert_eq!(value["tipo"], "error");
        assert_eq!(
            value["mensaje"],
            format!(
                "El equipo con ID {} no pertenece a tu lista de equipos asignados",
                fx.foreign_team_id
            )
        );
        assert_eq!(fx.store.time_record_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields_reported() {
        let fx = fixture().await;
        let session = connect(&fx).await;

        let value = reply(&fx, &session, json!({ "tipo": "registrar_tiempo", "tiempo": 10 })).await;

        assert_eq!(value["tipo"], "error");
        assert_eq!(
            value["mensaje"],
            "Faltan datos requeridos: equipo_id y tiempo son obligatorios"
        );
    }

    #[tokio::test]
    async fn test_unrecognized_messages() {
        let fx = fixture().await;
        let session = connect(&fx).await;

        let value = reply(&fx, &session, json!({ "tipo": "saludo" })).await;
        assert_eq!(value["mensaje"], "Tipo de mensaje no reconocido: saludo");

        let value = reply(&fx, &session, json!({ "hola": 1 })).await;
        assert_eq!(value["mensaje"], "Tipo de mensaje no reconocido: null");

        let reply = fx.manager.handle_message(&session, "not json").await;
        let value = serde_json::to_value(reply).unwrap();
        assert_eq!(value["tipo"], "error");
    }

    #[tokio::test]
    async fn test_malformed_registration_reported() {
        let fx = fixture().await;
        let session = connect(&fx).await;

        let value = reply(
            &fx,
            &session,
            json!({ "tipo": "registrar_tiempo", "equipo_id": "abc", "tiempo": 10 }),
        )
        .await;

        assert_eq!(value["tipo"], "error");
        assert!(
            value["mensaje"]
                .as_str()
                .unwrap()
                .starts_with("Formato de mensaje inválido")
        );
    }

    #[tokio::test]
    async fn test_group_events_relayed_until_disconnect() {
        let fx = fixture().await;
        let mut session = connect(&fx).await;
        let event = CompetitionEvent::RaceStarted(RaceSnapshot {
            competition_id: 1,
            name: "Carrera 5K".to_string(),
            status: "running".to_string(),
            started_at: None,
            finished_at: None,
        });

        fx.dispatcher.publish(&session.group, &event);
        assert_eq!(session.next_event().await, Some(event.clone()));

        fx.manager.disconnect(&session);
        fx.manager.disconnect(&session);
        assert_eq!(fx.dispatcher.group_size(&session.group), 0);
        assert_eq!(session.next_event().await, None);
    }
}
