use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use storage::models::Judge;

use crate::error::WebError;
use crate::middleware::auth::bearer_token;
use crate::state::AppState;

/// The judge identified by the request's `Authorization: Bearer` token
pub struct AuthenticatedJudge(pub Judge);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedJudge {
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(WebError::Unauthorized)?;

        match state.verifier.verify(token).await {
            Ok(judge) => Ok(Self(judge)),
            Err(e) => {
                tracing::warn!("Rejected judge credential: {}", e);
                Err(WebError::Unauthorized)
            }
        }
    }
}
