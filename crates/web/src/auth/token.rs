use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use storage::error::StorageError;
use storage::models::Judge;
use storage::repository::JudgeStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Unknown judge {0}")]
    UnknownJudge(i64),

    #[error("Judge {0} is inactive")]
    InactiveJudge(i64),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

/// Claims carried by a judge access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeClaims {
    pub juez_id: i64,
    pub username: Option<String>,
    pub exp: u64,
}

/// Resolves an opaque credential to an active judge
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Judge, AuthError>;
}

/// HS256 JWT verification against a shared secret
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    judges: Arc<dyn JudgeStore>,
}

impl JwtVerifier {
    pub fn new(secret: &[u8], judges: Arc<dyn JudgeStore>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            judges,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Judge, AuthError> {
        let claims = decode::<JudgeClaims>(token, &self.key, &self.validation)?.claims;

        let judge = match self.judges.find_by_id(claims.juez_id).await {
            Ok(judge) => judge,
            Err(StorageError::NotFound) => return Err(AuthError::UnknownJudge(claims.juez_id)),
            Err(e) => return Err(AuthError::Storage(e)),
        };

        if !judge.is_active {
            return Err(AuthError::InactiveJudge(judge.judge_id));
        }

        Ok(judge)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use storage::dto::judge::CreateJudgeRequest;
    use storage::repository::InMemoryStore;

    pub(crate) const SECRET: &[u8] = b"test-secret";

    pub(crate) fn token_for(judge_id: i64, ttl_secs: i64) -> String {
        let exp = chrono::Utc::now().timestamp() + ttl_secs;
        let claims = JudgeClaims {
            juez_id: judge_id,
            username: None,
            exp: exp.max(0) as u64,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    pub(crate) fn judge_request(username: &str) -> CreateJudgeRequest {
        CreateJudgeRequest {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{username}@example.com"),
            phone: None,
            competition_id: None,
        }
    }

    async fn setup() -> (Arc<InMemoryStore>, JwtVerifier, i64) {
        let store = Arc::new(InMemoryStore::new());
        let judge = JudgeStore::create(store.as_ref(), &judge_request("juez1"))
            .await
            .unwrap();
        let verifier = JwtVerifier::new(SECRET, store.clone());
        (store, verifier, judge.judge_id)
    }

    #[tokio::test]
    async fn test_valid_token_resolves_judge() {
        let (_store, verifier, judge_id) = setup().await;
        let judge = verifier.verify(&token_for(judge_id, 600)).await.unwrap();
        assert_eq!(judge.judge_id, judge_id);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let (_store, verifier, judge_id) = setup().await;
        let err = verifier.verify(&token_for(judge_id, -3600)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let (_store, verifier, _judge_id) = setup().await;
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let (store, _verifier, judge_id) = setup().await;
        let other = JwtVerifier::new(b"another-secret", store);
        let err = other.verify(&token_for(judge_id, 600)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_judges_rejected() {
        let (store, verifier, judge_id) = setup().await;

        let err = verifier.verify(&token_for(judge_id + 100, 600)).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownJudge(_)));

        store.set_judge_active(judge_id, false).unwrap();
        let err = verifier.verify(&token_for(judge_id, 600)).await.unwrap_err();
        assert!(matches!(err, AuthError::InactiveJudge(id) if id == judge_id));
    }
}
