use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

use crate::{Result, SeederError};

/// Same claim set the web service verifies
#[derive(Debug, Serialize)]
struct JudgeClaims<'a> {
    juez_id: i64,
    username: Option<&'a str>,
    exp: u64,
}

/// Token lifetime from a CLI minute count; must be positive and keep the
/// expiry representable
pub fn ttl_from_minutes(minutes: i64) -> Result<Duration> {
    Duration::try_minutes(minutes)
        .filter(|ttl| *ttl > Duration::zero())
        .ok_or(SeederError::InvalidTtl(minutes))
}

/// Sign an HS256 access token for `judge_id` valid for `ttl`
pub fn issue_token(
    secret: &[u8],
    judge_id: i64,
    username: Option<&str>,
    ttl: Duration,
) -> Result<String> {
    let exp = Utc::now()
        .checked_add_signed(ttl)
        .ok_or(SeederError::InvalidTtl(ttl.num_minutes()))?
        .timestamp()
        .max(0) as u64;
    let claims = JudgeClaims {
        juez_id: judge_id,
        username,
        exp,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Decoded {
        juez_id: i64,
        username: Option<String>,
    }

    #[test]
    fn test_issued_token_round_trips_claims() {
        let token = issue_token(b"secret", 3, Some("juez1"), Duration::minutes(5)).unwrap();

        let decoded = decode::<Decoded>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap()
        .claims;

        assert_eq!(decoded.juez_id, 3);
        assert_eq!(decoded.username.as_deref(), Some("juez1"));
    }

    #[test]
    fn test_ttl_rejects_out_of_range_minutes() {
        assert_eq!(ttl_from_minutes(90).unwrap(), Duration::minutes(90));
        assert!(matches!(ttl_from_minutes(0), Err(SeederError::InvalidTtl(0))));
        assert!(matches!(
            ttl_from_minutes(i64::MAX),
            Err(SeederError::InvalidTtl(i64::MAX))
        ));
    }

    #[test]
    fn test_issue_token_rejects_unrepresentable_expiry() {
        let ttl = Duration::try_days(365 * 300_000).unwrap();
        assert!(matches!(
            issue_token(b"secret", 1, None, ttl),
            Err(SeederError::InvalidTtl(_))
        ));
    }
}
