use anyhow::{anyhow, Result};
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: i32,
    #[serde(with = "jwt_numeric_date")]
    pub iat: DateTime<Utc>,
    #[serde(with = "jwt_numeric_date")]
    pub exp: DateTime<Utc>,
    pub t: String,
}

impl TokenClaims {
    pub fn new(sub: i32, iat: DateTime<Utc>, exp: DateTime<Utc>, t: &str) -> Self {
        // normalize the timestamps by stripping of microseconds
        let iat = iat
            .date()
            .and_hms_milli(iat.hour(), iat.minute(), iat.second(), 0);
        let exp = exp
            .date()
            .and_hms_milli(exp.hour(), exp.minute(), exp.second(), 0);
        Self {
            sub,
            iat,
            exp,
            t: t.to_owned(),
        }
    }
}

fn secret() -> String {
    env::var("JWT_SECRET").expect("JWT_SECRET must be set")
}

pub fn issue_access_token(user_id: i32) -> String {
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    let claims = TokenClaims::new(user_id, Utc::now(), Utc::now() + Duration::days(7), "access");

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret().as_ref()),
    )
    .expect("JWT encoding failed")
}

pub fn decode(token: &str) -> jsonwebtoken::errors::Result<jsonwebtoken::TokenData<TokenClaims>> {
    use jsonwebtoken::{DecodingKey, Validation};
    jsonwebtoken::decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret().as_ref()),
        &Validation::default(),
    )
}

pub fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, encoded: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;
    match PasswordHash::new(encoded) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

mod jwt_numeric_date {
    //! Custom serialization of DateTime<Utc> to conform with the JWT spec (RFC 7519 section 2, "Numeric Date")
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    /// Serializes a DateTime<Utc> to a Unix timestamp (milliseconds since 1970/1/1T00:00:00T)
    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let timestamp = date.timestamp();
        serializer.serialize_i64(timestamp)
    }

    /// Attempts to deserialize an i64 and use as a Unix timestamp
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Utc.timestamp_opt(i64::deserialize(deserializer)?, 0)
            .single() // If there are multiple or no valid DateTimes from timestamp, return None
            .ok_or_else(|| serde::de::Error::custom("invalid Unix timestamp value"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let encoded = hash_password("correct horse battery").expect("hashing must succeed");
        assert_ne!(encoded, "correct horse battery");
        assert!(verify_password("correct horse battery", &encoded));
        assert!(!verify_password("wrong horse", &encoded));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-an-argon2-string"));
    }

    #[test]
    fn token_round_trip() {
        std::env::set_var("JWT_SECRET", "carnet-test-jwt-secret");
        let token = issue_access_token(42);
        let decoded = decode(&token).expect("token must decode");
        assert_eq!(decoded.claims.sub, 42);
        assert_eq!(decoded.claims.t, "access");
    }
}
