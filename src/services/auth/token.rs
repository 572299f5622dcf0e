//! Identity token issuance and validation (HS256 JWT).
//!
//! Tokens are stateless: `{sub, role, iat, exp}` signed with a shared secret.
//! Every validation failure is reported as the single [`InvalidToken`] error;
//! the concrete reason is only visible in debug logs.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::error::AppError;

/// Minimum signing-secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

pub const ADMIN_ROLE: &str = "admin";
pub const CUSTOMER_ROLE: &str = "customer";

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Time source for `iat`/`exp`. Production uses [`SystemClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Identity carried by a validated token. Only this module creates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    user_id: i64,
    role: String,
}

impl Claims {
    pub(crate) fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid token")]
pub struct InvalidToken;

#[derive(Debug, Error)]
pub enum TokenConfigError {
    #[error("jwt secret must be at least 32 bytes, got {0}")]
    SecretTooShort(usize),
}

// Internal reasons; never leave this module.
#[derive(Debug, Error)]
enum Rejection {
    #[error("malformed token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("unexpected signing method: {0:?}")]
    UnexpectedAlgorithm(Algorithm),
    #[error("token expired at {0}")]
    Expired(i64),
    #[error("invalid 'sub' (expected integer)")]
    InvalidSubject,
}

#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    sub: String,
    role: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    role: String,
    exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    /// Build a service around `secret`. Fails when the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: &[u8]) -> Result<Self, TokenConfigError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenConfigError::SecretTooShort(secret.len()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        // `exp` is checked against the injected clock in `verify`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp", "sub"].into_iter().map(String::from).collect();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds: TOKEN_TTL_SECONDS,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn create_token(&self, user_id: i64, role: &str) -> Result<String, AppError> {
        let now = self.clock.now().timestamp();
        let claims = IssuedClaims {
            sub: user_id.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign JWT");
                AppError::internal(format!("signing token: {e}"))
            },
        )
    }

    pub fn parse_token(&self, token: &str) -> Result<Claims, InvalidToken> {
        self.verify(token).map_err(|reason| {
            debug!(reason = %reason, "token rejected");
            InvalidToken
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, Rejection> {
        // Reject anything outside the HMAC family before looking at the payload.
        let header = jsonwebtoken::decode_header(token)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(Rejection::UnexpectedAlgorithm(header.alg));
        }

        let data =
            jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(Rejection::Expired(claims.exp));
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| Rejection::InvalidSubject)?;

        Ok(Claims::new(user_id, claims.role))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    pub(crate) const SECRET: &[u8] = b"test-secret-that-is-at-least-32-bytes!";

    pub(crate) struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn service_at(secret: &[u8], now: DateTime<Utc>) -> TokenService {
        TokenService::new(secret)
            .unwrap()
            .with_clock(Arc::new(FixedClock(now)))
    }

    fn sign_raw(alg: Algorithm, claims: serde_json::Value) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn valid_payload() -> serde_json::Value {
        let iat = t0().timestamp();
        json!({ "sub": "7", "role": "admin", "iat": iat, "exp": iat + 3600 })
    }

    #[test]
    fn new_rejects_short_secrets() {
        assert!(TokenService::new(&[b'x'; 32]).is_ok());
        assert!(matches!(
            TokenService::new(b"short"),
            Err(TokenConfigError::SecretTooShort(5))
        ));
        assert!(TokenService::new(b"").is_err());
    }

    #[test]
    fn round_trip_preserves_claims() {
        let svc = service_at(SECRET, t0());
        for (user_id, role) in [(1, "admin"), (42, "customer"), (i64::MAX, "customer")] {
            let token = svc.create_token(user_id, role).unwrap();
            let claims = svc.parse_token(&token).unwrap();
            assert_eq!(claims.user_id(), user_id);
            assert_eq!(claims.role(), role);
        }
    }

    #[test]
    fn payload_carries_sub_role_iat_exp() {
        let token = service_at(SECRET, t0()).create_token(9, "customer").unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        assert_eq!(json["sub"], "9");
        assert_eq!(json["role"], "customer");
        assert_eq!(json["iat"], t0().timestamp());
        assert_eq!(json["exp"], t0().timestamp() + TOKEN_TTL_SECONDS);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = service_at(SECRET, t0()).create_token(1, "admin").unwrap();

        let almost = service_at(SECRET, t0() + Duration::minutes(59));
        assert!(almost.parse_token(&token).is_ok());

        let at_expiry = service_at(SECRET, t0() + Duration::hours(1));
        assert_eq!(at_expiry.parse_token(&token), Err(InvalidToken));

        let later = service_at(SECRET, t0() + Duration::hours(2));
        assert_eq!(later.parse_token(&token), Err(InvalidToken));
    }

    #[test]
    fn any_flipped_signature_char_is_rejected() {
        let svc = service_at(SECRET, t0());
        let token = svc.create_token(1, "admin").unwrap();
        let sig_start = token.rfind('.').unwrap() + 1;

        for i in sig_start..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(svc.parse_token(&tampered), Err(InvalidToken), "index {i}");
        }
    }

    #[test]
    fn tokens_do_not_cross_secrets() {
        let token = service_at(SECRET, t0()).create_token(1, "admin").unwrap();
        let other = service_at(b"another-secret-that-is-32-bytes-long", t0());
        assert_eq!(other.parse_token(&token), Err(InvalidToken));
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = service_at(SECRET, t0());
        for token in ["", "not.a.jwt", "eyJhbGciOiJIUzI1NiJ9", "a.b.c.d"] {
            assert_eq!(svc.parse_token(token), Err(InvalidToken), "{token:?}");
        }
    }

    #[test]
    fn alg_none_is_rejected_with_or_without_signature() {
        let svc = service_at(SECRET, t0());
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(valid_payload().to_string());

        let unsigned = format!("{header}.{payload}.");
        assert_eq!(svc.parse_token(&unsigned), Err(InvalidToken));

        let real = svc.create_token(7, "admin").unwrap();
        let signature = real.rsplit('.').next().unwrap();
        let signed = format!("{header}.{payload}.{signature}");
        assert_eq!(svc.parse_token(&signed), Err(InvalidToken));
    }

    #[test]
    fn non_hmac_algorithms_are_rejected() {
        let svc = service_at(SECRET, t0());
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(valid_payload().to_string());
        let token = format!("{header}.{payload}.c2lnbmF0dXJl");
        assert_eq!(svc.parse_token(&token), Err(InvalidToken));
    }

    #[test]
    fn other_hmac_strengths_are_accepted() {
        let svc = service_at(SECRET, t0());
        let token = sign_raw(Algorithm::HS512, valid_payload());
        let claims = svc.parse_token(&token).unwrap();
        assert_eq!(claims.user_id(), 7);
        assert!(claims.is_admin());
    }

    #[test]
    fn malformed_claims_are_rejected() {
        let svc = service_at(SECRET, t0());
        let exp = t0().timestamp() + 3600;
        let payloads = [
            json!({ "sub": "abc", "role": "admin", "exp": exp }),
            json!({ "sub": 7, "role": "admin", "exp": exp }),
            json!({ "role": "admin", "exp": exp }),
            json!({ "sub": "7", "exp": exp }),
            json!({ "sub": "7", "role": 1, "exp": exp }),
            json!({ "sub": "7", "role": "admin" }),
        ];

        for payload in payloads {
            let token = sign_raw(Algorithm::HS256, payload.clone());
            assert_eq!(svc.parse_token(&token), Err(InvalidToken), "{payload}");
        }
    }
}
