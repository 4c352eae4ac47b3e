//! Credentials: password hashes, access tokens (JWT) and refresh tokens.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{ServerError, server::AuthConfig};

pub(crate) const REFRESH_COOKIE: &str = "refreshToken";
const REFRESH_TOKEN_BYTES: usize = 40;

/// Claims of an access token. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub(crate) fn issue_access_token(
    user_id: &str,
    email: &str,
    auth: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<String, ServerError> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + auth.access_token_ttl).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|err| ServerError::Internal(format!("failed to sign access token: {err}")))
}

pub(crate) fn verify_access_token(token: &str, auth: &AuthConfig) -> Result<Claims, ServerError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        tracing::debug!("rejected access token: {err}");
        ServerError::Unauthorized("invalid or expired token".to_string())
    })
}

pub(crate) fn hash_password(password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServerError::Internal(format!("failed to hash password: {err}")))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("stored password hash cannot be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Opaque refresh token: 40 random bytes, base64url.
pub(crate) fn new_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub(crate) fn refresh_cookie(token: String, auth: &AuthConfig) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.secure_cookies)
        .path("/")
        .max_age(time::Duration::seconds(auth.refresh_token_ttl.num_seconds()))
        .build()
}

pub(crate) fn cleared_refresh_cookie() -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn auth() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
            secure_cookies: false,
        }
    }

    #[test]
    fn access_token_round_trip() {
        let auth = auth();
        let token = issue_access_token("user-1", "ada@example.com", &auth, Utc::now()).unwrap();
        let claims = verify_access_token(&token, &auth).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let auth = auth();
        let old = Utc::now() - Duration::hours(2);
        let expired = issue_access_token("user-1", "ada@example.com", &auth, old).unwrap();
        assert!(verify_access_token(&expired, &auth).is_err());

        let other = AuthConfig {
            jwt_secret: "other-secret".to_string(),
            ..auth.clone()
        };
        let forged = issue_access_token("user-1", "ada@example.com", &other, Utc::now()).unwrap();
        assert!(verify_access_token(&forged, &auth).is_err());
        assert!(verify_access_token("not-a-jwt", &auth).is_err());
    }

    #[test]
    fn passwords() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn refresh_tokens_are_random() {
        let a = new_refresh_token();
        let b = new_refresh_token();
        assert_ne!(a, b);
        assert_eq!(URL_SAFE_NO_PAD.decode(&a).unwrap().len(), REFRESH_TOKEN_BYTES);
    }

    #[test]
    fn refresh_cookie_flags() {
        let cookie = refresh_cookie("abc".to_string(), &auth());
        assert_eq!(cookie.name(), REFRESH_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }
}
