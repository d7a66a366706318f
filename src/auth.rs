//! Passwords, bearer tokens and the `AuthUser` extractor.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::error::ApiError;
use crate::models::{JWTClaim, User};
use crate::AppState;

const MIN_PASSWORD_LENGTH: usize = 5;
const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password must contain at least one lowercase letter, one number, one symbol, and be at least 5 characters long")]
    WeakPassword,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token rejected: {0}")]
    Token(#[source] jsonwebtoken::errors::Error),

    #[error("could not encode token: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),

    #[error("password hashing error")]
    PasswordHash,
}

/// At least five characters with a lowercase letter, a digit and a symbol.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if long_enough && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        Err(AuthError::WeakPassword)
    }
}

/// Hash a password using Argon2id.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

pub fn issue_token(user: &User, secret: &str, ttl_hours: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let jwt_claim = JWTClaim {
        user_id: user.id.to_hex(),
        username: user.username.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(ttl_hours)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &jwt_claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::TokenEncoding)
}

pub fn verify_token(token: &str, secret: &str) -> Result<JWTClaim, AuthError> {
    decode::<JWTClaim>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AuthError::Token)
}

/// The caller behind a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub username: String,
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::Internal("application state not configured".to_string()))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
        .ok_or(ApiError::MissingToken)?;

    let claim = verify_token(token, &state.config.jwt_secret)?;
    let user_id = ObjectId::parse_str(&claim.user_id).map_err(|_| ApiError::InvalidToken)?;

    Ok(AuthUser {
        user_id,
        username: claim.username,
    })
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farmer() -> User {
        User::new(
            "ravi".to_string(),
            "ravi@example.com".to_string(),
            String::new(),
            "Nashik".to_string(),
        )
    }

    #[test]
    fn password_policy() {
        assert!(validate_password("abc").is_err());
        assert!(validate_password("abc1!").is_ok());
        assert!(validate_password("abcd1").is_err());
        assert!(validate_password("ABC1!").is_err());
        assert!(validate_password("a1!").is_err());
    }

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("abc1!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("abc1!", &hash).is_ok());
        assert!(matches!(
            verify_password("abc2!", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn token_carries_user_id_and_name() {
        let user = farmer();
        let token = issue_token(&user, "secret", 24).unwrap();
        let claim = verify_token(&token, "secret").unwrap();
        assert_eq!(claim.user_id, user.id.to_hex());
        assert_eq!(claim.username, "ravi");
        assert_eq!(claim.exp - claim.iat, 24 * 3600);
    }

    #[test]
    fn expired_or_foreign_tokens_are_rejected() {
        let user = farmer();
        let expired = issue_token(&user, "secret", -2).unwrap();
        assert!(matches!(verify_token(&expired, "secret"), Err(AuthError::Token(_))));

        let foreign = issue_token(&user, "other-secret", 24).unwrap();
        assert!(verify_token(&foreign, "secret").is_err());
    }
}
