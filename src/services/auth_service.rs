//! Authentication service - customer registration, login and token checks.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Verified against when the email is unknown, so a failed login costs the
/// same Argon2 work whether or not the account exists.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("dummy-password-never-matches").ok());

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Fields accepted at registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a customer account
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let email = normalize_email(&registration.email);

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let phone = registration
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: registration.name.trim().to_string(),
                phone,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Customer registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        let verified = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()).verify(&password),
            None => {
                if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                    let _ = dummy.verify(&password);
                }
                false
            }
        };

        match user {
            Some(user) if verified => generate_token(&user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
