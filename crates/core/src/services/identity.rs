//! Identity service.
//!
//! Identity is a bare email claim: the first sight of an email creates the
//! user, and there is no password or verification step. Every entry point
//! that needs a caller identity goes through `verify_token`; nothing else
//! in the system derives identity from a raw email string.

use chrono::Utc;
use imgarena_common::{AppError, AppResult, IdGenerator, TokenService};
use imgarena_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Identity service for business logic.
#[derive(Clone)]
pub struct IdentityService {
    user_repo: UserRepository,
    tokens: TokenService,
    id_gen: IdGenerator,
}

/// Input for signup and login.
#[derive(Debug, Deserialize, Validate)]
pub struct SessionInput {
    #[validate(email)]
    pub email: String,
}

impl IdentityService {
    /// Create a new identity service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, tokens: TokenService) -> Self {
        Self {
            user_repo,
            tokens,
            id_gen: IdGenerator::new(),
        }
    }

    /// Map an email to its user, creating the user on first sight.
    ///
    /// Email is stored and compared exactly as submitted, no normalization.
    /// Concurrent first-time resolutions of the same email may race; the
    /// unique index on email turns the loser into a storage error.
    pub async fn resolve(&self, email: &str) -> AppResult<user::Model> {
        let input = SessionInput {
            email: email.to_string(),
        };
        input.validate()?;

        if let Some(existing) = self.user_repo.find_by_email(email).await? {
            return Ok(existing);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let created = self.user_repo.create(model).await?;
        tracing::info!(user_id = %created.id, "Created user on first sight");
        Ok(created)
    }

    /// Resolve an email and issue a session token for the user.
    pub async fn start_session(&self, email: &str) -> AppResult<(user::Model, String)> {
        let user = self.resolve(email).await?;
        let token = self.tokens.issue(&user.id, &user.email)?;
        Ok((user, token))
    }

    /// Read-only lookup by exact email. Never creates.
    pub async fn lookup(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_email(email).await
    }

    /// Verify a session token and load its user.
    ///
    /// Any failure, bad signature, expiry, or a deleted user, collapses to
    /// `Unauthorized`.
    pub async fn verify_token(&self, token: &str) -> AppResult<user::Model> {
        let claims = self.tokens.verify(token)?;
        self.user_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Load a user by ID, erroring if absent.
    pub async fn get_user(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }
}
