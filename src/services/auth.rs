//! Staff authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::staff::{StaffAccount, StaffClaims, StaffProfile, StaffRole},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a staff member and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, StaffAccount)> {
        let account = self
            .repository
            .staff
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !self.verify_password(&account.password_hash, password)? {
            return Err(AppError::Authentication(
                "Invalid username or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let claims = StaffClaims {
            sub: account.username.clone(),
            staff_id: account.id,
            role: account.role,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, account))
    }

    /// Get the profile behind a set of claims
    pub async fn profile(&self, staff_id: Uuid) -> AppResult<StaffProfile> {
        let account = self.repository.staff.get_by_id(staff_id).await?;
        Ok(StaffProfile::from(&account))
    }

    /// Create the default admin account when the staff table is empty.
    /// Called once at startup so a fresh install is usable.
    pub async fn ensure_bootstrap_account(&self) -> AppResult<()> {
        if self.repository.staff.count().await? > 0 {
            return Ok(());
        }

        let hash = self.hash_password(&self.config.bootstrap_password)?;
        self.repository
            .staff
            .create("admin", &hash, "Administrator", StaffRole::Admin)
            .await?;

        tracing::warn!("Created bootstrap admin account; change its password");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, stored_hash: &str, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AppError::Internal(format!("Corrupt password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
