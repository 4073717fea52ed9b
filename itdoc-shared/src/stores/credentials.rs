/// Credential store
///
/// Owns user registration and secret verification. Plaintext passwords enter
/// through [`CredentialStore::create_user`] and
/// [`CredentialStore::authenticate`] and never leave them; what gets stored is
/// an Argon2id PHC string.

use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use super::is_unique_violation;
use crate::auth::password::{self, HashParams, PasswordError};
use crate::error::{field_issues, FieldIssue};
use crate::models::user::{CreateUser, PublicUser, User, DEFAULT_USER_ROLE};

/// Registration input
///
/// Missing fields deserialize as empty strings so they surface as field
/// issues rather than as a body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct NewUser {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Input failed validation; nothing was written
    #[error("Validation failed")]
    Validation(Vec<FieldIssue>),

    /// A user with this email already exists
    #[error("A user with this email already exists")]
    EmailConflict,

    /// Hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database failure
    #[error("Store failure: {0}")]
    Store(#[from] sqlx::Error),
}

/// User persistence and secret verification
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    hash_params: HashParams,
}

impl CredentialStore {
    /// Creates a store hashing with the default Argon2id parameters
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_hash_params(pool, HashParams::default())
    }

    /// Creates a store hashing with explicit Argon2id parameters
    pub fn with_hash_params(pool: SqlitePool, hash_params: HashParams) -> Self {
        Self { pool, hash_params }
    }

    /// Registers a new user
    ///
    /// Validation runs before the store is touched and reports every failing
    /// field at once. The email is checked for a prior registration first; a
    /// concurrent registration that slips past the check is caught by the
    /// UNIQUE constraint and reported the same way.
    ///
    /// # Errors
    ///
    /// - `Validation` with one issue per failing field
    /// - `EmailConflict` if the email is taken
    /// - `Password` / `Store` on internal failure
    pub async fn create_user(&self, input: NewUser) -> Result<PublicUser, CredentialError> {
        input
            .validate()
            .map_err(|e| CredentialError::Validation(field_issues(&e)))?;

        if User::find_by_email(&self.pool, &input.email).await?.is_some() {
            warn!(email = %input.email, "Registration rejected: email already registered");
            return Err(CredentialError::EmailConflict);
        }

        let password_hash = password::hash_password_with(&input.password, &self.hash_params)?;

        let user = User::create(
            &self.pool,
            CreateUser {
                name: input.name,
                email: input.email,
                password_hash,
                image: None,
                role: DEFAULT_USER_ROLE.to_string(),
            },
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CredentialError::EmailConflict
            } else {
                CredentialError::Store(e)
            }
        })?;

        debug!(user_id = %user.id, "User created");

        Ok(user.into())
    }

    /// Looks up a user by exact email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        User::find_by_email(&self.pool, email).await
    }

    /// Looks up a user by ID
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        User::find_by_id(&self.pool, id).await
    }

    /// Checks a plaintext secret against a stored hash
    ///
    /// A malformed hash never verifies.
    pub fn verify_secret(&self, plain: &str, hashed: &str) -> bool {
        match password::verify_password(plain, hashed) {
            Ok(valid) => valid,
            Err(e) => {
                warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// Resolves login credentials to a user
    ///
    /// Unknown email and wrong password both yield `None`.
    pub async fn authenticate(&self, email: &str, plain: &str) -> Result<Option<User>, sqlx::Error> {
        let Some(user) = self.get_user_by_email(email).await? else {
            debug!("Login attempt for unknown email");
            return Ok(None);
        };

        if self.verify_secret(plain, &user.password_hash) {
            Ok(Some(user))
        } else {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validation_reports_every_field() {
        let input = NewUser {
            name: "A".to_string(),
            email: "nope".to_string(),
            password: "short".to_string(),
        };

        let issues = field_issues(&input.validate().unwrap_err());
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
    }

    #[test]
    fn test_new_user_accepts_minimal_valid_input() {
        let input = NewUser {
            name: "Al".to_string(),
            email: "a@x.com".to_string(),
            password: "password1".to_string(),
        };
        assert!(input.validate().is_ok());
    }
}
