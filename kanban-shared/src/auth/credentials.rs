/// Credential store: registration and password verification
///
/// Owns the rules around user accounts:
///
/// - every registration field must be non-empty
/// - usernames are unique; uniqueness is enforced by the store's constraint
///   on insert, not by a lookup beforehand
/// - only a salted Argon2id hash of the password is persisted
/// - failed verification never says whether the username or the password
///   was wrong
///
/// # Example
///
/// ```
/// use kanban_shared::auth::credentials::{CredentialService, Registration};
/// use kanban_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = CredentialService::new(Arc::new(MemoryStore::new()));
///
/// credentials.register(Registration::new("John Doe", "johndoe", "secret123")).await?;
/// let user = credentials.verify("johndoe", "secret123").await?;
/// assert_eq!(user.name, "John Doe");
/// # Ok(())
/// # }
/// ```

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use super::password::{self, PasswordError};
use crate::models::user::USERNAME_CONSTRAINT;
use crate::models::{CreateUser, User, UserId};
use crate::store::{StoreError, UserStore};

/// Checked when the username is unknown, so that branch costs one Argon2
/// verification like a wrong password does. Same parameters as
/// [`password::hash_password`].
const DUMMY_HASH: &str = "$argon2id$v=19$m=65536,t=3,p=4$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Error type for credential operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// One or more registration fields were empty or absent
    #[error("Missing required field(s): {0}")]
    MissingField(String),

    /// The username is already registered
    #[error("Username already registered: {0}")]
    DuplicateUsername(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Hashing or verification fault
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Storage fault
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CredentialError {
    /// True for expected outcomes that are answered without a server error
    pub fn is_business_outcome(&self) -> bool {
        matches!(
            self,
            CredentialError::MissingField(_)
                | CredentialError::DuplicateUsername(_)
                | CredentialError::InvalidCredentials
        )
    }
}

/// Registration input
///
/// Absent form fields deserialize as empty strings and are then rejected by
/// validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Registration {
    /// Display name
    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Login name
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Raw password, hashed before it reaches the store
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Registration {
    /// Convenience constructor
    pub fn new(name: &str, username: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Names of the fields failing validation, sorted and comma separated
    fn missing_fields(&self) -> Option<String> {
        let errors = self.validate().err()?;

        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();

        Some(fields.join(", "))
    }
}

/// Registration and login checks over a [`UserStore`]
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
}

impl CredentialService {
    /// Creates a service over the given store
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `MissingField` if any field is empty
    /// - `DuplicateUsername` if the store's username constraint rejects the insert
    /// - `Password` / `Store` for faults
    pub async fn register(&self, registration: Registration) -> Result<User, CredentialError> {
        if let Some(fields) = registration.missing_fields() {
            return Err(CredentialError::MissingField(fields));
        }

        let raw = registration.password.clone();
        let password_hash = blocking(move || password::hash_password(&raw)).await?;

        let username = registration.username.clone();
        let result = self
            .users
            .insert_user(CreateUser {
                name: registration.name,
                username: registration.username,
                password_hash,
            })
            .await;

        match result {
            Ok(user) => {
                info!(user_id = user.user_id, username = %user.username, "User registered");
                Ok(user)
            }
            Err(e) if e.is_unique_violation_on(USERNAME_CONSTRAINT) => {
                Err(CredentialError::DuplicateUsername(username))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Checks a username/password pair and returns the matching user
    ///
    /// # Errors
    ///
    /// `InvalidCredentials` if the username is unknown or the password is
    /// wrong; the two cases are indistinguishable to the caller.
    pub async fn verify(&self, username: &str, password: &str) -> Result<User, CredentialError> {
        let found = self.users.find_user_by_username(username).await?;

        let stored_hash = match &found {
            Some(user) => user.password_hash.clone(),
            None => DUMMY_HASH.to_string(),
        };
        let candidate = password.to_string();
        let matches =
            blocking(move || password::verify_password(&candidate, &stored_hash)).await?;

        let Some(user) = found else {
            debug!(username, "Login attempt for unknown username");
            return Err(CredentialError::InvalidCredentials);
        };

        if !matches {
            debug!(user_id = user.user_id, "Login attempt with wrong password");
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Looks up a user's display record
    pub async fn find_user(&self, user_id: UserId) -> Result<Option<User>, CredentialError> {
        Ok(self.users.find_user_by_id(user_id).await?)
    }
}

/// Runs CPU-bound password work off the async worker threads
async fn blocking<T, F>(work: F) -> Result<T, CredentialError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PasswordError::HashError(format!("Password task failed: {}", e)))?;

    Ok(result?)
}
