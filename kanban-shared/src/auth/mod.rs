/// Authentication: credentials and sessions
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`credentials`]: Registration and username/password checks
/// - [`jwt`]: Signed session tokens
/// - [`session`]: Live-session registry mapping tokens to users
///
/// # Example
///
/// ```no_run
/// use kanban_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod credentials;
pub mod jwt;
pub mod password;
pub mod session;
