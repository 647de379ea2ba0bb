use crate::error::{AppError, Result};
use crate::models::user::{NewUser, User};
use crate::repositories::UserRepository;
use crate::validation::auth::{Credentials, Registration};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// Verified in place of a real hash when the username is unknown, so a
/// missing user costs the same Argon2 work as a wrong password. Same
/// parameters as `hash_password`; it matches no password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=3,p=6$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the PHC-encoded hash.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.try_fill_bytes(&mut salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to generate salt: {}", e)))?;

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Hashing(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Hashing(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Hashing(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a hash.
///
/// Parameters are read from the hash itself; the final comparison inside
/// `argon2` is constant time.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Hashing(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(result)
}

/// Runs `hash_password` on the blocking pool.
async fn hash_password_blocking(password: Zeroizing<String>) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
}

/// Runs `verify_password` on the blocking pool.
async fn verify_password_blocking(password: Zeroizing<String>, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
}

/// Registers a new user.
///
/// # Returns
///
/// The stored `User`, or `AppError::DuplicateUser` when the username is
/// taken. The existing record is never modified.
pub async fn register(users: &dyn UserRepository, registration: Registration) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", registration.username);

    let password_hash = hash_password_blocking(registration.password).await?;

    let user = users
        .insert(NewUser {
            username: registration.username,
            password_hash,
            email: registration.email,
            first_name: registration.first_name,
            last_name: registration.last_name,
        })
        .await?;

    tracing::info!("✅ User created: {}", user.username);
    Ok(user)
}

/// Authenticates a user.
///
/// Returns `None` both for an unknown username and for a wrong password;
/// each path performs exactly one Argon2 verification.
pub async fn authenticate(users: &dyn UserRepository, credentials: Credentials) -> Result<Option<User>> {
    tracing::debug!("🔐 Authenticating user: {}", credentials.username);

    let user = users.find_by_username(&credentials.username).await?;
    let hash = user
        .as_ref()
        .map(|u| u.password_hash.clone())
        .unwrap_or_else(|| DUMMY_HASH.to_string());

    let valid = verify_password_blocking(credentials.password, hash).await?;

    match user {
        Some(user) if valid => {
            tracing::info!("✅ User authenticated: {}", user.username);
            Ok(Some(user))
        }
        _ => {
            tracing::warn!("❌ Failed login for: {}", credentials.username);
            Ok(None)
        }
    }
}
