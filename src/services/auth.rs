use deadpool_postgres::Pool;

use crate::crypto::password;
use crate::error::{AppError, Result};
use crate::models::user::{Role, User};
use crate::repositories::user as user_repo;

/// Email of the admin account seeded at startup.
const SEED_ADMIN_EMAIL: &str = "admin@admin.admin";

/// Creates a new user account.
///
/// # Arguments
///
/// * `pool` - The database connection pool.
/// * `email` - The user's email.
/// * `password` - The user's plaintext password.
/// * `first_name` - The user's first name.
/// * `last_name` - The user's last name.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn sign_up(
    pool: &Pool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", email);

    if user_repo::find_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict("The email is already registered.".to_string()));
    }

    let hashed_password = password::hash_password(password)?;
    let user = user_repo::create_user(
        pool,
        email,
        &hashed_password,
        first_name,
        last_name,
        Role::User,
    )
    .await
    .map_err(|e| match e {
        // The unique index is the arbiter under concurrent sign-ups; the
        // pre-check above only covers the common case.
        AppError::Database(ref db) if db.code().map(|c| c.code()) == Some("23505") => {
            AppError::Conflict("The email is already registered.".to_string())
        }
        other => other,
    })?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by email and password.
///
/// Unknown email and wrong password collapse into the same
/// `InvalidCredentials` error so the response cannot reveal which part was
/// wrong.
pub async fn login(pool: &Pool, email: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", email);

    let user = user_repo::find_by_email(pool, email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(password, &user.hashed_password)? {
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!("✅ User authenticated: {}", user.id);
    Ok(user)
}

/// Ensures the admin account exists, creating it on first startup.
pub async fn seed_admin(pool: &Pool, admin_password: &str) -> Result<()> {
    if user_repo::find_by_email(pool, SEED_ADMIN_EMAIL).await?.is_some() {
        tracing::debug!("Admin account already present");
        return Ok(());
    }

    let hashed_password = password::hash_password(admin_password)?;
    let admin = user_repo::create_user(
        pool,
        SEED_ADMIN_EMAIL,
        &hashed_password,
        "admin",
        "admin",
        Role::Admin,
    )
    .await?;

    tracing::info!("✅ Seeded admin account with ID: {}", admin.id);
    Ok(())
}
