use deadpool_postgres::Pool;
use tokio_postgres::Row;
use crate::{
    error::{AppError, Result},
    models::catalog::CareerStatus,
    models::user::{Role, User},
};

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    let role: String = row
        .try_get("role")
        .map_err(|_| AppError::Internal("users row missing role".to_string()))?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        hashed_password: row.try_get("hashed_password")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        role: Role::parse(&role)?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Creates a new user in the database.
pub async fn create_user(
    pool: &Pool,
    email: &str,
    hashed_password: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
) -> Result<User> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO users (email, hashed_password, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[&email, &hashed_password, &first_name, &last_name, &role.as_str()],
        )
        .await?;
    row_to_user(&row)
}

/// Finds an active user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM users
            WHERE email = $1 AND is_active = true
            "#,
            &[&email],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &Pool, user_id: i32) -> Result<Option<User>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT *
            FROM users
            WHERE id = $1
            "#,
            &[&user_id],
        )
        .await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Lists all users, newest first.
pub async fn list_users(pool: &Pool) -> Result<Vec<User>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT *
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
            &[],
        )
        .await?;
    rows.iter().map(row_to_user).collect()
}

/// Updates a user's profile fields and role.
pub async fn update_user(
    pool: &Pool,
    user_id: i32,
    email: &str,
    first_name: &str,
    last_name: &str,
    role: Role,
) -> Result<u64> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            r#"
            UPDATE users
            SET email = $1, first_name = $2, last_name = $3, role = $4
            WHERE id = $5
            "#,
            &[&email, &first_name, &last_name, &role.as_str(), &user_id],
        )
        .await?;
    Ok(updated)
}

/// Deletes a user. Deleting an absent id is not an error.
pub async fn delete_user(pool: &Pool, user_id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute("DELETE FROM users WHERE id = $1", &[&user_id])
        .await?;
    Ok(())
}

/// Returns the skill ids a user has declared.
pub async fn skill_ids_for_user(pool: &Pool, user_id: i32) -> Result<Vec<i32>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT skill_id
            FROM user_skills
            WHERE user_id = $1
            ORDER BY skill_id
            "#,
            &[&user_id],
        )
        .await?;
    rows.iter().map(|r| r.try_get(0).map_err(AppError::from)).collect()
}

/// Replaces a user's declared skill set wholesale.
///
/// Delete-then-reinsert inside one transaction: readers never observe a
/// superset of old + new. Concurrent edits of the same user's set are
/// last-writer-wins.
pub async fn replace_skills(pool: &Pool, user_id: i32, skill_ids: &[i32]) -> Result<()> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    tx.execute("DELETE FROM user_skills WHERE user_id = $1", &[&user_id])
        .await?;

    let insert = tx
        .prepare("INSERT INTO user_skills (user_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .await?;
    for skill_id in skill_ids {
        tx.execute(&insert, &[&user_id, skill_id]).await?;
    }

    tx.commit().await?;
    Ok(())
}

/// One career enrollment as submitted by the admin edit form.
pub struct CareerEnrollment {
    pub career_id: i32,
    pub status: CareerStatus,
}

/// Replaces a user's career enrollments wholesale, same contract as
/// [`replace_skills`].
pub async fn replace_careers(
    pool: &Pool,
    user_id: i32,
    enrollments: &[CareerEnrollment],
) -> Result<()> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    tx.execute("DELETE FROM user_careers WHERE user_id = $1", &[&user_id])
        .await?;

    let insert = tx
        .prepare(
            r#"
            INSERT INTO user_careers (user_id, career_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, career_id) DO UPDATE SET status = EXCLUDED.status
            "#,
        )
        .await?;
    for enrollment in enrollments {
        tx.execute(
            &insert,
            &[&user_id, &enrollment.career_id, &enrollment.status.as_str()],
        )
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
