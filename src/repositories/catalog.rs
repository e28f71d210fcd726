use deadpool_postgres::Pool;
use tokio_postgres::Row;
use crate::{
    error::{AppError, Result},
    models::catalog::{Career, CareerStatus, Faculty, Skill},
};

fn row_to_faculty(row: &Row) -> Result<Faculty> {
    Ok(Faculty {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn row_to_career(row: &Row) -> Result<Career> {
    Ok(Career {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        semesters: row.try_get("semesters")?,
        credits: row.try_get("credits")?,
        faculty_id: row.try_get("faculty_id")?,
    })
}

fn row_to_skill(row: &Row) -> Result<Skill> {
    Ok(Skill {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

// Faculties

pub async fn create_faculty(pool: &Pool, name: &str) -> Result<Faculty> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            "INSERT INTO faculties (name) VALUES ($1) RETURNING *",
            &[&name],
        )
        .await?;
    row_to_faculty(&row)
}

pub async fn list_faculties(pool: &Pool) -> Result<Vec<Faculty>> {
    let client = pool.get().await?;
    let rows = client
        .query("SELECT * FROM faculties ORDER BY id", &[])
        .await?;
    rows.iter().map(row_to_faculty).collect()
}

pub async fn update_faculty(pool: &Pool, faculty_id: i32, name: &str) -> Result<u64> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            "UPDATE faculties SET name = $1 WHERE id = $2",
            &[&name, &faculty_id],
        )
        .await?;
    Ok(updated)
}

/// Deletes a faculty. Deleting an absent id is not an error.
pub async fn delete_faculty(pool: &Pool, faculty_id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute("DELETE FROM faculties WHERE id = $1", &[&faculty_id])
        .await?;
    Ok(())
}

// Careers

pub async fn create_career(
    pool: &Pool,
    name: &str,
    description: Option<&str>,
    semesters: i32,
    credits: i32,
    faculty_id: i32,
) -> Result<Career> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO careers (name, description, semesters, credits, faculty_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
            &[&name, &description, &semesters, &credits, &faculty_id],
        )
        .await?;
    row_to_career(&row)
}

pub async fn find_career(pool: &Pool, career_id: i32) -> Result<Option<Career>> {
    let client = pool.get().await?;
    let row = client
        .query_opt("SELECT * FROM careers WHERE id = $1", &[&career_id])
        .await?;
    row.map(|r| row_to_career(&r)).transpose()
}

pub async fn list_careers(pool: &Pool) -> Result<Vec<Career>> {
    let client = pool.get().await?;
    let rows = client
        .query("SELECT * FROM careers ORDER BY id", &[])
        .await?;
    rows.iter().map(row_to_career).collect()
}

pub async fn update_career(
    pool: &Pool,
    career_id: i32,
    name: &str,
    description: Option<&str>,
    semesters: i32,
    credits: i32,
    faculty_id: i32,
) -> Result<u64> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            r#"
            UPDATE careers
            SET name = $1, description = $2, semesters = $3, credits = $4, faculty_id = $5
            WHERE id = $6
            "#,
            &[&name, &description, &semesters, &credits, &faculty_id, &career_id],
        )
        .await?;
    Ok(updated)
}

/// Deletes a career. Deleting an absent id is not an error.
pub async fn delete_career(pool: &Pool, career_id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute("DELETE FROM careers WHERE id = $1", &[&career_id])
        .await?;
    Ok(())
}

pub async fn find_faculty(pool: &Pool, faculty_id: i32) -> Result<Option<Faculty>> {
    let client = pool.get().await?;
    let row = client
        .query_opt("SELECT * FROM faculties WHERE id = $1", &[&faculty_id])
        .await?;
    row.map(|r| row_to_faculty(&r)).transpose()
}

// Skills

pub async fn create_skill(pool: &Pool, name: &str) -> Result<Skill> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            INSERT INTO skills (name) VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING *
            "#,
            &[&name],
        )
        .await?
        .ok_or_else(|| AppError::Conflict("The skill is already registered.".to_string()))?;
    row_to_skill(&row)
}

pub async fn list_skills(pool: &Pool) -> Result<Vec<Skill>> {
    let client = pool.get().await?;
    let rows = client
        .query("SELECT * FROM skills ORDER BY id", &[])
        .await?;
    rows.iter().map(row_to_skill).collect()
}

pub async fn update_skill(pool: &Pool, skill_id: i32, name: &str) -> Result<u64> {
    let client = pool.get().await?;
    let updated = client
        .execute(
            "UPDATE skills SET name = $1 WHERE id = $2",
            &[&name, &skill_id],
        )
        .await?;
    Ok(updated)
}

/// Deletes a skill. Deleting an absent id is not an error.
pub async fn delete_skill(pool: &Pool, skill_id: i32) -> Result<()> {
    let client = pool.get().await?;
    client
        .execute("DELETE FROM skills WHERE id = $1", &[&skill_id])
        .await?;
    Ok(())
}

// Cohort aggregation

/// How many students a career has in the given status.
pub async fn count_students(pool: &Pool, career_id: i32, status: CareerStatus) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            SELECT COUNT(*)
            FROM user_careers
            WHERE career_id = $1 AND status = $2
            "#,
            &[&career_id, &status.as_str()],
        )
        .await?;
    Ok(row.try_get(0)?)
}

/// One skill's raw frequency within a cohort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillCount {
    pub skill_id: i32,
    pub skill_name: String,
    pub count: i64,
}

/// Counts, per skill, how many members of the (career, status) cohort hold
/// that skill. Ordered by count descending with skill id as the tie-break,
/// so repeated calls over unchanged data rank identically.
pub async fn cohort_skill_counts(
    pool: &Pool,
    career_id: i32,
    status: CareerStatus,
) -> Result<Vec<SkillCount>> {
    let client = pool.get().await?;
    let rows = client
        .query(
            r#"
            SELECT s.id AS skill_id, s.name AS skill_name, COUNT(*) AS holders
            FROM user_careers uc
            JOIN user_skills us ON us.user_id = uc.user_id
            JOIN skills s ON s.id = us.skill_id
            WHERE uc.career_id = $1 AND uc.status = $2
            GROUP BY s.id, s.name
            ORDER BY holders DESC, s.id ASC
            "#,
            &[&career_id, &status.as_str()],
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(SkillCount {
                skill_id: row.try_get("skill_id")?,
                skill_name: row.try_get("skill_name")?,
                count: row.try_get("holders")?,
            })
        })
        .collect()
}
