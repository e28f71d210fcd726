use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::catalog::CareerStatus,
    models::user::{Role, UserSnapshot, require_role},
    repositories::catalog as catalog_repo,
    repositories::user as user_repo,
    services::auth as auth_service,
    state::AppState,
    validation::auth::*,
};

/// 303 to an admin listing page, used after edits and deletes.
fn back_to(listing: &str) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, listing.to_string())],
    )
        .into_response()
}

/// The admin landing page data.
#[axum::debug_handler]
pub async fn welcome(Extension(snapshot): Extension<UserSnapshot>) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "role": snapshot.role.as_str(),
    }))
    .unwrap_or_else(|_| "{}".to_string());

    Ok((StatusCode::OK, body).into_response())
}

// Users

#[derive(Deserialize, Debug)]
pub struct UpsertUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Required on create, ignored on edit.
    pub password: Option<String>,
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    let users = user_repo::list_users(&state.db).await?;
    let users_json: Vec<_> = users
        .into_iter()
        .map(|u| {
            sonic_rs::json!({
                "id": u.id,
                "email": u.email,
                "first_name": u.first_name,
                "last_name": u.last_name,
                "role": u.role.as_str(),
                "is_active": u.is_active,
                "created_at": u.created_at.to_rfc3339(),
            })
        })
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "users": users_json,
        "count": users_json.len(),
    }))
    .unwrap_or_else(|_| "{}".to_string());

    Ok((StatusCode::OK, body).into_response())
}

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Json(req): Json<UpsertUserRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    validate_email(&req.email)?;
    validate_name("First name", &req.first_name)?;
    validate_name("Last name", &req.last_name)?;

    let password = req
        .password
        .as_deref()
        .ok_or_else(|| AppError::Validation("Password is required".to_string()))?;
    validate_password(password)?;

    let user = auth_service::sign_up(
        &state.db,
        req.email.trim(),
        password,
        &req.first_name,
        &req.last_name,
    )
    .await?;

    // sign_up always creates plain users; promote if the form asked for it.
    if req.role == Role::Admin {
        user_repo::update_user(
            &state.db,
            user.id,
            &user.email,
            &user.first_name,
            &user.last_name,
            Role::Admin,
        )
        .await?;
    }

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "id": user.id,
        "message": "User created successfully",
    }))
    .unwrap_or_else(|_| "{}".to_string());

    Ok((StatusCode::CREATED, body).into_response())
}

#[axum::debug_handler]
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(user_id): Path<i32>,
    Json(req): Json<UpsertUserRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    validate_email(&req.email)?;
    validate_name("First name", &req.first_name)?;
    validate_name("Last name", &req.last_name)?;

    // Editing an absent id falls through to the listing, same as delete.
    user_repo::update_user(
        &state.db,
        user_id,
        req.email.trim(),
        &req.first_name,
        &req.last_name,
        req.role,
    )
    .await?;

    Ok(back_to("/admin/users"))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(user_id): Path<i32>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    user_repo::delete_user(&state.db, user_id).await?;
    Ok(back_to("/admin/users"))
}

#[derive(Deserialize, Debug)]
pub struct ReplaceSkillsRequest {
    pub skill_ids: Vec<i32>,
}

/// Replaces a user's declared skill set in one transaction.
#[axum::debug_handler]
pub async fn replace_user_skills(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(user_id): Path<i32>,
    Json(req): Json<ReplaceSkillsRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    user_repo::replace_skills(&state.db, user_id, &req.skill_ids).await?;
    tracing::info!("✅ Replaced skill set for user: {}", user_id);

    Ok(back_to("/admin/users"))
}

#[derive(Deserialize, Debug)]
pub struct EnrollmentRequest {
    pub career_id: i32,
    pub status: String,
}

#[derive(Deserialize, Debug)]
pub struct ReplaceCareersRequest {
    pub careers: Vec<EnrollmentRequest>,
}

/// Replaces a user's career enrollments in one transaction.
#[axum::debug_handler]
pub async fn replace_user_careers(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(user_id): Path<i32>,
    Json(req): Json<ReplaceCareersRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let enrollments = req
        .careers
        .iter()
        .map(|e| {
            Ok(user_repo::CareerEnrollment {
                career_id: e.career_id,
                status: CareerStatus::parse(&e.status)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    user_repo::replace_careers(&state.db, user_id, &enrollments).await?;
    tracing::info!("✅ Replaced career enrollments for user: {}", user_id);

    Ok(back_to("/admin/users"))
}

// Faculties

#[derive(Deserialize, Debug)]
pub struct UpsertFacultyRequest {
    pub name: String,
}

#[axum::debug_handler]
pub async fn list_faculties(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    let faculties = catalog_repo::list_faculties(&state.db).await?;
    let faculties_json: Vec<_> = faculties
        .into_iter()
        .map(|f| sonic_rs::json!({ "id": f.id, "name": f.name }))
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({ "faculties": faculties_json }))
        .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::OK, body).into_response())
}

#[axum::debug_handler]
pub async fn create_faculty(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Json(req): Json<UpsertFacultyRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    validate_name("Faculty name", &req.name)?;

    let faculty = catalog_repo::create_faculty(&state.db, req.name.trim()).await?;

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "id": faculty.id,
        "message": "Faculty created successfully",
    }))
    .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::CREATED, body).into_response())
}

#[axum::debug_handler]
pub async fn edit_faculty(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(faculty_id): Path<i32>,
    Json(req): Json<UpsertFacultyRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    validate_name("Faculty name", &req.name)?;

    catalog_repo::update_faculty(&state.db, faculty_id, req.name.trim()).await?;
    Ok(back_to("/admin/faculties"))
}

#[axum::debug_handler]
pub async fn delete_faculty(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(faculty_id): Path<i32>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    catalog_repo::delete_faculty(&state.db, faculty_id).await?;
    Ok(back_to("/admin/faculties"))
}

// Careers

#[derive(Deserialize, Debug)]
pub struct UpsertCareerRequest {
    pub name: String,
    pub description: Option<String>,
    pub semesters: i32,
    pub credits: i32,
    pub faculty_id: i32,
}

fn validate_career(req: &UpsertCareerRequest) -> Result<()> {
    validate_name("Career name", &req.name)?;
    if req.semesters < 0 || req.credits < 0 {
        return Err(AppError::Validation(
            "Semesters and credits cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn list_careers(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    let careers = catalog_repo::list_careers(&state.db).await?;
    let careers_json: Vec<_> = careers
        .into_iter()
        .map(|c| {
            sonic_rs::json!({
                "id": c.id,
                "name": c.name,
                "description": c.description,
                "semesters": c.semesters,
                "credits": c.credits,
                "faculty_id": c.faculty_id,
            })
        })
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({ "careers": careers_json }))
        .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::OK, body).into_response())
}

#[axum::debug_handler]
pub async fn create_career(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Json(req): Json<UpsertCareerRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    validate_career(&req)?;

    catalog_repo::find_faculty(&state.db, req.faculty_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let career = catalog_repo::create_career(
        &state.db,
        req.name.trim(),
        req.description.as_deref(),
        req.semesters,
        req.credits,
        req.faculty_id,
    )
    .await?;

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "id": career.id,
        "message": "Career created successfully",
    }))
    .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::CREATED, body).into_response())
}

#[axum::debug_handler]
pub async fn edit_career(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(career_id): Path<i32>,
    Json(req): Json<UpsertCareerRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    validate_career(&req)?;

    catalog_repo::find_faculty(&state.db, req.faculty_id)
        .await?
        .ok_or(AppError::NotFound)?;

    catalog_repo::update_career(
        &state.db,
        career_id,
        req.name.trim(),
        req.description.as_deref(),
        req.semesters,
        req.credits,
        req.faculty_id,
    )
    .await?;

    Ok(back_to("/admin/careers"))
}

#[axum::debug_handler]
pub async fn delete_career(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(career_id): Path<i32>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    catalog_repo::delete_career(&state.db, career_id).await?;
    Ok(back_to("/admin/careers"))
}

// Skills

#[derive(Deserialize, Debug)]
pub struct UpsertSkillRequest {
    pub name: String,
}

#[axum::debug_handler]
pub async fn list_skills(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;

    let skills = catalog_repo::list_skills(&state.db).await?;
    let skills_json: Vec<_> = skills
        .into_iter()
        .map(|s| sonic_rs::json!({ "id": s.id, "name": s.name }))
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({ "skills": skills_json }))
        .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::OK, body).into_response())
}

#[axum::debug_handler]
pub async fn create_skill(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Json(req): Json<UpsertSkillRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    let name = validate_skill_name(&req.name)?;

    let skill = catalog_repo::create_skill(&state.db, &name).await?;

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "id": skill.id,
        "message": "Skill created successfully",
    }))
    .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::CREATED, body).into_response())
}

#[axum::debug_handler]
pub async fn edit_skill(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(skill_id): Path<i32>,
    Json(req): Json<UpsertSkillRequest>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    let name = validate_skill_name(&req.name)?;

    catalog_repo::update_skill(&state.db, skill_id, &name).await?;
    Ok(back_to("/admin/skills"))
}

#[axum::debug_handler]
pub async fn delete_skill(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(skill_id): Path<i32>,
) -> Result<Response> {
    require_role(&snapshot, Role::Admin)?;
    catalog_repo::delete_skill(&state.db, skill_id).await?;
    Ok(back_to("/admin/skills"))
}
