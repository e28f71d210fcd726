use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::user::UserSnapshot,
    repositories::catalog as catalog_repo,
    services::affinity as affinity_service,
    state::AppState,
};

/// How well the current user's skills match each outcome cohort of a career.
#[axum::debug_handler]
pub async fn skill_affinity(
    State(state): State<AppState>,
    Extension(snapshot): Extension<UserSnapshot>,
    Path(career_id): Path<i32>,
) -> Result<Response> {
    let cohorts =
        affinity_service::compare_user_skills(&state.db, snapshot.id, career_id).await?;

    let cohorts_json: Vec<_> = cohorts
        .into_iter()
        .map(|c| {
            let distribution: Vec<_> = c
                .distribution
                .iter()
                .map(|s| {
                    sonic_rs::json!({
                        "skill_id": s.skill_id,
                        "skill_name": s.skill_name,
                        "raw_count": s.raw_count,
                        "weighted_count": s.weighted_count,
                    })
                })
                .collect();
            sonic_rs::json!({
                "status": c.status.as_str(),
                "students": c.students,
                "distribution": distribution,
                "affinity_percentage": c.affinity_percentage,
            })
        })
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "career_id": career_id,
        "user_id": snapshot.id,
        "cohorts": cohorts_json,
    }))
    .unwrap_or_else(|_| "{}".to_string());

    Ok((StatusCode::OK, body).into_response())
}

/// The careers available on the public comparison page.
#[axum::debug_handler]
pub async fn list_careers(State(state): State<AppState>) -> Result<Response> {
    let careers = catalog_repo::list_careers(&state.db).await?;
    let careers_json: Vec<_> = careers
        .into_iter()
        .map(|c| sonic_rs::json!({ "id": c.id, "name": c.name }))
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({ "careers": careers_json }))
        .unwrap_or_else(|_| "{}".to_string());
    Ok((StatusCode::OK, body).into_response())
}

/// The form payload for comparing two careers.
#[derive(Deserialize, Debug)]
pub struct CompareCareersForm {
    pub career_id_1: i32,
    pub career_id_2: i32,
}

/// Compares two careers side by side, including per-status student counts.
#[axum::debug_handler]
pub async fn compare_careers(
    State(state): State<AppState>,
    Form(form): Form<CompareCareersForm>,
) -> Result<Response> {
    let left = affinity_service::career_summary(&state.db, form.career_id_1).await?;
    let right = affinity_service::career_summary(&state.db, form.career_id_2).await?;

    let students: Vec<_> = left
        .students
        .iter()
        .zip(right.students.iter())
        .map(|((status, l), (_, r))| {
            sonic_rs::json!({
                "status": status.as_str(),
                "left": l,
                "difference": l - r,
                "right": r,
            })
        })
        .collect();

    let body = sonic_rs::to_string(&sonic_rs::json!({
        "name": { "left": left.name, "right": right.name },
        "faculty": { "left": left.faculty, "right": right.faculty },
        "description": { "left": left.description, "right": right.description },
        "semesters": {
            "left": left.semesters,
            "difference": left.semesters - right.semesters,
            "right": right.semesters,
        },
        "credits": {
            "left": left.credits,
            "difference": left.credits - right.credits,
            "right": right.credits,
        },
        "students": students,
    }))
    .unwrap_or_else(|_| "{}".to_string());

    Ok((StatusCode::OK, body).into_response())
}
