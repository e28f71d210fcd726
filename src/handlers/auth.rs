use axum::{
    Form,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies};
use tower_cookies::cookie::time::Duration;

use crate::{
    crypto::token,
    error::{AppError, HOME_PATH, Result},
    flash,
    middleware_layer::auth::TOKEN_COOKIE,
    services::auth as auth_service,
    state::AppState,
    validation::auth::*,
};

/// The form payload for user sign-up.
#[derive(Deserialize, Debug)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// The form payload for user log-in.
#[derive(Deserialize, Debug)]
pub struct LogInForm {
    pub email: String,
    pub password: String,
}

/// Creates a secure cookie with the given name, value, and max age.
fn create_secure_cookie(name: &'static str, value: String, max_age_minutes: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    let is_production = std::env::var("APP_ENV")
        .unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);
    if is_production {
        cookie.set_secure(true);
    }

    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::minutes(max_age_minutes));
    cookie.set_path("/");

    cookie
}

/// Issues a token for the user and attaches it as the access cookie, then
/// redirects. The handler is the boundary that applies the codec's
/// side-effect contract.
fn log_in_and_redirect(
    state: &AppState,
    cookies: &Cookies,
    user: &crate::models::user::User,
    location: &str,
) -> Result<Response> {
    let ttl = chrono::Duration::minutes(state.config.token_ttl_minutes);
    let token = token::issue(&user.snapshot(), ttl, &state.config.token_secret)?;

    cookies.add(create_secure_cookie(
        TOKEN_COOKIE,
        token,
        state.config.token_ttl_minutes,
    ));
    tracing::info!("✅ Access token cookie set for user: {}", user.id);

    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response())
}

/// Page data consumed by the render layer: the one-shot flash message, if
/// any. Reading it here is what clears it.
fn page_with_flash(cookies: &Cookies) -> Response {
    let body = sonic_rs::to_string(&sonic_rs::json!({
        "message": flash::take_flash(cookies),
    }))
    .unwrap_or_else(|_| "{}".to_string());

    (StatusCode::OK, body).into_response()
}

/// The landing page.
#[axum::debug_handler]
pub async fn index(cookies: Cookies) -> Response {
    page_with_flash(&cookies)
}

/// The log-in page. This is where failed auth checks redirect to, so it
/// must answer GET and surface the flash reason.
#[axum::debug_handler]
pub async fn log_in_page(cookies: Cookies) -> Response {
    page_with_flash(&cookies)
}

/// The sign-up page.
#[axum::debug_handler]
pub async fn sign_up_page(cookies: Cookies) -> Response {
    page_with_flash(&cookies)
}

/// Handles user sign-up. A successful sign-up logs the user in directly.
#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(payload): Form<SignUpForm>,
) -> Result<Response> {
    tracing::info!("📝 Sign-up attempt for: {}", payload.email);
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    validate_name("First name", &payload.first_name)?;
    validate_name("Last name", &payload.last_name)?;

    if payload.password != payload.password_confirmation {
        return Err(AppError::Validation("The passwords do not match.".to_string()));
    }

    let user = auth_service::sign_up(
        &state.db,
        payload.email.trim(),
        &payload.password,
        &payload.first_name,
        &payload.last_name,
    )
    .await?;

    tracing::info!("✅ User signed up: {}", user.id);
    log_in_and_redirect(&state, &cookies, &user, HOME_PATH)
}

/// Handles user log-in.
#[axum::debug_handler]
pub async fn log_in(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(payload): Form<LogInForm>,
) -> Result<Response> {
    tracing::info!("🔐 Log-in attempt for: {}", payload.email);
    validate_email(&payload.email)?;

    let user = auth_service::login(&state.db, payload.email.trim(), &payload.password).await?;

    tracing::info!("✅ User logged in: {}", user.id);
    log_in_and_redirect(&state, &cookies, &user, HOME_PATH)
}

/// Handles user log-out. Purely client-side: the cookie is cleared and a
/// still-circulating token stays valid until its TTL runs out. Idempotent.
#[axum::debug_handler]
pub async fn log_out(cookies: Cookies) -> Response {
    let mut token_cookie = Cookie::new(TOKEN_COOKIE, "");
    token_cookie.set_max_age(Duration::seconds(0));
    token_cookie.set_path("/");
    cookies.remove(token_cookie);

    tracing::info!("👋 User logged out");

    (
        StatusCode::FOUND,
        [(header::LOCATION, HOME_PATH.to_string())],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::util::ServiceExt;
    use tower_cookies::CookieManagerLayer;

    fn page_router() -> Router {
        Router::new()
            .route("/users/log-in", get(log_in_page))
            .route("/users/sign-up", get(sign_up_page))
            .layer(CookieManagerLayer::new())
    }

    #[tokio::test]
    async fn login_page_answers_get_and_consumes_the_flash() {
        let response = page_router()
            .oneshot(
                Request::builder()
                    .uri("/users/log-in")
                    .header(header::COOKIE, "error_message=please-log-in-first")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // Consuming the flash clears the cookie.
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("error_message="));
        assert!(set_cookie.contains("Max-Age=0"));

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "please-log-in-first");
    }

    #[tokio::test]
    async fn sign_up_page_answers_get_without_a_flash() {
        let response = page_router()
            .oneshot(
                Request::builder()
                    .uri("/users/sign-up")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].is_null());
    }
}
