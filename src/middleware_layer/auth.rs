use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    crypto::token,
    error::AppError,
    flash,
    state::AppState,
};

/// Name of the cookie holding the signed access token.
pub const TOKEN_COOKIE: &str = "access_token";

/// Extracts the access token from the request cookies.
fn extract_token(cookies: &Cookies) -> Option<String> {
    cookies.get(TOKEN_COOKIE).map(|cookie| cookie.value().to_string())
}

/// A middleware that requires a valid access token to be present.
///
/// On success the identity snapshot is inserted into the request extensions
/// for handlers to pick up. On any failure the caller is redirected to the
/// login page with a one-shot flash message; whether the token was missing,
/// expired, or tampered with is never exposed to the client.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an `AppError` applied at the boundary.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let Some(token_value) = extract_token(&cookies) else {
        tracing::warn!("❌ No access_token cookie found");
        flash::set_flash(&cookies, "Please log in first.");
        return Err(AppError::Unauthenticated("access token not found".to_string()));
    };

    let snapshot = match token::parse(&token_value, &state.config.token_secret) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("❌ Token rejected: {}", e);
            flash::set_flash(&cookies, "Invalid token.");
            return Err(AppError::Unauthenticated(e.to_string()));
        }
    };

    tracing::debug!("✅ User authenticated: {}", snapshot.id);

    request.extensions_mut().insert(snapshot);

    Ok(next.run(request).await)
}
