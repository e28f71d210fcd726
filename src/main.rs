use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crafters::config::Config;
use crafters::state::AppState;
use crafters::{handlers, middleware_layer, services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    services::auth::seed_admin(&state.db, &state.config.admin_password).await?;

    let public_routes = Router::new()
        .route("/users/", get(handlers::auth::index))
        .route(
            "/users/sign-up",
            get(handlers::auth::sign_up_page).post(handlers::auth::sign_up),
        )
        .route(
            "/users/log-in",
            get(handlers::auth::log_in_page).post(handlers::auth::log_in),
        )
        .route(
            "/public/compare-careers",
            get(handlers::affinity::list_careers).post(handlers::affinity::compare_careers),
        )
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users/log-out", post(handlers::auth::log_out))
        .route(
            "/careers/{career_id}/affinity",
            get(handlers::affinity::skill_affinity),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/admin/", get(handlers::admin::welcome))
        .route(
            "/admin/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route("/admin/users/{user_id}", post(handlers::admin::edit_user))
        .route(
            "/admin/users/{user_id}/delete",
            post(handlers::admin::delete_user),
        )
        .route(
            "/admin/users/{user_id}/skills",
            post(handlers::admin::replace_user_skills),
        )
        .route(
            "/admin/users/{user_id}/careers",
            post(handlers::admin::replace_user_careers),
        )
        .route(
            "/admin/faculties",
            get(handlers::admin::list_faculties).post(handlers::admin::create_faculty),
        )
        .route(
            "/admin/faculties/{faculty_id}",
            post(handlers::admin::edit_faculty),
        )
        .route(
            "/admin/faculties/{faculty_id}/delete",
            post(handlers::admin::delete_faculty),
        )
        .route(
            "/admin/careers",
            get(handlers::admin::list_careers).post(handlers::admin::create_career),
        )
        .route(
            "/admin/careers/{career_id}",
            post(handlers::admin::edit_career),
        )
        .route(
            "/admin/careers/{career_id}/delete",
            post(handlers::admin::delete_career),
        )
        .route(
            "/admin/skills",
            get(handlers::admin::list_skills).post(handlers::admin::create_skill),
        )
        .route(
            "/admin/skills/{skill_id}",
            post(handlers::admin::edit_skill),
        )
        .route(
            "/admin/skills/{skill_id}/delete",
            post(handlers::admin::delete_skill),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new());

    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
