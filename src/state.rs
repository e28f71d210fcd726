use deadpool_postgres::Pool;
use crate::config::Config;
use crate::error::Result;

/// The application's state. Handlers receive it through axum's `State`
/// extractor; nothing in the system reaches for module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The application's configuration.
    pub config: Config,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

        crate::db::init_schema(&db).await?;

        Ok(AppState {
            db,
            config: config.clone(),
        })
    }
}
