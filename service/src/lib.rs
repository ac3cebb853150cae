use cache::{CacheStore, InMemoryCache, RedisCache};
use config::Config;
use events::EventPublisher;
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;

pub mod config;
pub mod logging;

pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    info!(
        "Database pool config: max_connections={}, min_connections={}, \
         connect_timeout={}s, acquire_timeout={}s, idle_timeout={}s, max_lifetime={}s",
        config.db_max_connections,
        config.db_min_connections,
        config.db_connect_timeout_secs,
        config.db_acquire_timeout_secs,
        config.db_idle_timeout_secs,
        config.db_max_lifetime_secs,
    );

    let mut opt = ConnectOptions::new::<&str>(config.database_url());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Info)
        .set_schema_search_path("social_platform"); // Setting default PostgreSQL schema

    let db = Database::connect(opt).await?;

    Ok(db)
}

/// Build the cache backend: Redis when configured, otherwise an in-process
/// map. The cache is advisory, so the fallback changes warmth, not behavior.
pub fn init_cache(config: &Config) -> Result<Arc<dyn CacheStore>, cache::Error> {
    match config.redis_url() {
        Some(url) => {
            info!("Using Redis cache backend");
            Ok(Arc::new(RedisCache::new(&url)?))
        }
        None => {
            info!("No REDIS_URL configured, using in-process cache backend");
            Ok(Arc::new(InMemoryCache::new()))
        }
    }
}

// Service-level state shared by the request handlers and the realtime layer.
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
    pub cache_store: Arc<dyn CacheStore>,
    pub sse_manager: Arc<sse::Manager>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(
        app_config: Config,
        db: &Arc<DatabaseConnection>,
        cache_store: Arc<dyn CacheStore>,
        sse_manager: Arc<sse::Manager>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            database_connection: Arc::clone(db),
            config: app_config,
            cache_store,
            sse_manager,
            event_publisher,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }

    pub fn cache_ref(&self) -> &dyn CacheStore {
        self.cache_store.as_ref()
    }
}
