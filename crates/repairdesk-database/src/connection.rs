//! Store construction: a PostgreSQL pool or the in-memory store,
//! selected by `database.backend`.

use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use repairdesk_core::config::{DatabaseBackend, DatabaseConfig};
use repairdesk_core::error::{AppError, ErrorKind};

use crate::memory::MemoryStore;
use crate::repositories::{
    NotificationRepository, OrderRepository, RolePermissionRepository, UserRepository,
};
use crate::store::{NotificationStore, OrderStore, RolePermissionStore, UserStore};

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to connect to database", e)
            })?;

        Ok(Self { pool })
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// One handle per store trait, shared by every service.
#[derive(Debug, Clone)]
pub struct Stores {
    pub orders: Arc<dyn OrderStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub users: Arc<dyn UserStore>,
    pub role_permissions: Arc<dyn RolePermissionStore>,
}

impl Stores {
    /// Repositories over a live PostgreSQL pool.
    pub fn postgres(pool: &DatabasePool) -> Self {
        let pool = pool.pool().clone();
        Self {
            orders: Arc::new(OrderRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            role_permissions: Arc::new(RolePermissionRepository::new(pool)),
        }
    }

    /// All four traits served by one shared in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            orders: store.clone(),
            notifications: store.clone(),
            users: store.clone(),
            role_permissions: store,
        }
    }

    /// Build the configured backend. PostgreSQL is migrated before use.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, AppError> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                crate::migration::run_migrations(&pool).await?;
                Ok(Self::postgres(&pool))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Self::memory(Arc::new(MemoryStore::new())))
            }
        }
    }
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    match url.rfind('@') {
        Some(at) if at > scheme_end => match url[scheme_end..at].find(':') {
            Some(rel) => {
                let colon = scheme_end + rel;
                format!("{}:****@{}", &url[..colon], &url[at + 1..])
            }
            None => url.to_string(),
        },
        _ => url.to_string(),
    }
}
