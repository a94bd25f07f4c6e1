//! Optional database capability used by the diagnostic endpoint.
//!
//! The service has no data of its own; the database is only introspected
//! to report whether it is reachable. Its absence is a normal state.
//! Resolved once on startup from `main.rs` via [`connect`].

use std::{fmt, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, warn};

use crate::Config;

// ---

/// Longest probe error message echoed back to clients, in characters.
pub const MAX_ERROR_CHARS: usize = 50;

/// Most collection names reported by a probe.
pub const MAX_COLLECTIONS: usize = 10;

/// Minimal introspection interface a database integration must provide.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List top-level collection or table names.
    async fn list_collections(&self) -> Result<Vec<String>>;
}

/// PostgreSQL catalog over a lazily connecting pool.
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn list_collections(&self) -> Result<Vec<String>> {
        // ---
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
              FROM information_schema.tables
             WHERE table_schema = current_schema()
             ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}

/// Handle to the optional database integration.
#[derive(Clone)]
pub enum Database {
    /// No integration configured.
    Missing,
    /// Integration configured but no live handle could be built.
    Uninitialized,
    /// Live handle.
    Connected(Arc<dyn Catalog>),
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Database::Missing => f.write_str("Missing"),
            Database::Uninitialized => f.write_str("Uninitialized"),
            Database::Connected(_) => f.write_str("Connected"),
        }
    }
}

/// Resolve the database handle from configuration.
///
/// Never fails: a missing URL yields [`Database::Missing`] and a URL the
/// driver refuses yields [`Database::Uninitialized`]. The pool connects
/// lazily, so an unreachable server only shows up when probed.
pub fn connect(cfg: &Config) -> Database {
    // ---
    let Some(url) = cfg.db_url.as_deref() else {
        debug!("DATABASE_URL not set, database integration disabled");
        return Database::Missing;
    };

    match PgPoolOptions::new()
        .max_connections(cfg.db_pool_max)
        .acquire_timeout(cfg.db_probe_timeout)
        .connect_lazy(url)
    {
        Ok(pool) => {
            tracing::info!("Database pool created (lazy)");
            Database::Connected(Arc::new(PgCatalog::new(pool)))
        }
        Err(e) => {
            warn!("Failed to initialize database pool: {}", e);
            Database::Uninitialized
        }
    }
}

/// Outcome of probing the database handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    NotAvailable,
    NotInitialized,
    Working,
    ConnectedWithError(String),
    Fault(String),
}

impl fmt::Display for DatabaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseStatus::NotAvailable => f.write_str("not available"),
            DatabaseStatus::NotInitialized => f.write_str("available but not initialized"),
            DatabaseStatus::Working => f.write_str("connected & working"),
            DatabaseStatus::ConnectedWithError(msg) => write!(f, "connected but error: {msg}"),
            DatabaseStatus::Fault(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Result of [`probe`].
#[derive(Debug, Clone)]
pub struct Probe {
    pub status: DatabaseStatus,
    pub connected: bool,
    pub collections: Vec<String>,
}

/// Probe the database handle without ever failing.
///
/// The listing call runs on its own task bounded by `timeout`; a panic
/// or timeout there is reported as [`DatabaseStatus::Fault`].
pub async fn probe(db: &Database, timeout: Duration) -> Probe {
    // ---
    let catalog = match db {
        Database::Missing => return Probe::disconnected(DatabaseStatus::NotAvailable),
        Database::Uninitialized => return Probe::disconnected(DatabaseStatus::NotInitialized),
        Database::Connected(catalog) => Arc::clone(catalog),
    };

    let mut task = tokio::spawn(async move { catalog.list_collections().await });

    let outcome = tokio::time::timeout(timeout, &mut task).await;
    let (status, collections) = match outcome {
        Ok(Ok(Ok(mut names))) => {
            names.truncate(MAX_COLLECTIONS);
            (DatabaseStatus::Working, names)
        }
        Ok(Ok(Err(e))) => {
            warn!("Database introspection failed: {:#}", e);
            (
                DatabaseStatus::ConnectedWithError(truncate(&e.to_string())),
                Vec::new(),
            )
        }
        Ok(Err(join_err)) => {
            warn!("Database probe task failed: {}", join_err);
            (DatabaseStatus::Fault(truncate(&join_err.to_string())), Vec::new())
        }
        Err(_) => {
            task.abort();
            warn!("Database probe timed out after {:?}", timeout);
            let msg = format!("probe timed out after {} ms", timeout.as_millis());
            (DatabaseStatus::Fault(truncate(&msg)), Vec::new())
        }
    };

    Probe {
        status,
        connected: true,
        collections,
    }
}

impl Probe {
    fn disconnected(status: DatabaseStatus) -> Self {
        Probe {
            status,
            connected: false,
            collections: Vec::new(),
        }
    }
}

/// Cut a message to [`MAX_ERROR_CHARS`] characters.
fn truncate(msg: &str) -> String {
    msg.chars().take(MAX_ERROR_CHARS).collect()
}
