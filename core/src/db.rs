use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;

/// Observable state of the process-wide database connection.
///
/// The connection is initiated fire-and-forget at startup, so handlers and
/// health checks need a way to ask whether it ever arrived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DbStatus {
    Connecting,
    Ready,
    Failed(String),
}

enum DbState {
    Connecting,
    Ready(Arc<DatabaseConnection>),
    Failed(String),
}

/// Cheaply clonable handle to the shared database connection.
///
/// Created in the `Connecting` state; the bootstrap task flips it to `Ready`
/// or `Failed` once the connection attempt resolves. Serving never waits on
/// it.
#[derive(Clone)]
pub struct DbHandle {
    inner: Arc<RwLock<DbState>>,
}

impl Default for DbHandle {
    fn default() -> Self {
        DbHandle {
            inner: Arc::new(RwLock::new(DbState::Connecting)),
        }
    }
}

impl DbHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_ready(&self, conn: DatabaseConnection) {
        *self.inner.write().await = DbState::Ready(Arc::new(conn));
    }

    pub async fn set_failed(&self, reason: impl Into<String>) {
        *self.inner.write().await = DbState::Failed(reason.into());
    }

    pub async fn status(&self) -> DbStatus {
        match &*self.inner.read().await {
            DbState::Connecting => DbStatus::Connecting,
            DbState::Ready(_) => DbStatus::Ready,
            DbState::Failed(reason) => DbStatus::Failed(reason.clone()),
        }
    }

    /// Access the connection, or a [`DbUnavailable`] error the HTTP layer
    /// maps to `503 Service Unavailable`.
    pub async fn conn(&self) -> Result<Arc<DatabaseConnection>, DbUnavailable> {
        match &*self.inner.read().await {
            DbState::Ready(conn) => Ok(conn.clone()),
            DbState::Connecting => Err(DbUnavailable(
                "database connection still pending".to_string(),
            )),
            DbState::Failed(reason) => Err(DbUnavailable(reason.clone())),
        }
    }
}

/// The database connection is not (or no longer) usable.
#[derive(Debug, Clone)]
pub struct DbUnavailable(pub String);

impl fmt::Display for DbUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "database unavailable: {}", self.0)
    }
}

impl std::error::Error for DbUnavailable {}
