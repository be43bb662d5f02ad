//! High-level database client over an async connection pool.

use std::fmt;
use std::sync::Arc;

use deadpool::managed::Pool;
use derive_more::{Deref, DerefMut};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::migrate;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CONNECTION,
};

/// Connection pool status snapshot.
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool.
    pub max_size: usize,
    /// Current number of connections in the pool.
    pub size: usize,
    /// Number of idle connections available for checkout.
    pub available: usize,
    /// Number of tasks waiting for a connection.
    pub waiting: usize,
}

/// Database client managing a connection pool and schema migrations.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new client with a connection pool.
    ///
    /// Connections are established lazily; use [`PgClient::ping`] to
    /// verify connectivity.
    pub fn new(config: PgConfig) -> PgResult<Self> {
        tracing::info!(
            target: TRACING_TARGET_CONNECTION,
            database_url = %config.database_url_masked(),
            max_connections = config.postgres_max_connections,
            "Initializing database client"
        );

        let manager = AsyncDieselConnectionManager::new(&config.postgres_url);

        let mut builder = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .runtime(deadpool::Runtime::Tokio1);

        if let Some(timeout) = config.connection_timeout() {
            builder = builder.wait_timeout(Some(timeout)).create_timeout(Some(timeout));
        }

        let pool = builder.build().map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "Failed to create connection pool"
            );
            PgError::Unexpected(format!("Failed to build connection pool: {}", e).into())
        })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Gets a connection from the pool.
    ///
    /// Waits up to the configured timeout for an available connection.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })?;

        Ok(PgConn::new(conn))
    }

    /// Gets a raw pooled connection, for internal use by migrations.
    pub(crate) async fn get_pooled_connection(&self) -> PgResult<PooledConnection> {
        self.inner.pool.get().await.map_err(PgError::from)
    }

    /// Applies all pending embedded migrations.
    pub async fn run_pending_migrations(&self) -> PgResult<Vec<String>> {
        migrate::run_pending_migrations(self).await
    }

    /// Verifies connectivity with a trivial query.
    pub async fn ping(&self) -> PgResult<()> {
        #[derive(diesel::QueryableByName)]
        struct Ping {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            #[allow(dead_code)]
            result: i32,
        }

        let mut conn = self.get_pooled_connection().await?;
        let _: Ping = diesel::sql_query("SELECT 1 as result")
            .get_result(&mut *conn)
            .await
            .map_err(PgError::from)?;

        Ok(())
    }

    /// Returns the current pool status.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Returns the configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("pool_size", &status.size)
            .field("pool_available", &status.available)
            .finish()
    }
}

/// A wrapper around a pooled database connection.
///
/// Implements the repository traits (e.g. [`ProductRepository`]) via
/// [`Deref`] to the underlying [`AsyncPgConnection`]. Dropping the
/// wrapper returns the connection to the pool.
///
/// [`ProductRepository`]: crate::query::ProductRepository
/// [`AsyncPgConnection`]: crate::PgConnection
/// [`Deref`]: std::ops::Deref
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Wraps a pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }

    /// Executes the given function within a database transaction.
    ///
    /// Commits on `Ok`, rolls back on `Err`.
    pub async fn transaction<'a, T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: for<'r> FnOnce(&'r mut PooledConnection) -> ScopedBoxFuture<'a, 'r, Result<T, E>>
            + Send
            + 'a,
        T: Send + 'a,
        E: From<diesel::result::Error> + Send + 'a,
    {
        self.conn.transaction(f).await
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
