//! Embedded migration execution.

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Applies all pending embedded migrations.
///
/// Diesel's migration harness is synchronous, so the pooled connection
/// is wrapped and moved onto a blocking thread for the duration.
pub(crate) async fn run_pending_migrations(pg: &PgClient) -> PgResult<Vec<String>> {
    let conn = pg.get_pooled_connection().await?;
    let mut conn: AsyncConnectionWrapper<_> = conn.into();

    let versions = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        })
    })
    .await
    .map_err(|join_error| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            error = %join_error,
            "Migration task panicked"
        );
        PgError::Unexpected(join_error.to_string().into())
    })?
    .map_err(PgError::Migration)?;

    if versions.is_empty() {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            "Database schema is already up to date"
        );
    } else {
        tracing::info!(
            target: TRACING_TARGET_MIGRATION,
            applied = versions.len(),
            versions = ?versions,
            "Applied pending database migrations"
        );
    }

    Ok(versions)
}
