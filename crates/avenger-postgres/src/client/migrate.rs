//! Embedded schema migrations applied at startup.

use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

impl PgClient {
    /// Applies every pending embedded migration.
    ///
    /// Returns the versions that were applied; an up-to-date schema yields an
    /// empty list. Safe to call on every startup.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_MIGRATION)]
    pub async fn run_pending_migrations(&self) -> PgResult<Vec<String>> {
        let start = Instant::now();
        let conn = self.get_connection().await?.into_inner();
        let mut conn: AsyncConnectionWrapper<_> = conn.into();

        let versions = spawn_blocking(move || {
            conn.run_pending_migrations(MIGRATIONS).map(|versions| {
                versions
                    .into_iter()
                    .map(|version| version.to_string())
                    .collect::<Vec<_>>()
            })
        })
        .await
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %err,
                "Migration task panicked"
            );
            PgError::Migration(err.into())
        })?
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                error = %err,
                "Database migration failed"
            );
            PgError::Migration(err)
        })?;

        if versions.is_empty() {
            tracing::info!(
                target: TRACING_TARGET_MIGRATION,
                "Database schema is up to date"
            );
        } else {
            tracing::info!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?start.elapsed(),
                applied = ?versions,
                "Applied pending migrations"
            );
        }

        Ok(versions)
    }
}
