use chirp_core::db::DbHandle;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;

/// Initiate the database connection without gating on it.
///
/// The returned handle starts in the `Connecting` state and is flipped to
/// `Ready` or `Failed` by a background task once the attempt resolves. The
/// listener starts regardless, so requests may be served while the database
/// is still unreachable; DB-backed handlers answer 503 until then.
pub fn connect_database(database_url: String) -> DbHandle {
    let handle = DbHandle::new();

    let state = handle.clone();
    tokio::spawn(async move {
        match Database::connect(&database_url).await {
            Ok(conn) => {
                if let Err(err) = Migrator::up(&conn, None).await {
                    tracing::error!("database migration failed: {err}");
                    state.set_failed(format!("migration failed: {err}")).await;

                    return;
                }

                tracing::info!("connected to database successfully");
                state.set_ready(conn).await;
            }
            Err(err) => {
                tracing::error!("database connection failed: {err}");
                state.set_failed(err.to_string()).await;
            }
        }
    });

    handle
}
