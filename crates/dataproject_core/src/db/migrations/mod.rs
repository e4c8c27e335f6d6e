//! Schema history of the project database.
//!
//! - v1 `data_projects`: one row per project, remote coordinates
//!   (`gitlab_group`, `gitlab_project`, `gitlab_id`) fixed at creation.
//! - v2 `data_project_experiments`: ordered experiment ids, removed with
//!   their project through `ON DELETE CASCADE`.
//!
//! Steps only ever append; a shipped step is never edited.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "data_projects",
        sql: include_str!("0001_data_projects.sql"),
    },
    Migration {
        version: 2,
        name: "experiments",
        sql: include_str!("0002_experiments.sql"),
    },
];

/// Returns the schema version a fresh database ends up at.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Versions that `apply_migrations` would run on a database at `current`.
pub fn pending_versions(current: u32) -> Vec<u32> {
    pending(current).map(|migration| migration.version).collect()
}

fn pending(current: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > current)
}

/// Brings the connection up to `latest_version()` in one transaction.
///
/// A failing step leaves the database at its previous version.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    if from_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in pending(from_version) {
        tx.execute_batch(migration.sql)
            .and_then(|()| {
                tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))
            })
            .map_err(|source| DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, latest
    );
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
