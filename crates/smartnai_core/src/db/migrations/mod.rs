//! Versioned schema steps for the snapshot store.
//!
//! Each step is an SQL file tagged with the `user_version` it leaves behind.
//! Pending steps run inside one transaction, so a failing step leaves the
//! file at its previous version.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// `(user_version, sql)` pairs in ascending version order.
const SCHEMA_STEPS: &[(u32, &str)] = &[(1, include_str!("0001_snapshots.sql"))];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` for files written by a newer build.
/// - `DbError::Sqlite` when a step fails; no step of the batch is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let to = latest_version();
    if from > to {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: to,
        });
    }

    let mut pending = SCHEMA_STEPS
        .iter()
        .filter(|(version, _)| *version > from)
        .peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        run_step(&tx, *version, sql)?;
    }
    tx.commit()?;
    info!("event=db_migrate module=db status=ok from_version={from} to_version={to}");
    Ok(())
}

fn run_step(tx: &Transaction<'_>, version: u32, sql: &str) -> DbResult<()> {
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    debug!("event=db_migrate_step module=db status=ok version={version}");
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

#[cfg(test)]
mod tests {
    use super::{latest_version, SCHEMA_STEPS};

    #[test]
    fn schema_steps_start_at_one_and_ascend() {
        assert_eq!(SCHEMA_STEPS.first().map(|(version, _)| *version), Some(1));
        assert!(SCHEMA_STEPS.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert_eq!(latest_version(), SCHEMA_STEPS.len() as u32);
    }
}
