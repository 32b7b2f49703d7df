// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{NewAuditEventRow, audit_event_to_new_row};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;
use cartkeep_audit::AuditEvent;

/// Persists an audit event and returns the event ID assigned by the
/// database.
///
/// # Arguments
///
/// * `conn` - The database connection (expected to be inside a
///   transaction)
/// * `event` - The audit event to persist
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let row: NewAuditEventRow = audit_event_to_new_row(event)?;

    diesel::insert_into(audit_events::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_audit_event: {e}")))?;

    get_last_insert_rowid(conn)
}
