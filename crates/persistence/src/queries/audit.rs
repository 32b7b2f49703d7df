// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event query operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{AuditEventRow, audit_event_from_row};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use cartkeep_audit::AuditEvent;
use cartkeep_domain::{ClientId, UserId};

/// Returns the ordered audit event timeline for a `(client, user)` pair.
///
/// Events are ordered by event ID, which matches insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored event cannot be
/// deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    client_id: &ClientId,
    user_id: &UserId,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::client_id.eq(client_id.value()))
        .filter(audit_events::user_id.eq(user_id.value()))
        .order(audit_events::event_id.asc())
        .load::<AuditEventRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("get_audit_timeline: {e}")))?;

    rows.iter().map(audit_event_from_row).collect()
}

/// Returns a specific audit event by its ID.
///
/// # Errors
///
/// Returns `EventNotFound` if no event with this ID exists.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: Option<AuditEventRow> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .first::<AuditEventRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_audit_event: {e}")))?;

    let Some(row) = row else {
        return Err(PersistenceError::EventNotFound(event_id));
    };

    audit_event_from_row(&row)
}
