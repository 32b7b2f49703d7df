// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the cartkeep back office.
//!
//! This crate provides database persistence for cart records, their
//! line items, and the audit events produced by lifecycle transitions.
//! It is built on Diesel over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is the only backend:
//! - In-memory databases back unit and integration tests (fast,
//!   deterministic, no external infrastructure)
//! - File-backed databases (with WAL enabled) back deployments
//!
//! ## Write discipline
//!
//! Every state change goes through [`Persistence::persist_transition`],
//! which writes the audit event and the canonical table changes in one
//! transaction. A restore is therefore atomic: no reader ever observes
//! a `(client, user)` pair with two active carts or none where one is
//! expected.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use cartkeep::{State, TransitionResult};
use cartkeep_audit::AuditEvent;
use cartkeep_domain::{CartId, CartRecord, ClientId, UserId};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for cart records and audit events.
///
/// Backend selection happens once at construction time; all public
/// methods are backend-agnostic from the caller's point of view.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation without
    /// time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_carts_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter backed by a database file,
    /// with WAL mode enabled.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let mut conn: SqliteConnection = sqlite::initialize_database(path)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Persists a transition result: the audit event plus the canonical
    /// cart table changes, in one transaction.
    ///
    /// `ImportCart` inserts the newly admitted cart incrementally;
    /// `RestoreCart` applies the archive-pair-then-activate-target
    /// update.
    ///
    /// # Arguments
    ///
    /// * `result` - The transition result to persist
    ///
    /// # Returns
    ///
    /// The event ID assigned to the persisted audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; the transaction rolls
    /// back and the store is left unchanged.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<i64, PersistenceError> {
        let event_id: i64 = self.conn.transaction::<i64, PersistenceError, _>(|conn| {
            let event_id: i64 = mutations::insert_audit_event(conn, &result.audit_event)?;
            debug!(event_id, "Persisted audit event");

            match result.audit_event.action.name.as_str() {
                "ImportCart" => {
                    // The admitted cart is the one the transition appended.
                    let cart: &CartRecord = result.new_state.carts.last().ok_or_else(|| {
                        PersistenceError::ReconstructionError(String::from(
                            "ImportCart transition carries no carts",
                        ))
                    })?;
                    mutations::insert_cart(conn, cart)?;
                }
                "RestoreCart" => {
                    let target: &CartRecord =
                        result.new_state.active_cart().ok_or_else(|| {
                            PersistenceError::ReconstructionError(String::from(
                                "RestoreCart transition has no active cart",
                            ))
                        })?;
                    mutations::apply_restore(
                        conn,
                        &result.new_state.client_id,
                        &result.new_state.user_id,
                        target,
                    )?;
                }
                _ => {
                    // Unknown actions persist their audit event only.
                }
            }

            Ok(event_id)
        })?;

        info!(
            event_id,
            action = %result.audit_event.action.name,
            client_id = result.new_state.client_id.value(),
            user_id = result.new_state.user_id.value(),
            "Persisted transition"
        );

        Ok(event_id)
    }

    /// Fetches a single cart record by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; an unknown identifier
    /// yields `Ok(None)`.
    pub fn get_cart(&mut self, cart_id: &CartId) -> Result<Option<CartRecord>, PersistenceError> {
        queries::get_cart(&mut self.conn, cart_id)
    }

    /// Lists all cart records for a client, optionally narrowed to one
    /// user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. An unknown client yields an
    /// empty list.
    pub fn list_carts(
        &mut self,
        client_id: &ClientId,
        user_id: Option<&UserId>,
    ) -> Result<Vec<CartRecord>, PersistenceError> {
        queries::list_carts(&mut self.conn, client_id, user_id)
    }

    /// Loads the scoped state for a `(client, user)` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. A pair with no carts yields
    /// an empty state.
    pub fn load_state(
        &mut self,
        client_id: &ClientId,
        user_id: &UserId,
    ) -> Result<State, PersistenceError> {
        let carts: Vec<CartRecord> =
            queries::list_carts(&mut self.conn, client_id, Some(user_id))?;
        Ok(State {
            client_id: client_id.clone(),
            user_id: user_id.clone(),
            carts,
        })
    }

    /// Returns the ordered audit event timeline for a `(client, user)`
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_timeline(
        &mut self,
        client_id: &ClientId,
        user_id: &UserId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::get_audit_timeline(&mut self.conn, client_id, user_id)
    }

    /// Returns a specific audit event by its ID.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no event with this ID exists.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::get_audit_event(&mut self.conn, event_id)
    }
}
