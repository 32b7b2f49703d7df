// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Canonical cart table mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::data_models::{CartRow, NewCartItemRow, cart_item_rows, cart_to_row};
use crate::diesel_schema::{cart_items, carts};
use crate::error::PersistenceError;
use cartkeep_domain::{CartRecord, CartStatus, ClientId, UserId};

/// Inserts a new cart record and its line items.
///
/// # Arguments
///
/// * `conn` - The database connection (expected to be inside a
///   transaction)
/// * `cart` - The cart record to insert
///
/// # Errors
///
/// Returns an error if the insert fails, including when a cart with
/// this identifier already exists.
pub fn insert_cart(conn: &mut SqliteConnection, cart: &CartRecord) -> Result<(), PersistenceError> {
    let row: CartRow = cart_to_row(cart)?;
    diesel::insert_into(carts::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("insert_cart: {e}")))?;

    let item_rows: Vec<NewCartItemRow> = cart_item_rows(cart);
    if !item_rows.is_empty() {
        diesel::insert_into(cart_items::table)
            .values(&item_rows)
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("insert_cart items: {e}")))?;
    }

    debug!(
        cart_id = cart.cart_id.value(),
        item_count = cart.items.len(),
        "Inserted cart"
    );

    Ok(())
}

/// Applies a restore to the canonical cart table.
///
/// Archives every cart of the `(client, user)` pair, then promotes the
/// target to active with its new `last_modified_at`. Both statements
/// must run inside the caller's transaction so the pair is never
/// observable with zero or two active carts.
///
/// # Arguments
///
/// * `conn` - The database connection (expected to be inside a
///   transaction)
/// * `client_id` - The client scope
/// * `user_id` - The user scope
/// * `target` - The restored cart as produced by the core transition
///
/// # Errors
///
/// Returns an error if either update fails or the target row does not
/// exist.
pub fn apply_restore(
    conn: &mut SqliteConnection,
    client_id: &ClientId,
    user_id: &UserId,
    target: &CartRecord,
) -> Result<(), PersistenceError> {
    let archived: usize = diesel::update(
        carts::table
            .filter(carts::client_id.eq(client_id.value()))
            .filter(carts::user_id.eq(user_id.value())),
    )
    .set(carts::status.eq(CartStatus::Archived.as_str()))
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("apply_restore archive: {e}")))?;

    let last_modified_at: String = target.last_modified_at.format(&Rfc3339)?;
    let activated: usize = diesel::update(
        carts::table.filter(carts::cart_id.eq(target.cart_id.value())),
    )
    .set((
        carts::status.eq(CartStatus::Active.as_str()),
        carts::last_modified_at.eq(&last_modified_at),
    ))
    .execute(conn)
    .map_err(|e| PersistenceError::QueryFailed(format!("apply_restore activate: {e}")))?;

    if activated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "cart '{}' vanished during restore",
            target.cart_id.value()
        )));
    }

    debug!(
        cart_id = target.cart_id.value(),
        client_id = client_id.value(),
        user_id = user_id.value(),
        pair_rows = archived,
        "Applied restore to canonical cart table"
    );

    Ok(())
}
