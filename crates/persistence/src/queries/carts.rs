// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cart record query operations.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{CartItemRow, CartRow, cart_from_rows};
use crate::diesel_schema::{cart_items, carts};
use crate::error::PersistenceError;
use cartkeep_domain::{CartId, CartRecord, ClientId, UserId};

/// Loads the item rows for one cart, ordered by their position.
fn load_item_rows(
    conn: &mut SqliteConnection,
    cart_id: &str,
) -> Result<Vec<CartItemRow>, PersistenceError> {
    cart_items::table
        .filter(cart_items::cart_id.eq(cart_id))
        .order(cart_items::position.asc())
        .load::<CartItemRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("load_item_rows: {e}")))
}

/// Fetches a single cart record by its identifier.
///
/// Returns `None` when no cart with this identifier exists; missing is
/// not an error at this layer.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be
/// reconstructed.
pub fn get_cart(
    conn: &mut SqliteConnection,
    cart_id: &CartId,
) -> Result<Option<CartRecord>, PersistenceError> {
    let row: Option<CartRow> = carts::table
        .filter(carts::cart_id.eq(cart_id.value()))
        .first::<CartRow>(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_cart: {e}")))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let item_rows: Vec<CartItemRow> = load_item_rows(conn, &row.cart_id)?;
    Ok(Some(cart_from_rows(&row, &item_rows)?))
}

/// Lists all cart records for a client, optionally narrowed to one user.
///
/// An unknown client simply yields an empty list. Results are ordered
/// by creation time, then identifier, for a stable listing.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be
/// reconstructed.
pub fn list_carts(
    conn: &mut SqliteConnection,
    client_id: &ClientId,
    user_id: Option<&UserId>,
) -> Result<Vec<CartRecord>, PersistenceError> {
    let mut query = carts::table
        .filter(carts::client_id.eq(client_id.value()))
        .into_boxed();

    if let Some(user_id) = user_id {
        query = query.filter(carts::user_id.eq(user_id.value()));
    }

    let rows: Vec<CartRow> = query
        .order((carts::created_at.asc(), carts::cart_id.asc()))
        .load::<CartRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_carts: {e}")))?;

    let mut records: Vec<CartRecord> = Vec::with_capacity(rows.len());
    for row in &rows {
        let item_rows: Vec<CartItemRow> = load_item_rows(conn, &row.cart_id)?;
        records.push(cart_from_rows(row, &item_rows)?);
    }

    Ok(records)
}
