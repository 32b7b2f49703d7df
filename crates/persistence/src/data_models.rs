// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between stored rows and domain records.
//!
//! Money columns hold canonical `Decimal` strings and timestamp columns
//! hold RFC 3339, so every load revalidates that the stored text still
//! parses.

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;
use cartkeep_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cartkeep_domain::{CartId, CartLineItem, CartRecord, CartStatus, ClientId, UserId};

/// A row in the `carts` table.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = crate::diesel_schema::carts)]
pub struct CartRow {
    pub cart_id: String,
    pub client_id: String,
    pub user_id: String,
    pub status: String,
    pub total_item_count: i64,
    pub total_value: String,
    pub created_at: String,
    pub last_modified_at: String,
}

/// A row in the `cart_items` table.
#[derive(Debug, Clone, Queryable)]
pub struct CartItemRow {
    pub item_id: i64,
    pub cart_id: String,
    pub position: i64,
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

/// An insertable `cart_items` row; the item ID is assigned by `SQLite`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::diesel_schema::cart_items)]
pub struct NewCartItemRow {
    pub cart_id: String,
    pub position: i64,
    pub product_id: String,
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

/// A row in the `audit_events` table.
#[derive(Debug, Clone, Queryable)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub client_id: String,
    pub user_id: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: Option<String>,
}

/// An insertable `audit_events` row; event ID and creation time are
/// assigned by `SQLite`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::diesel_schema::audit_events)]
pub struct NewAuditEventRow {
    pub client_id: String,
    pub user_id: String,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Converts a cart record into its `carts` row.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be formatted.
pub fn cart_to_row(cart: &CartRecord) -> Result<CartRow, PersistenceError> {
    Ok(CartRow {
        cart_id: cart.cart_id.value().to_string(),
        client_id: cart.client_id.value().to_string(),
        user_id: cart.user_id.value().to_string(),
        status: cart.status.as_str().to_string(),
        total_item_count: i64::from(cart.total_item_count),
        total_value: cart.total_value.to_string(),
        created_at: cart.created_at.format(&Rfc3339)?,
        last_modified_at: cart.last_modified_at.format(&Rfc3339)?,
    })
}

/// Converts a cart record's items into insertable `cart_items` rows,
/// preserving their order via the position column.
#[must_use]
pub fn cart_item_rows(cart: &CartRecord) -> Vec<NewCartItemRow> {
    let mut position: i64 = 0;
    cart.items
        .iter()
        .map(|item| {
            let row = NewCartItemRow {
                cart_id: cart.cart_id.value().to_string(),
                position,
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                product_code: item.product_code.clone(),
                quantity: i64::from(item.quantity),
                unit_price: item.unit_price.to_string(),
                line_total: item.line_total.to_string(),
            };
            position += 1;
            row
        })
        .collect()
}

/// Reassembles a cart record from its row and item rows.
///
/// The item rows must already be ordered by position.
///
/// # Errors
///
/// Returns `ReconstructionError` if any stored value fails to parse.
pub fn cart_from_rows(
    row: &CartRow,
    item_rows: &[CartItemRow],
) -> Result<CartRecord, PersistenceError> {
    let status: CartStatus = CartStatus::from_str(&row.status)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    let items: Vec<CartLineItem> = item_rows
        .iter()
        .map(|item| {
            Ok(CartLineItem {
                product_id: item.product_id.clone(),
                product_name: item.product_name.clone(),
                product_code: item.product_code.clone(),
                quantity: parse_quantity(item.quantity)?,
                unit_price: parse_decimal(&item.unit_price)?,
                line_total: parse_decimal(&item.line_total)?,
            })
        })
        .collect::<Result<Vec<CartLineItem>, PersistenceError>>()?;

    Ok(CartRecord {
        cart_id: CartId::new(&row.cart_id),
        client_id: ClientId::new(&row.client_id),
        user_id: UserId::new(&row.user_id),
        status,
        items,
        total_item_count: parse_quantity(row.total_item_count)?,
        total_value: parse_decimal(&row.total_value)?,
        created_at: parse_timestamp(&row.created_at)?,
        last_modified_at: parse_timestamp(&row.last_modified_at)?,
    })
}

/// Converts an audit event into its insertable row.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn audit_event_to_new_row(event: &AuditEvent) -> Result<NewAuditEventRow, PersistenceError> {
    let actor_data: ActorData = ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    };
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };
    let before_data: StateSnapshotData = StateSnapshotData {
        data: event.before.data.clone(),
    };
    let after_data: StateSnapshotData = StateSnapshotData {
        data: event.after.data.clone(),
    };

    Ok(NewAuditEventRow {
        client_id: event.client_id.value().to_string(),
        user_id: event.user_id.value().to_string(),
        actor_json: serde_json::to_string(&actor_data)?,
        cause_json: serde_json::to_string(&cause_data)?,
        action_json: serde_json::to_string(&action_data)?,
        before_snapshot_json: serde_json::to_string(&before_data)?,
        after_snapshot_json: serde_json::to_string(&after_data)?,
    })
}

/// Reassembles an audit event from its stored row.
///
/// # Errors
///
/// Returns an error if any of the JSON columns fail to deserialize.
pub fn audit_event_from_row(row: &AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let mut event: AuditEvent = AuditEvent::new(
        Actor::new(actor_data.id, actor_data.actor_type),
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
        ClientId::new(&row.client_id),
        UserId::new(&row.user_id),
    );
    event.event_id = Some(row.event_id);

    Ok(event)
}

fn parse_decimal(value: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(value).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid decimal '{value}': {e}"))
    })
}

fn parse_quantity(value: i64) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid quantity '{value}': {e}"))
    })
}

fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid timestamp '{value}': {e}"))
    })
}
