// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! The wire contract of the surrounding back office is camelCase JSON;
//! Rust identifiers stay snake_case with serde renames. Money fields
//! are decimal strings and timestamps are RFC 3339.

use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;
use cartkeep_domain::{CartLineItem, CartRecord};

/// A cart line item as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItemInfo {
    /// The product identifier.
    pub product_id: String,
    /// The product display name.
    pub product_name: String,
    /// The product code used by the distribution catalog.
    pub product_code: String,
    /// The ordered quantity.
    pub quantity: u32,
    /// The unit price.
    pub unit_price: Decimal,
    /// The line total (`quantity * unitPrice`).
    pub line_total: Decimal,
}

/// A cart record as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInfo {
    /// The cart identifier.
    pub cart_id: String,
    /// The owning client.
    pub client_id: String,
    /// The user acting on behalf of the client.
    pub user_id: String,
    /// The lifecycle status (`active` or `archived`).
    pub status: String,
    /// The ordered product lines.
    pub items: Vec<CartLineItemInfo>,
    /// Sum of line quantities.
    pub total_item_count: u32,
    /// Sum of line totals.
    pub total_value: Decimal,
    /// When the cart was created (RFC 3339).
    pub created_at: String,
    /// When the cart was last mutated (RFC 3339).
    pub last_modified_at: String,
}

/// API request to list carts for a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCartsRequest {
    /// The client whose carts to list.
    pub client_id: String,
    /// Optional user filter.
    pub user_id: Option<String>,
}

/// API response for a cart listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListCartsResponse {
    /// The matching cart records.
    pub data: Vec<CartInfo>,
    /// The number of matching records.
    pub total: usize,
}

/// API response for a single-cart fetch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetCartResponse {
    /// The cart record.
    pub data: CartInfo,
}

/// API request to restore an archived cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreCartRequest {
    /// The cart to restore.
    pub cart_id: String,
}

/// API response for a successful restore.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestoreCartResponse {
    /// The restored cart record.
    pub data: CartInfo,
    /// A success message.
    pub message: String,
}

/// API request to admit an externally created cart.
///
/// The seed loader and fixtures are the callers; carts themselves arise
/// from shopping activity outside this system.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportCartRequest {
    /// The cart to admit.
    pub cart: CartInfo,
}

/// An audit event as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEventInfo {
    /// The event ID.
    pub event_id: Option<i64>,
    /// The actor ID.
    pub actor_id: String,
    /// The actor type.
    pub actor_type: String,
    /// The cause ID.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action_name: String,
    /// Optional action details.
    pub action_details: Option<String>,
    /// State before the transition.
    pub before_snapshot: String,
    /// State after the transition.
    pub after_snapshot: String,
    /// The client scope.
    pub client_id: String,
    /// The user scope.
    pub user_id: String,
}

/// Converts a domain cart record into its wire representation.
///
/// # Errors
///
/// Returns an internal error if a timestamp cannot be formatted.
pub fn cart_to_info(cart: &CartRecord) -> Result<CartInfo, ApiError> {
    let created_at: String = format_timestamp(cart.created_at)?;
    let last_modified_at: String = format_timestamp(cart.last_modified_at)?;

    Ok(CartInfo {
        cart_id: cart.cart_id.value().to_string(),
        client_id: cart.client_id.value().to_string(),
        user_id: cart.user_id.value().to_string(),
        status: cart.status.as_str().to_string(),
        items: cart.items.iter().map(line_item_to_info).collect(),
        total_item_count: cart.total_item_count,
        total_value: cart.total_value,
        created_at,
        last_modified_at,
    })
}

fn line_item_to_info(item: &CartLineItem) -> CartLineItemInfo {
    CartLineItemInfo {
        product_id: item.product_id.clone(),
        product_name: item.product_name.clone(),
        product_code: item.product_code.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price,
        line_total: item.line_total,
    }
}

fn format_timestamp(timestamp: time::OffsetDateTime) -> Result<String, ApiError> {
    timestamp.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}
