// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cart_status::CartStatus;
use crate::types::{CartId, ClientId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single product line within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// The product identifier.
    pub product_id: String,
    /// The product display name.
    pub product_name: String,
    /// The product code used by the distribution catalog.
    pub product_code: String,
    /// The ordered quantity. Must be at least 1.
    pub quantity: u32,
    /// The unit price at the time the item was added. Must be non-negative.
    pub unit_price: Decimal,
    /// The line total. Must equal `quantity * unit_price`.
    pub line_total: Decimal,
}

impl CartLineItem {
    /// Creates a new line item with the line total derived from the
    /// quantity and unit price.
    #[must_use]
    pub fn new(
        product_id: String,
        product_name: String,
        product_code: String,
        quantity: u32,
        unit_price: Decimal,
    ) -> Self {
        let line_total: Decimal = Decimal::from(quantity) * unit_price;
        Self {
            product_id,
            product_name,
            product_code,
            quantity,
            unit_price,
            line_total,
        }
    }

    /// Returns the line total this item should carry given its quantity
    /// and unit price.
    #[must_use]
    pub fn expected_line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A cart record: the selected products, quantities, and prices for one
/// `(client, user)` pair, together with its lifecycle status.
///
/// For any `(client, user)` pair at most one cart may be `active` at a
/// time. That invariant is enforced by the restore transition in the
/// core crate, never by this type alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    /// The cart identifier.
    pub cart_id: CartId,
    /// The owning client.
    pub client_id: ClientId,
    /// The user acting on behalf of the client.
    pub user_id: UserId,
    /// The lifecycle status.
    pub status: CartStatus,
    /// The ordered product lines.
    pub items: Vec<CartLineItem>,
    /// Sum of line quantities. Derived from `items`.
    pub total_item_count: u32,
    /// Sum of line totals. Derived from `items`.
    pub total_value: Decimal,
    /// When the cart was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the cart was last mutated. Never earlier than `created_at`
    /// and monotonically non-decreasing across mutations.
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified_at: OffsetDateTime,
}

impl CartRecord {
    /// Creates a new cart record with aggregates derived from the items.
    ///
    /// `last_modified_at` starts equal to `created_at`.
    #[must_use]
    pub fn new(
        cart_id: CartId,
        client_id: ClientId,
        user_id: UserId,
        status: CartStatus,
        items: Vec<CartLineItem>,
        created_at: OffsetDateTime,
    ) -> Self {
        let total_item_count: u32 = Self::item_count_of(&items);
        let total_value: Decimal = Self::value_of(&items);
        Self {
            cart_id,
            client_id,
            user_id,
            status,
            items,
            total_item_count,
            total_value,
            created_at,
            last_modified_at: created_at,
        }
    }

    /// Returns true if this cart has the active status.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if this cart belongs to the given `(client, user)` pair.
    #[must_use]
    pub fn belongs_to(&self, client_id: &ClientId, user_id: &UserId) -> bool {
        self.client_id == *client_id && self.user_id == *user_id
    }

    /// The item count the aggregates should carry given the items.
    #[must_use]
    pub fn computed_item_count(&self) -> u32 {
        Self::item_count_of(&self.items)
    }

    /// The total value the aggregates should carry given the items.
    #[must_use]
    pub fn computed_total_value(&self) -> Decimal {
        Self::value_of(&self.items)
    }

    fn item_count_of(items: &[CartLineItem]) -> u32 {
        items.iter().map(|item| item.quantity).sum()
    }

    fn value_of(items: &[CartLineItem]) -> Decimal {
        items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + item.line_total)
    }
}
