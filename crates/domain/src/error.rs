// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

/// Errors that can occur during domain validation and cart transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced cart does not exist.
    CartNotFound(String),
    /// A cart with this identifier already exists.
    DuplicateCart(String),
    /// Admitting this cart would leave two active carts for one pair.
    DuplicateActiveCart {
        /// The owning client.
        client_id: String,
        /// The acting user.
        user_id: String,
        /// The cart that is already active.
        existing: String,
        /// The cart being admitted.
        incoming: String,
    },
    /// The cart does not belong to the `(client, user)` pair in scope.
    CartOutsideScope {
        /// The cart being operated on.
        cart_id: String,
        /// The client the operation is scoped to.
        client_id: String,
        /// The user the operation is scoped to.
        user_id: String,
    },
    /// Client identifier is empty or invalid.
    InvalidClientId(String),
    /// User identifier is empty or invalid.
    InvalidUserId(String),
    /// Cart identifier is empty or invalid.
    InvalidCartId(String),
    /// A line item quantity is below 1.
    InvalidQuantity {
        /// The product on the offending line.
        product_id: String,
        /// The invalid quantity.
        quantity: u32,
    },
    /// A line item carries a negative unit price.
    NegativeUnitPrice {
        /// The product on the offending line.
        product_id: String,
        /// The invalid price.
        unit_price: Decimal,
    },
    /// A line total does not equal quantity times unit price.
    InconsistentLineTotal {
        /// The product on the offending line.
        product_id: String,
        /// The total the line should carry.
        expected: Decimal,
        /// The total the line carries.
        actual: Decimal,
    },
    /// The stored item count does not match the sum of line quantities.
    InconsistentItemCount {
        /// The cart with the stale aggregate.
        cart_id: String,
        /// The count derived from the items.
        expected: u32,
        /// The count the record carries.
        actual: u32,
    },
    /// The stored total value does not match the sum of line totals.
    InconsistentTotalValue {
        /// The cart with the stale aggregate.
        cart_id: String,
        /// The value derived from the items.
        expected: Decimal,
        /// The value the record carries.
        actual: Decimal,
    },
    /// The status string is not a valid cart status.
    InvalidCartStatus {
        /// The invalid status value.
        status: String,
    },
    /// `last_modified_at` is earlier than `created_at`.
    TimestampOrder {
        /// The cart with the inverted timestamps.
        cart_id: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CartNotFound(cart_id) => write!(f, "Cart '{cart_id}' not found"),
            Self::DuplicateCart(cart_id) => write!(f, "Cart '{cart_id}' already exists"),
            Self::DuplicateActiveCart {
                client_id,
                user_id,
                existing,
                incoming,
            } => {
                write!(
                    f,
                    "Cannot admit active cart '{incoming}': cart '{existing}' is already active for client '{client_id}', user '{user_id}'"
                )
            }
            Self::CartOutsideScope {
                cart_id,
                client_id,
                user_id,
            } => {
                write!(
                    f,
                    "Cart '{cart_id}' does not belong to client '{client_id}', user '{user_id}'"
                )
            }
            Self::InvalidClientId(msg) => write!(f, "Invalid client identifier: {msg}"),
            Self::InvalidUserId(msg) => write!(f, "Invalid user identifier: {msg}"),
            Self::InvalidCartId(msg) => write!(f, "Invalid cart identifier: {msg}"),
            Self::InvalidQuantity {
                product_id,
                quantity,
            } => {
                write!(
                    f,
                    "Invalid quantity {quantity} for product '{product_id}': must be at least 1"
                )
            }
            Self::NegativeUnitPrice {
                product_id,
                unit_price,
            } => {
                write!(
                    f,
                    "Negative unit price {unit_price} for product '{product_id}'"
                )
            }
            Self::InconsistentLineTotal {
                product_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Line total for product '{product_id}' is {actual}, expected {expected}"
                )
            }
            Self::InconsistentItemCount {
                cart_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Cart '{cart_id}' carries item count {actual}, items sum to {expected}"
                )
            }
            Self::InconsistentTotalValue {
                cart_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Cart '{cart_id}' carries total value {actual}, items sum to {expected}"
                )
            }
            Self::InvalidCartStatus { status } => {
                write!(
                    f,
                    "Invalid cart status '{status}': must be 'active' or 'archived'"
                )
            }
            Self::TimestampOrder { cart_id } => {
                write!(
                    f,
                    "Cart '{cart_id}' was last modified before it was created"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
