// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::cart::{CartLineItem, CartRecord};
use crate::error::DomainError;
use crate::types::{CartId, ClientId, UserId};
use rust_decimal::Decimal;

/// Validates that a client identifier is usable.
///
/// # Errors
///
/// Returns `DomainError::InvalidClientId` if the identifier is empty.
pub fn validate_client_id(client_id: &ClientId) -> Result<(), DomainError> {
    if client_id.value().is_empty() {
        return Err(DomainError::InvalidClientId(String::from(
            "identifier cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a user identifier is usable.
///
/// # Errors
///
/// Returns `DomainError::InvalidUserId` if the identifier is empty.
pub fn validate_user_id(user_id: &UserId) -> Result<(), DomainError> {
    if user_id.value().is_empty() {
        return Err(DomainError::InvalidUserId(String::from(
            "identifier cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a cart identifier is usable.
///
/// # Errors
///
/// Returns `DomainError::InvalidCartId` if the identifier is empty.
pub fn validate_cart_id(cart_id: &CartId) -> Result<(), DomainError> {
    if cart_id.value().is_empty() {
        return Err(DomainError::InvalidCartId(String::from(
            "identifier cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a single line item: positive quantity, non-negative unit
/// price, and a line total that matches both.
///
/// # Errors
///
/// Returns an error naming the offending product and field.
pub fn validate_line_item(item: &CartLineItem) -> Result<(), DomainError> {
    if item.quantity < 1 {
        return Err(DomainError::InvalidQuantity {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        });
    }

    if item.unit_price < Decimal::ZERO {
        return Err(DomainError::NegativeUnitPrice {
            product_id: item.product_id.clone(),
            unit_price: item.unit_price,
        });
    }

    let expected: Decimal = item.expected_line_total();
    if item.line_total != expected {
        return Err(DomainError::InconsistentLineTotal {
            product_id: item.product_id.clone(),
            expected,
            actual: item.line_total,
        });
    }

    Ok(())
}

/// Validates a complete cart record: identifiers, every line item, the
/// derived aggregates, and timestamp ordering.
///
/// The line items are the source of truth; the stored aggregates must
/// agree with them.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_cart_record(cart: &CartRecord) -> Result<(), DomainError> {
    validate_cart_id(&cart.cart_id)?;
    validate_client_id(&cart.client_id)?;
    validate_user_id(&cart.user_id)?;

    for item in &cart.items {
        validate_line_item(item)?;
    }

    let expected_count: u32 = cart.computed_item_count();
    if cart.total_item_count != expected_count {
        return Err(DomainError::InconsistentItemCount {
            cart_id: cart.cart_id.value().to_string(),
            expected: expected_count,
            actual: cart.total_item_count,
        });
    }

    let expected_value: Decimal = cart.computed_total_value();
    if cart.total_value != expected_value {
        return Err(DomainError::InconsistentTotalValue {
            cart_id: cart.cart_id.value().to_string(),
            expected: expected_value,
            actual: cart.total_value,
        });
    }

    if cart.last_modified_at < cart.created_at {
        return Err(DomainError::TimestampOrder {
            cart_id: cart.cart_id.value().to_string(),
        });
    }

    Ok(())
}
