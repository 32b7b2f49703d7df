// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CartId, CartLineItem, CartRecord, CartStatus, ClientId, DomainError, UserId,
    validate_cart_record, validate_client_id, validate_line_item,
};
use rust_decimal::Decimal;
use time::macros::datetime;

fn create_test_item(quantity: u32, unit_price: Decimal) -> CartLineItem {
    CartLineItem::new(
        String::from("p-10"),
        String::from("Product p-10"),
        String::from("CODE-p-10"),
        quantity,
        unit_price,
    )
}

fn create_test_cart() -> CartRecord {
    CartRecord::new(
        CartId::new("c-1"),
        ClientId::new("1"),
        UserId::new("1-1"),
        CartStatus::Active,
        vec![create_test_item(2, Decimal::new(1050, 2))],
        datetime!(2026-03-01 10:00 UTC),
    )
}

#[test]
fn test_valid_cart_passes() {
    let cart: CartRecord = create_test_cart();
    assert!(validate_cart_record(&cart).is_ok());
}

#[test]
fn test_empty_client_id_rejected() {
    let result = validate_client_id(&ClientId::new("   "));

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidClientId(_)
    ));
}

#[test]
fn test_zero_quantity_rejected() {
    let mut item: CartLineItem = create_test_item(1, Decimal::new(1050, 2));
    item.quantity = 0;
    item.line_total = Decimal::ZERO;

    let result = validate_line_item(&item);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InvalidQuantity { quantity: 0, .. }
    ));
}

#[test]
fn test_negative_unit_price_rejected() {
    let mut item: CartLineItem = create_test_item(1, Decimal::new(1050, 2));
    item.unit_price = Decimal::new(-1, 2);
    item.line_total = Decimal::new(-1, 2);

    let result = validate_line_item(&item);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::NegativeUnitPrice { .. }
    ));
}

#[test]
fn test_tampered_line_total_rejected() {
    let mut item: CartLineItem = create_test_item(2, Decimal::new(1050, 2));
    item.line_total = Decimal::new(100, 2);

    let result = validate_line_item(&item);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InconsistentLineTotal { .. }
    ));
}

#[test]
fn test_stale_item_count_rejected() {
    let mut cart: CartRecord = create_test_cart();
    cart.total_item_count = 99;

    let result = validate_cart_record(&cart);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InconsistentItemCount {
            expected: 2,
            actual: 99,
            ..
        }
    ));
}

#[test]
fn test_stale_total_value_rejected() {
    let mut cart: CartRecord = create_test_cart();
    cart.total_value = Decimal::ZERO;

    let result = validate_cart_record(&cart);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::InconsistentTotalValue { .. }
    ));
}

#[test]
fn test_inverted_timestamps_rejected() {
    let mut cart: CartRecord = create_test_cart();
    cart.last_modified_at = datetime!(2026-02-01 10:00 UTC);

    let result = validate_cart_record(&cart);

    assert!(matches!(
        result.unwrap_err(),
        DomainError::TimestampOrder { .. }
    ));
}

#[test]
fn test_empty_item_list_is_valid() {
    let cart: CartRecord = CartRecord::new(
        CartId::new("c-empty"),
        ClientId::new("1"),
        UserId::new("1-1"),
        CartStatus::Archived,
        Vec::new(),
        datetime!(2026-03-01 10:00 UTC),
    );

    assert!(validate_cart_record(&cart).is_ok());
}
