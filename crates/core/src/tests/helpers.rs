// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::State;
use cartkeep_audit::{Actor, Cause};
use cartkeep_domain::{CartId, CartLineItem, CartRecord, CartStatus, ClientId, UserId};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("op-123"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Operator request"))
}

pub fn create_test_items() -> Vec<CartLineItem> {
    vec![
        CartLineItem::new(
            String::from("p-10"),
            String::from("Mineral water 500ml"),
            String::from("MW-500"),
            6,
            Decimal::new(250, 2),
        ),
        CartLineItem::new(
            String::from("p-11"),
            String::from("Espresso beans 1kg"),
            String::from("EB-1000"),
            1,
            Decimal::new(3890, 2),
        ),
    ]
}

pub fn base_time() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn later_time() -> OffsetDateTime {
    datetime!(2026-03-02 15:30 UTC)
}

pub fn create_test_cart(cart_id: &str, status: CartStatus) -> CartRecord {
    create_test_cart_for(cart_id, "1", "1-1", status)
}

pub fn create_test_cart_for(
    cart_id: &str,
    client_id: &str,
    user_id: &str,
    status: CartStatus,
) -> CartRecord {
    CartRecord::new(
        CartId::new(cart_id),
        ClientId::new(client_id),
        UserId::new(user_id),
        status,
        create_test_items(),
        base_time(),
    )
}

pub fn create_test_state(carts: Vec<CartRecord>) -> State {
    State {
        client_id: ClientId::new("1"),
        user_id: UserId::new("1-1"),
        carts,
    }
}
