// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use cartkeep::{Command, State, TransitionResult, apply};
use cartkeep_audit::{Actor, Cause};
use cartkeep_domain::{CartId, CartLineItem, CartRecord, CartStatus, ClientId, UserId};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test-actor"), String::from("system"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn base_time() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn later_time() -> OffsetDateTime {
    datetime!(2026-03-02 15:30 UTC)
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

pub fn create_test_cart(
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

/// Admits a cart through the core command path and persists the result.
pub fn import_cart(persistence: &mut Persistence, cart: CartRecord) -> i64 {
    let state: State = persistence
        .load_state(&cart.client_id, &cart.user_id)
        .expect("load state");

    let result: TransitionResult = apply(
        &state,
        Command::ImportCart { cart },
        create_test_actor(),
        create_test_cause(),
        base_time(),
    )
    .expect("import transition");

    persistence
        .persist_transition(&result)
        .expect("persist import")
}

/// Restores a cart through the core command path and persists the result.
pub fn restore_cart(
    persistence: &mut Persistence,
    client_id: &ClientId,
    user_id: &UserId,
    cart_id: &str,
) -> i64 {
    let state: State = persistence
        .load_state(client_id, user_id)
        .expect("load state");

    let result: TransitionResult = apply(
        &state,
        Command::RestoreCart {
            cart_id: CartId::new(cart_id),
        },
        create_test_actor(),
        create_test_cause(),
        later_time(),
    )
    .expect("restore transition");

    persistence
        .persist_transition(&result)
        .expect("persist restore")
}
