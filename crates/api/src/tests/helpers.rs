// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::request_response::{CartInfo, CartLineItemInfo, ImportCartRequest};
use crate::{ApiResult, import_cart};
use cartkeep_audit::{Actor, Cause};
use cartkeep_persistence::Persistence;
use rust_decimal::Decimal;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("op-1"), String::from("operator"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn create_test_cart_info(
    cart_id: &str,
    client_id: &str,
    user_id: &str,
    status: &str,
) -> CartInfo {
    let items: Vec<CartLineItemInfo> = vec![
        CartLineItemInfo {
            product_id: String::from("p-10"),
            product_name: String::from("Mineral water 500ml"),
            product_code: String::from("MW-500"),
            quantity: 6,
            unit_price: Decimal::new(250, 2),
            line_total: Decimal::new(1500, 2),
        },
        CartLineItemInfo {
            product_id: String::from("p-11"),
            product_name: String::from("Espresso beans 1kg"),
            product_code: String::from("EB-1000"),
            quantity: 1,
            unit_price: Decimal::new(3890, 2),
            line_total: Decimal::new(3890, 2),
        },
    ];

    CartInfo {
        cart_id: cart_id.to_string(),
        client_id: client_id.to_string(),
        user_id: user_id.to_string(),
        status: status.to_string(),
        items,
        total_item_count: 7,
        total_value: Decimal::new(5390, 2),
        created_at: String::from("2026-03-01T10:00:00Z"),
        last_modified_at: String::from("2026-03-01T10:00:00Z"),
    }
}

/// Seeds a cart through the import handler and persists the transition.
pub fn seed_cart(persistence: &mut Persistence, info: CartInfo) {
    let request: ImportCartRequest = ImportCartRequest { cart: info };
    let result: ApiResult<CartInfo> = import_cart(
        persistence,
        &request,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("import should succeed");

    persistence
        .persist_transition(&cartkeep::TransitionResult {
            new_state: result.new_state,
            audit_event: result.audit_event,
        })
        .expect("persist should succeed");
}

/// Seeds the three-cart fixture: A(active) and B(archived) for
/// client 1 / user 1-1, C(active) for client 1 / user 1-2.
pub fn seed_standard_carts(persistence: &mut Persistence) {
    seed_cart(persistence, create_test_cart_info("A", "1", "1-1", "active"));
    seed_cart(
        persistence,
        create_test_cart_info("B", "1", "1-1", "archived"),
    );
    seed_cart(persistence, create_test_cart_info("C", "1", "1-2", "active"));
}
