// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for admitting externally created carts into the store.

use crate::{Command, CoreError, State, TransitionResult, apply};
use cartkeep_domain::{CartId, CartRecord, CartStatus, DomainError};

use super::helpers::{
    create_test_actor, create_test_cart, create_test_cart_for, create_test_cause,
    create_test_state, later_time,
};

fn import(state: &State, cart: CartRecord) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        Command::ImportCart { cart },
        create_test_actor(),
        create_test_cause(),
        later_time(),
    )
}

#[test]
fn test_import_into_empty_state() {
    let state: State = create_test_state(Vec::new());
    let cart: CartRecord = create_test_cart("c-1", CartStatus::Active);

    let result: TransitionResult = import(&state, cart).unwrap();

    assert_eq!(result.new_state.carts.len(), 1);
    assert_eq!(result.new_state.active_count(), 1);
    assert_eq!(result.audit_event.action.name, "ImportCart");
}

#[test]
fn test_import_archived_cart_alongside_active() {
    let state: State = create_test_state(vec![create_test_cart("c-1", CartStatus::Active)]);
    let cart: CartRecord = create_test_cart("c-2", CartStatus::Archived);

    let result: TransitionResult = import(&state, cart).unwrap();

    assert_eq!(result.new_state.carts.len(), 2);
    assert_eq!(result.new_state.active_count(), 1);
}

#[test]
fn test_import_rejects_duplicate_cart_id() {
    let state: State = create_test_state(vec![create_test_cart("c-1", CartStatus::Active)]);
    let cart: CartRecord = create_test_cart("c-1", CartStatus::Archived);

    let result = import(&state, cart);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DuplicateCart(id)) if id == "c-1"
    ));
}

#[test]
fn test_import_rejects_second_active_cart() {
    let state: State = create_test_state(vec![create_test_cart("c-1", CartStatus::Active)]);
    let cart: CartRecord = create_test_cart("c-2", CartStatus::Active);

    let result = import(&state, cart);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::DuplicateActiveCart { .. })
    ));
}

#[test]
fn test_import_rejects_cart_for_another_pair() {
    let state: State = create_test_state(Vec::new());
    let cart: CartRecord = create_test_cart_for("c-1", "2", "2-1", CartStatus::Active);

    let result = import(&state, cart);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::CartOutsideScope { .. })
    ));
}

#[test]
fn test_import_rejects_malformed_record() {
    let state: State = create_test_state(Vec::new());
    let mut cart: CartRecord = create_test_cart("c-1", CartStatus::Active);
    cart.total_item_count = 99;

    let result = import(&state, cart);

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InconsistentItemCount { .. })
    ));
}

#[test]
fn test_failed_import_leaves_state_untouched() {
    let state: State = create_test_state(vec![create_test_cart("c-1", CartStatus::Active)]);
    let snapshot_before = state.to_snapshot();

    let _ = import(&state, create_test_cart("c-2", CartStatus::Active));

    assert_eq!(state.to_snapshot(), snapshot_before);
    assert_eq!(state.carts.len(), 1);
}
