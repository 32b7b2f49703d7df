// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cartkeep_audit::{AuditEvent, StateSnapshot};
use cartkeep_domain::{CartId, CartRecord, ClientId, UserId};

/// The complete cart state scoped to a single `(client, user)` pair.
///
/// All lifecycle transitions operate on one pair at a time. Carts
/// belonging to other pairs are never visible to a transition, which is
/// what keeps restore from touching unrelated carts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The client this state is scoped to.
    pub client_id: ClientId,
    /// The user this state is scoped to.
    pub user_id: UserId,
    /// All cart records for this `(client, user)` pair, in storage order.
    pub carts: Vec<CartRecord>,
}

impl State {
    /// Creates a new empty state for a given `(client, user)` pair.
    ///
    /// # Arguments
    ///
    /// * `client_id` - The client this state is scoped to
    /// * `user_id` - The user this state is scoped to
    #[must_use]
    pub const fn new(client_id: ClientId, user_id: UserId) -> Self {
        Self {
            client_id,
            user_id,
            carts: Vec::new(),
        }
    }

    /// Returns the currently active cart, if any.
    ///
    /// A well-formed state has at most one.
    #[must_use]
    pub fn active_cart(&self) -> Option<&CartRecord> {
        self.carts.iter().find(|cart| cart.is_active())
    }

    /// Finds a cart by its identifier.
    #[must_use]
    pub fn find_cart(&self, cart_id: &CartId) -> Option<&CartRecord> {
        self.carts.iter().find(|cart| cart.cart_id == *cart_id)
    }

    /// Counts the carts with active status.
    ///
    /// Used by tests and validation to assert the single-active-cart
    /// invariant; always 0 or 1 after a successful transition.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.carts.iter().filter(|cart| cart.is_active()).count()
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let active: &str = self
            .active_cart()
            .map_or("none", |cart| cart.cart_id.value());
        StateSnapshot::new(format!(
            "client={},user={},carts_count={},active={}",
            self.client_id.value(),
            self.user_id.value(),
            self.carts.len(),
            active
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail
/// without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
