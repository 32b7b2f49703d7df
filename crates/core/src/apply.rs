// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{State, TransitionResult};
use cartkeep_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use cartkeep_domain::{CartRecord, CartStatus, DomainError, validate_cart_record};
use time::OffsetDateTime;

/// Applies a command to the scoped state, producing a new state and
/// audit event.
///
/// The state is immutable; a successful transition returns a fresh copy
/// with the change applied. Nothing outside the state's `(client, user)`
/// scope can be touched.
///
/// # Arguments
///
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The mutation timestamp applied when a transition bumps
///   `last_modified_at`
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The referenced cart does not exist (`RestoreCart`)
/// - The imported cart is malformed, duplicated, outside the state's
///   scope, or would break the single-active-cart invariant
///   (`ImportCart`)
pub fn apply(
    state: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::ImportCart { cart } => apply_import(state, cart, actor, cause),
        Command::RestoreCart { cart_id } => {
            // Look up the target; restore of an unknown cart fails
            // without side effects.
            let Some(target) = state.find_cart(&cart_id) else {
                return Err(CoreError::DomainViolation(DomainError::CartNotFound(
                    cart_id.value().to_string(),
                )));
            };

            let previously_active: Option<String> = state
                .active_cart()
                .map(|cart| cart.cart_id.value().to_string());

            // last_modified_at never regresses, even if the caller's
            // clock is behind the stored timestamp.
            let stamped_at: OffsetDateTime = if now < target.last_modified_at {
                target.last_modified_at
            } else {
                now
            };

            let before: StateSnapshot = state.to_snapshot();

            // Archive every cart in the pair, then promote the target.
            // The target passes through archived transiently, which is
            // invisible because the whole transition is one unit.
            let new_carts: Vec<CartRecord> = state
                .carts
                .iter()
                .map(|cart| {
                    let mut updated: CartRecord = cart.clone();
                    if cart.cart_id == cart_id {
                        updated.status = CartStatus::Active;
                        updated.last_modified_at = stamped_at;
                    } else {
                        updated.status = CartStatus::Archived;
                    }
                    updated
                })
                .collect();

            let new_state: State = State {
                client_id: state.client_id.clone(),
                user_id: state.user_id.clone(),
                carts: new_carts,
            };

            let after: StateSnapshot = new_state.to_snapshot();

            let details: String = match previously_active {
                Some(ref prev) if *prev != cart_id.value() => format!(
                    "Restored cart '{}', archived previously active cart '{prev}'",
                    cart_id.value()
                ),
                Some(_) => format!("Restored already-active cart '{}'", cart_id.value()),
                None => format!(
                    "Restored cart '{}', no cart was previously active",
                    cart_id.value()
                ),
            };

            let action: Action = Action::new(String::from("RestoreCart"), Some(details));
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                state.client_id.clone(),
                state.user_id.clone(),
            );

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
    }
}

/// Admits an externally created cart into the scoped state.
fn apply_import(
    state: &State,
    cart: CartRecord,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    // The record must be internally consistent before it is admitted.
    validate_cart_record(&cart)?;

    // Imports are scoped: a cart for another pair is a caller bug.
    if !cart.belongs_to(&state.client_id, &state.user_id) {
        return Err(CoreError::DomainViolation(DomainError::CartOutsideScope {
            cart_id: cart.cart_id.value().to_string(),
            client_id: state.client_id.value().to_string(),
            user_id: state.user_id.value().to_string(),
        }));
    }

    if state.find_cart(&cart.cart_id).is_some() {
        return Err(CoreError::DomainViolation(DomainError::DuplicateCart(
            cart.cart_id.value().to_string(),
        )));
    }

    // Admitting a second active cart would break the invariant the
    // restore operation exists to protect.
    if cart.is_active()
        && let Some(existing) = state.active_cart()
    {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateActiveCart {
                client_id: state.client_id.value().to_string(),
                user_id: state.user_id.value().to_string(),
                existing: existing.cart_id.value().to_string(),
                incoming: cart.cart_id.value().to_string(),
            },
        ));
    }

    let before: StateSnapshot = state.to_snapshot();

    let mut new_carts: Vec<CartRecord> = state.carts.clone();
    let imported_id: String = cart.cart_id.value().to_string();
    let imported_status: &str = cart.status.as_str();
    new_carts.push(cart);

    let new_state: State = State {
        client_id: state.client_id.clone(),
        user_id: state.user_id.clone(),
        carts: new_carts,
    };

    let after: StateSnapshot = new_state.to_snapshot();

    let action: Action = Action::new(
        String::from("ImportCart"),
        Some(format!(
            "Imported cart '{imported_id}' with status '{imported_status}'"
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        state.client_id.clone(),
        state.user_id.clone(),
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}
