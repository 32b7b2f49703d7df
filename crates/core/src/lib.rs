// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use cartkeep_domain::{CartId, DomainError};

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use state::{State, TransitionResult};

/// Validates that a cart exists in the scoped state.
///
/// This is a read-only validation that does not create audit events.
///
/// # Arguments
///
/// * `state` - The scoped state to check
/// * `cart_id` - The cart to validate
///
/// # Returns
///
/// * `Ok(())` if the cart exists
/// * `Err(DomainError::CartNotFound)` if the cart does not exist
///
/// # Errors
///
/// Returns an error if no cart with this identifier is in scope.
pub fn validate_cart_exists(state: &State, cart_id: &CartId) -> Result<(), DomainError> {
    if state.find_cart(cart_id).is_none() {
        return Err(DomainError::CartNotFound(cart_id.value().to_string()));
    }
    Ok(())
}
