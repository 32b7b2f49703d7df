// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Startup seeding from a JSON cart file.
//!
//! The seed file is a JSON array of cart records in the wire format.
//! Each record is admitted through the regular import command path, so
//! seeded carts are validated and audited like any other mutation.

use thiserror::Error;
use tracing::info;

use cartkeep::TransitionResult;
use cartkeep_api::{ApiResult, CartInfo, ImportCartRequest, import_cart};
use cartkeep_audit::{Actor, Cause};
use cartkeep_persistence::Persistence;

/// Errors that can occur while seeding the store.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("Failed to read seed file '{path}': {source}")]
    Read {
        /// The seed file path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The seed file is not a valid JSON array of cart records.
    #[error("Failed to parse seed file '{path}': {source}")]
    Parse {
        /// The seed file path.
        path: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A seed record was rejected by the import command.
    #[error("Failed to import seed cart '{cart_id}': {message}")]
    Import {
        /// The rejected cart.
        cart_id: String,
        /// Why the import was rejected.
        message: String,
    },
    /// A seed record could not be persisted.
    #[error("Failed to persist seed cart '{cart_id}': {message}")]
    Persist {
        /// The affected cart.
        cart_id: String,
        /// Why persistence failed.
        message: String,
    },
}

/// Imports every cart record from a JSON seed file.
///
/// Records are admitted in file order; the first invalid record aborts
/// the seed with an error. Already-persisted records from earlier in
/// the file remain in the store.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to seed
/// * `path` - Path to the JSON seed file
///
/// # Returns
///
/// The number of imported cart records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or any
/// record fails import or persistence.
pub fn seed_from_file(persistence: &mut Persistence, path: &str) -> Result<usize, SeedError> {
    let contents: String = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_string(),
        source,
    })?;

    let carts: Vec<CartInfo> =
        serde_json::from_str(&contents).map_err(|source| SeedError::Parse {
            path: path.to_string(),
            source,
        })?;

    for cart in &carts {
        let actor: Actor = Actor::new(String::from("seed-loader"), String::from("seed"));
        let cause: Cause = Cause::new(
            format!("seed:{path}"),
            String::from("Startup seed import"),
        );

        let result: ApiResult<CartInfo> = import_cart(
            persistence,
            &ImportCartRequest { cart: cart.clone() },
            actor,
            cause,
        )
        .map_err(|e| SeedError::Import {
            cart_id: cart.cart_id.clone(),
            message: e.to_string(),
        })?;

        persistence
            .persist_transition(&TransitionResult {
                new_state: result.new_state,
                audit_event: result.audit_event,
            })
            .map_err(|e| SeedError::Persist {
                cart_id: cart.cart_id.clone(),
                message: e.to_string(),
            })?;
    }

    info!(path, cart_count = carts.len(), "Seeded cart store");

    Ok(carts.len())
}
