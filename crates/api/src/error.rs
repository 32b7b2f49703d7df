// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use cartkeep::CoreError;
use cartkeep_domain::DomainError;
use cartkeep_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract. Lower-layer errors are translated explicitly and never
/// leaked raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not
/// leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::CartNotFound(cart_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Cart"),
            message: format!("Cart '{cart_id}' does not exist"),
        },
        DomainError::DuplicateCart(cart_id) => ApiError::DomainRuleViolation {
            rule: String::from("unique_cart_id"),
            message: format!("Cart '{cart_id}' already exists"),
        },
        DomainError::DuplicateActiveCart {
            client_id,
            user_id,
            existing,
            incoming,
        } => ApiError::DomainRuleViolation {
            rule: String::from("single_active_cart"),
            message: format!(
                "Cannot admit active cart '{incoming}': cart '{existing}' is already active for client '{client_id}', user '{user_id}'"
            ),
        },
        DomainError::CartOutsideScope {
            cart_id,
            client_id,
            user_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("cart_scope"),
            message: format!(
                "Cart '{cart_id}' does not belong to client '{client_id}', user '{user_id}'"
            ),
        },
        DomainError::InvalidClientId(msg) => ApiError::InvalidInput {
            field: String::from("clientId"),
            message: msg,
        },
        DomainError::InvalidUserId(msg) => ApiError::InvalidInput {
            field: String::from("userId"),
            message: msg,
        },
        DomainError::InvalidCartId(msg) => ApiError::InvalidInput {
            field: String::from("cartId"),
            message: msg,
        },
        DomainError::InvalidQuantity {
            product_id,
            quantity,
        } => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: format!("Invalid quantity {quantity} for product '{product_id}': must be at least 1"),
        },
        DomainError::NegativeUnitPrice {
            product_id,
            unit_price,
        } => ApiError::InvalidInput {
            field: String::from("unitPrice"),
            message: format!("Negative unit price {unit_price} for product '{product_id}'"),
        },
        DomainError::InconsistentLineTotal {
            product_id,
            expected,
            actual,
        } => ApiError::InvalidInput {
            field: String::from("lineTotal"),
            message: format!(
                "Line total for product '{product_id}' is {actual}, expected {expected}"
            ),
        },
        DomainError::InconsistentItemCount {
            cart_id,
            expected,
            actual,
        } => ApiError::InvalidInput {
            field: String::from("totalItemCount"),
            message: format!("Cart '{cart_id}' carries item count {actual}, items sum to {expected}"),
        },
        DomainError::InconsistentTotalValue {
            cart_id,
            expected,
            actual,
        } => ApiError::InvalidInput {
            field: String::from("totalValue"),
            message: format!("Cart '{cart_id}' carries total value {actual}, items sum to {expected}"),
        },
        DomainError::InvalidCartStatus { status } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid cart status '{status}': must be 'active' or 'archived'"),
        },
        DomainError::TimestampOrder { cart_id } => ApiError::InvalidInput {
            field: String::from("lastModifiedAt"),
            message: format!("Cart '{cart_id}' was last modified before it was created"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Missing records surface as not-found; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::EventNotFound(event_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {event_id} does not exist"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        _ => ApiError::Internal {
            message: format!("Persistence failure: {err}"),
        },
    }
}
