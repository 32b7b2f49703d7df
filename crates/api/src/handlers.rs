// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use cartkeep::{Command, State, TransitionResult, apply};
use cartkeep_audit::{Actor, AuditEvent, Cause};
use cartkeep_domain::{
    CartId, CartLineItem, CartRecord, CartStatus, ClientId, UserId, validate_cart_id,
    validate_client_id,
};
use cartkeep_persistence::Persistence;

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AuditEventInfo, CartInfo, GetCartResponse, ImportCartRequest, ListCartsRequest,
    ListCartsResponse, RestoreCartRequest, RestoreCartResponse, cart_to_info,
};

/// The result of an API operation that includes both the response and
/// the audit event.
///
/// This ensures that successful mutating API operations always produce
/// an audit trail. The server layer persists the transition before
/// returning the response to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
    /// The new state after the operation.
    pub new_state: State,
}

/// Lists all carts for a client, optionally narrowed to one user.
///
/// An unknown client yields an empty listing, never an error.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to query
/// * `request` - The listing request
///
/// # Errors
///
/// Returns an error if:
/// - The client identifier is empty
/// - The store query fails
pub fn list_carts(
    persistence: &mut Persistence,
    request: &ListCartsRequest,
) -> Result<ListCartsResponse, ApiError> {
    let client_id: ClientId = ClientId::new(&request.client_id);
    validate_client_id(&client_id).map_err(translate_domain_error)?;

    let user_id: Option<UserId> = request.user_id.as_deref().map(UserId::new);

    let carts: Vec<CartRecord> = persistence
        .list_carts(&client_id, user_id.as_ref())
        .map_err(translate_persistence_error)?;

    let data: Vec<CartInfo> = carts
        .iter()
        .map(cart_to_info)
        .collect::<Result<Vec<CartInfo>, ApiError>>()?;
    let total: usize = data.len();

    Ok(ListCartsResponse { data, total })
}

/// Fetches a single cart by its identifier.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to query
/// * `cart_id` - The cart identifier
///
/// # Errors
///
/// Returns `ResourceNotFound` if the cart does not exist.
pub fn get_cart(persistence: &mut Persistence, cart_id: &str) -> Result<GetCartResponse, ApiError> {
    let cart_id: CartId = CartId::new(cart_id);
    validate_cart_id(&cart_id).map_err(translate_domain_error)?;

    let Some(cart) = persistence
        .get_cart(&cart_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(cart_not_found(cart_id.value()));
    };

    Ok(GetCartResponse {
        data: cart_to_info(&cart)?,
    })
}

/// Restores an archived cart via the API boundary.
///
/// This function:
/// - Resolves the cart's `(client, user)` pair from the store
/// - Loads the scoped state
/// - Applies the restore command, archiving every sibling cart
/// - Returns the transition for the server layer to persist
///
/// # Arguments
///
/// * `persistence` - The persistence layer to query
/// * `request` - The restore request
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(ApiResult<RestoreCartResponse>)` on success
/// * `Err(ApiError)` if the cart is unknown or the command fails
///
/// # Errors
///
/// Returns an error if:
/// - The cart identifier is empty or unknown
/// - The store query fails
pub fn restore_cart(
    persistence: &mut Persistence,
    request: &RestoreCartRequest,
    actor: Actor,
    cause: Cause,
) -> Result<ApiResult<RestoreCartResponse>, ApiError> {
    let cart_id: CartId = CartId::new(&request.cart_id);
    validate_cart_id(&cart_id).map_err(translate_domain_error)?;

    // Resolve the owning pair before loading scoped state.
    let Some(target) = persistence
        .get_cart(&cart_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(cart_not_found(cart_id.value()));
    };

    let state: State = persistence
        .load_state(&target.client_id, &target.user_id)
        .map_err(translate_persistence_error)?;

    let command: Command = Command::RestoreCart {
        cart_id: cart_id.clone(),
    };
    let transition_result: TransitionResult = apply(
        &state,
        command,
        actor,
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    let restored: &CartRecord = transition_result
        .new_state
        .find_cart(&cart_id)
        .ok_or_else(|| ApiError::Internal {
            message: format!("Cart '{}' missing after restore", cart_id.value()),
        })?;

    let response: RestoreCartResponse = RestoreCartResponse {
        data: cart_to_info(restored)?,
        message: format!("Cart '{}' restored", cart_id.value()),
    };

    Ok(ApiResult {
        response,
        audit_event: transition_result.audit_event,
        new_state: transition_result.new_state,
    })
}

/// Admits an externally created cart via the API boundary.
///
/// Used by the seed loader; carts arise from shopping activity outside
/// this system.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to query
/// * `request` - The import request
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The payload fails to parse into a well-formed cart record
/// - The cart duplicates an existing identifier
/// - Admitting the cart would leave two active carts for one pair
pub fn import_cart(
    persistence: &mut Persistence,
    request: &ImportCartRequest,
    actor: Actor,
    cause: Cause,
) -> Result<ApiResult<CartInfo>, ApiError> {
    let cart: CartRecord = info_to_record(&request.cart)?;

    let state: State = persistence
        .load_state(&cart.client_id, &cart.user_id)
        .map_err(translate_persistence_error)?;

    let response: CartInfo = cart_to_info(&cart)?;

    let command: Command = Command::ImportCart { cart };
    let transition_result: TransitionResult = apply(
        &state,
        command,
        actor,
        cause,
        OffsetDateTime::now_utc(),
    )
    .map_err(translate_core_error)?;

    Ok(ApiResult {
        response,
        audit_event: transition_result.audit_event,
        new_state: transition_result.new_state,
    })
}

/// Returns the ordered audit event timeline for a `(client, user)` pair.
///
/// # Errors
///
/// Returns an error if the identifiers are empty or the query fails.
pub fn get_audit_timeline(
    persistence: &mut Persistence,
    client_id: &str,
    user_id: &str,
) -> Result<Vec<AuditEventInfo>, ApiError> {
    let client_id: ClientId = ClientId::new(client_id);
    validate_client_id(&client_id).map_err(translate_domain_error)?;
    let user_id: UserId = UserId::new(user_id);
    cartkeep_domain::validate_user_id(&user_id).map_err(translate_domain_error)?;

    let events: Vec<AuditEvent> = persistence
        .get_audit_timeline(&client_id, &user_id)
        .map_err(translate_persistence_error)?;

    Ok(events.iter().map(audit_event_to_info).collect())
}

/// Returns a specific audit event by its ID.
///
/// # Errors
///
/// Returns `ResourceNotFound` if no event with this ID exists.
pub fn get_audit_event(
    persistence: &mut Persistence,
    event_id: i64,
) -> Result<AuditEventInfo, ApiError> {
    let event: AuditEvent = persistence
        .get_audit_event(event_id)
        .map_err(translate_persistence_error)?;

    Ok(audit_event_to_info(&event))
}

/// Converts an `AuditEvent` to its wire representation.
fn audit_event_to_info(event: &AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        client_id: event.client_id.value().to_string(),
        user_id: event.user_id.value().to_string(),
    }
}

/// Parses a wire cart payload into a domain record.
///
/// The line items are the source of truth: line totals and cart
/// aggregates are rederived, and the core transition revalidates the
/// assembled record.
fn info_to_record(info: &CartInfo) -> Result<CartRecord, ApiError> {
    let status: CartStatus = info.status.parse().map_err(translate_domain_error)?;
    let created_at: OffsetDateTime = parse_timestamp(&info.created_at, "createdAt")?;
    let last_modified_at: OffsetDateTime = parse_timestamp(&info.last_modified_at, "lastModifiedAt")?;

    let items: Vec<CartLineItem> = info
        .items
        .iter()
        .map(|item| {
            CartLineItem::new(
                item.product_id.clone(),
                item.product_name.clone(),
                item.product_code.clone(),
                item.quantity,
                item.unit_price,
            )
        })
        .collect();

    let mut record: CartRecord = CartRecord::new(
        CartId::new(&info.cart_id),
        ClientId::new(&info.client_id),
        UserId::new(&info.user_id),
        status,
        items,
        created_at,
    );
    record.last_modified_at = last_modified_at;

    Ok(record)
}

fn parse_timestamp(value: &str, field: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse timestamp '{value}': {e}"),
    })
}

fn cart_not_found(cart_id: &str) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Cart"),
        message: format!("Cart '{cart_id}' does not exist"),
    }
}
