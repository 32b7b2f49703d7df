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
    clippy::all
)]

mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use export::{CsvExportError, export_carts_csv};
pub use handlers::{
    ApiResult, get_audit_event, get_audit_timeline, get_cart, import_cart, list_carts,
    restore_cart,
};
pub use request_response::{
    AuditEventInfo, CartInfo, CartLineItemInfo, GetCartResponse, ImportCartRequest,
    ListCartsRequest, ListCartsResponse, RestoreCartRequest, RestoreCartResponse, cart_to_info,
};
