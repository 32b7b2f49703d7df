// Copyright (C) 2026 The Cartkeep Authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of cart summaries for back-office spreadsheets.
//!
//! Exports one row per cart (line items stay in the JSON API); the
//! columns mirror what the cart listing screens show.

use csv::Writer;
use thiserror::Error;
use tracing::debug;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use cartkeep_domain::{CartRecord, ClientId, UserId, validate_client_id};
use cartkeep_persistence::Persistence;

/// Errors that can occur while rendering the CSV export.
#[derive(Debug, Error)]
pub enum CsvExportError {
    /// Writing a record failed.
    #[error("CSV write failed: {0}")]
    Write(#[from] csv::Error),
    /// Flushing the writer failed.
    #[error("CSV flush failed: {0}")]
    Flush(String),
    /// The rendered buffer was not valid UTF-8.
    #[error("CSV buffer was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<CsvExportError> for ApiError {
    fn from(err: CsvExportError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Column headers for the cart summary export.
const EXPORT_HEADERS: &[&str] = &[
    "cart_id",
    "client_id",
    "user_id",
    "status",
    "total_item_count",
    "total_value",
    "created_at",
    "last_modified_at",
];

/// Renders a CSV document of cart summaries for one client, optionally
/// narrowed to one user.
///
/// # Arguments
///
/// * `persistence` - The persistence layer to query
/// * `client_id` - The client whose carts to export
/// * `user_id` - Optional user filter
///
/// # Errors
///
/// Returns an error if the client identifier is empty, the store query
/// fails, or CSV rendering fails.
pub fn export_carts_csv(
    persistence: &mut Persistence,
    client_id: &str,
    user_id: Option<&str>,
) -> Result<String, ApiError> {
    let client_id: ClientId = ClientId::new(client_id);
    validate_client_id(&client_id).map_err(translate_domain_error)?;

    let user_id: Option<UserId> = user_id.map(UserId::new);

    let carts: Vec<CartRecord> = persistence
        .list_carts(&client_id, user_id.as_ref())
        .map_err(translate_persistence_error)?;

    debug!(
        client_id = client_id.value(),
        cart_count = carts.len(),
        "Rendering cart CSV export"
    );

    Ok(render_csv(&carts)?)
}

fn render_csv(carts: &[CartRecord]) -> Result<String, CsvExportError> {
    let mut writer: Writer<Vec<u8>> = Writer::from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;

    for cart in carts {
        writer.write_record([
            cart.cart_id.value(),
            cart.client_id.value(),
            cart.user_id.value(),
            cart.status.as_str(),
            &cart.total_item_count.to_string(),
            &cart.total_value.to_string(),
            &format_timestamp(cart.created_at),
            &format_timestamp(cart.last_modified_at),
        ])?;
    }

    let buffer: Vec<u8> = writer
        .into_inner()
        .map_err(|e| CsvExportError::Flush(e.to_string()))?;

    Ok(String::from_utf8(buffer)?)
}

fn format_timestamp(timestamp: time::OffsetDateTime) -> String {
    timestamp
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| timestamp.to_string())
}
