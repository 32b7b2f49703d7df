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
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use cartkeep::TransitionResult;
use cartkeep_api::{
    ApiError, ApiResult, AuditEventInfo, GetCartResponse, ListCartsRequest, ListCartsResponse,
    RestoreCartRequest, RestoreCartResponse, export_carts_csv, get_audit_event,
    get_audit_timeline, get_cart, list_carts, restore_cart,
};
use cartkeep_audit::{Actor, Cause};
use cartkeep_persistence::{Persistence, PersistenceError};

mod seed;

/// Fallback actor identity for mutations issued without an `actorId`.
const DEFAULT_ACTOR_ID: &str = "back-office";

/// Cartkeep Server - HTTP server for the cart lifecycle back office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to a JSON seed file of cart records imported at startup
    #[arg(short, long)]
    seed: Option<String>,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind one `Mutex`, so mutations for any
/// `(client, user)` pair are serialized: two concurrent restores can
/// never interleave and leave two active carts.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for cart records and audit events.
    persistence: Arc<Mutex<Persistence>>,
}

/// Query parameters for listing carts.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCartsQuery {
    /// The client whose carts to list.
    client_id: String,
    /// Optional user filter.
    user_id: Option<String>,
}

/// Query parameters for mutating endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationQuery {
    /// Optional operator identity recorded in the audit trail.
    actor_id: Option<String>,
}

/// Query parameters for the CSV export.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportCartsQuery {
    /// The client whose carts to export.
    client_id: String,
    /// Optional user filter.
    user_id: Option<String>,
}

/// Query parameters for the audit timeline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditTimelineQuery {
    /// The client scope.
    client_id: String,
    /// The user scope.
    user_id: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error message.
    error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Builds the audit actor for a mutating request.
fn request_actor(actor_id: Option<String>) -> Actor {
    let id: String = actor_id.unwrap_or_else(|| String::from(DEFAULT_ACTOR_ID));
    Actor::new(id, String::from("operator"))
}

/// Handler for GET /carts endpoint.
///
/// Lists all carts for a client, optionally narrowed to one user.
async fn handle_list_carts(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<ListCartsQuery>,
) -> Result<Json<ListCartsResponse>, HttpError> {
    info!(
        client_id = %params.client_id,
        user_id = params.user_id.as_deref().unwrap_or("<all>"),
        "Handling list_carts request"
    );

    let request: ListCartsRequest = ListCartsRequest {
        client_id: params.client_id,
        user_id: params.user_id,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: ListCartsResponse = list_carts(&mut persistence, &request)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/carts/{cart_id}` endpoint.
///
/// Fetches a single cart record.
async fn handle_get_cart(
    AxumState(app_state): AxumState<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<GetCartResponse>, HttpError> {
    info!(cart_id = %cart_id, "Handling get_cart request");

    let mut persistence = app_state.persistence.lock().await;
    let response: GetCartResponse = get_cart(&mut persistence, &cart_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/carts/{cart_id}/restore` endpoint.
///
/// Restores an archived cart, archiving whatever cart was previously
/// active for the same `(client, user)` pair. The read-apply-persist
/// sequence runs under the persistence lock so the single-active-cart
/// invariant cannot be observed broken by a concurrent caller.
async fn handle_restore_cart(
    AxumState(app_state): AxumState<AppState>,
    Path(cart_id): Path<String>,
    Query(params): Query<MutationQuery>,
) -> Result<Json<RestoreCartResponse>, HttpError> {
    info!(cart_id = %cart_id, "Handling restore_cart request");

    let actor: Actor = request_actor(params.actor_id);
    let cause: Cause = Cause::new(
        format!("http-restore:{cart_id}"),
        String::from("Cart restore requested via back office"),
    );

    let request: RestoreCartRequest = RestoreCartRequest {
        cart_id: cart_id.clone(),
    };

    let mut persistence = app_state.persistence.lock().await;
    let api_result: ApiResult<RestoreCartResponse> =
        restore_cart(&mut persistence, &request, actor, cause)?;
    let event_id: i64 = persistence.persist_transition(&TransitionResult {
        new_state: api_result.new_state,
        audit_event: api_result.audit_event,
    })?;
    drop(persistence);

    info!(event_id, cart_id = %cart_id, "Successfully restored cart");

    Ok(Json(api_result.response))
}

/// Handler for GET /carts/export endpoint.
///
/// Renders cart summaries for a client as CSV.
async fn handle_export_carts(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<ExportCartsQuery>,
) -> Result<Response, HttpError> {
    info!(client_id = %params.client_id, "Handling export_carts request");

    let mut persistence = app_state.persistence.lock().await;
    let csv: String = export_carts_csv(
        &mut persistence,
        &params.client_id,
        params.user_id.as_deref(),
    )?;
    drop(persistence);

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv).into_response())
}

/// Handler for GET /audit/timeline endpoint.
///
/// Returns the ordered audit event timeline for a `(client, user)` pair.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<AuditTimelineQuery>,
) -> Result<Json<Vec<AuditEventInfo>>, HttpError> {
    info!(
        client_id = %params.client_id,
        user_id = %params.user_id,
        "Handling get_audit_timeline request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEventInfo> =
        get_audit_timeline(&mut persistence, &params.client_id, &params.user_id)?;
    drop(persistence);

    Ok(Json(events))
}

/// Handler for GET `/audit/events/{event_id}` endpoint.
///
/// Returns a specific audit event by its ID.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventInfo>, HttpError> {
    info!(event_id, "Handling get_audit_event request");

    let mut persistence = app_state.persistence.lock().await;
    let event: AuditEventInfo = get_audit_event(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(event))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/carts", get(handle_list_carts))
        .route("/carts/export", get(handle_export_carts))
        .route("/carts/{cart_id}", get(handle_get_cart))
        .route("/carts/{cart_id}/restore", post(handle_restore_cart))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/events/{event_id}", get(handle_get_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Cartkeep Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Import seed carts before accepting traffic
    if let Some(seed_path) = &args.seed {
        let imported: usize = seed::seed_from_file(&mut persistence, seed_path)?;
        info!(imported, "Seed import complete");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use cartkeep_api::{CartInfo, CartLineItemInfo, ImportCartRequest, import_cart};
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
        }
    }

    /// Helper to create a wire-format cart record for seeding.
    fn create_test_cart_info(
        cart_id: &str,
        client_id: &str,
        user_id: &str,
        status: &str,
    ) -> CartInfo {
        CartInfo {
            cart_id: cart_id.to_string(),
            client_id: client_id.to_string(),
            user_id: user_id.to_string(),
            status: status.to_string(),
            items: vec![CartLineItemInfo {
                product_id: String::from("p-10"),
                product_name: String::from("Mineral water 500ml"),
                product_code: String::from("MW-500"),
                quantity: 6,
                unit_price: Decimal::new(250, 2),
                line_total: Decimal::new(1500, 2),
            }],
            total_item_count: 6,
            total_value: Decimal::new(1500, 2),
            created_at: String::from("2026-03-01T10:00:00Z"),
            last_modified_at: String::from("2026-03-01T10:00:00Z"),
        }
    }

    /// Seeds a cart directly through the import command path.
    fn seed_cart(persistence: &mut Persistence, info: CartInfo) {
        let actor: Actor = Actor::new(String::from("test"), String::from("system"));
        let cause: Cause = Cause::new(String::from("test-seed"), String::from("Test seed"));
        let result = import_cart(
            persistence,
            &ImportCartRequest { cart: info },
            actor,
            cause,
        )
        .expect("import should succeed");
        persistence
            .persist_transition(&TransitionResult {
                new_state: result.new_state,
                audit_event: result.audit_event,
            })
            .expect("persist should succeed");
    }

    /// Seeds A(active) and B(archived) for client 1 / user 1-1 plus
    /// C(active) for client 1 / user 1-2.
    async fn seed_standard_carts(app_state: &AppState) {
        let mut persistence = app_state.persistence.lock().await;
        seed_cart(
            &mut persistence,
            create_test_cart_info("A", "1", "1-1", "active"),
        );
        seed_cart(
            &mut persistence,
            create_test_cart_info("B", "1", "1-1", "archived"),
        );
        seed_cart(
            &mut persistence,
            create_test_cart_info("C", "1", "1-2", "active"),
        );
    }

    async fn get_json<T: serde::de::DeserializeOwned>(app: Router, uri: &str) -> (HttpStatusCode, T) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    async fn post_restore(app: Router, cart_id: &str) -> (HttpStatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/carts/{cart_id}/restore"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status: HttpStatusCode = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body_bytes.to_vec())
    }

    #[tokio::test]
    async fn test_list_carts_for_client_spans_users() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, response): (HttpStatusCode, ListCartsResponse) =
            get_json(app, "/carts?clientId=1").await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response.total, 3);
        assert_eq!(response.data.len(), 3);
    }

    #[tokio::test]
    async fn test_list_carts_narrowed_to_user() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, response): (HttpStatusCode, ListCartsResponse) =
            get_json(app, "/carts?clientId=1&userId=1-1").await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response.total, 2);

        let mut ids: Vec<&str> = response
            .data
            .iter()
            .map(|cart| cart.cart_id.as_str())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_list_carts_unknown_client_is_empty() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, response): (HttpStatusCode, ListCartsResponse) =
            get_json(app, "/carts?clientId=999").await;

        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(response.total, 0);
    }

    #[tokio::test]
    async fn test_list_carts_empty_client_id_is_bad_request() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/carts?clientId=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_restore_swaps_active_cart_and_spares_other_users() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, body): (HttpStatusCode, Vec<u8>) = post_restore(app.clone(), "B").await;
        assert_eq!(status, HttpStatusCode::OK);

        let restored: RestoreCartResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(restored.data.cart_id, "B");
        assert_eq!(restored.data.status, "active");
        assert_eq!(restored.message, "Cart 'B' restored");

        let (_, a): (HttpStatusCode, GetCartResponse) = get_json(app.clone(), "/carts/A").await;
        let (_, c): (HttpStatusCode, GetCartResponse) = get_json(app, "/carts/C").await;

        assert_eq!(a.data.status, "archived");
        assert_eq!(c.data.status, "active");
    }

    #[tokio::test]
    async fn test_restore_unknown_cart_returns_error_envelope() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, body): (HttpStatusCode, Vec<u8>) = post_restore(app.clone(), "999").await;

        assert_eq!(status, HttpStatusCode::NOT_FOUND);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error.error.contains("999"));

        // Store state is identical before and after.
        let (_, response): (HttpStatusCode, ListCartsResponse) =
            get_json(app, "/carts?clientId=1&userId=1-1").await;
        let statuses: Vec<(&str, &str)> = response
            .data
            .iter()
            .map(|cart| (cart.cart_id.as_str(), cart.status.as_str()))
            .collect();
        assert!(statuses.contains(&("A", "active")));
        assert!(statuses.contains(&("B", "archived")));
    }

    #[tokio::test]
    async fn test_restore_already_active_cart_is_safe() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, body): (HttpStatusCode, Vec<u8>) = post_restore(app.clone(), "A").await;
        assert_eq!(status, HttpStatusCode::OK);

        let restored: RestoreCartResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(restored.data.status, "active");

        let (_, response): (HttpStatusCode, ListCartsResponse) =
            get_json(app, "/carts?clientId=1&userId=1-1").await;
        let active: usize = response
            .data
            .iter()
            .filter(|cart| cart.status == "active")
            .count();
        assert_eq!(active, 1);
    }

    #[tokio::test]
    async fn test_restore_records_custom_actor_in_audit_trail() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/carts/B/restore?actorId=ana")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let (_, timeline): (HttpStatusCode, Vec<AuditEventInfo>) =
            get_json(app, "/audit/timeline?clientId=1&userId=1-1").await;

        let restore_event = timeline
            .iter()
            .find(|event| event.action_name == "RestoreCart")
            .expect("restore event should be recorded");
        assert_eq!(restore_event.actor_id, "ana");
    }

    #[tokio::test]
    async fn test_get_cart_found_and_not_found() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (status, cart): (HttpStatusCode, GetCartResponse) =
            get_json(app.clone(), "/carts/A").await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(cart.data.cart_id, "A");

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/carts/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_carts_returns_csv() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/carts/export?clientId=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv"
        );

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let csv: String = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_audit_timeline_lists_lifecycle_events() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (_, _): (HttpStatusCode, Vec<u8>) = post_restore(app.clone(), "B").await;

        let (status, timeline): (HttpStatusCode, Vec<AuditEventInfo>) =
            get_json(app, "/audit/timeline?clientId=1&userId=1-1").await;

        assert_eq!(status, HttpStatusCode::OK);
        let actions: Vec<&str> = timeline
            .iter()
            .map(|event| event.action_name.as_str())
            .collect();
        assert_eq!(actions, vec!["ImportCart", "ImportCart", "RestoreCart"]);
    }

    #[tokio::test]
    async fn test_audit_event_fetch_by_id() {
        let app_state: AppState = create_test_app_state();
        seed_standard_carts(&app_state).await;
        let app: Router = build_router(app_state);

        let (_, timeline): (HttpStatusCode, Vec<AuditEventInfo>) =
            get_json(app.clone(), "/audit/timeline?clientId=1&userId=1-1").await;
        let event_id: i64 = timeline[0].event_id.unwrap();

        let (status, event): (HttpStatusCode, AuditEventInfo) =
            get_json(app.clone(), &format!("/audit/events/{event_id}")).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(event.event_id, Some(event_id));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/audit/events/424242")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
