//! Provenance ledger daemon.
//!
//! Serves the product-tracking ledger over JSON/HTTP for the dashboard
//! UI. The ledger lives behind a single `RwLock`: every mutating handler
//! holds the write guard across its whole validate-mutate-append-snapshot
//! sequence, reproducing the total ordering the store's semantics assume,
//! while reads share the read guard.
//!
//! Caller identity travels as a `caller` field in mutation bodies;
//! wallet and signature plumbing sit outside this daemon's trust
//! boundary, the same way a deployed record store trusts its chain to
//! authenticate and order submissions.

mod persist;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use provenance_common::account::AccountId;
use provenance_common::history::HistoryEvent;
use provenance_common::product::ProductId;
use provenance_common::roles::Role;
use provenance_ledger::{Ledger, LedgerError, ProductBasicDetails, ProductDeliveryDetails};

#[derive(Parser)]
#[command(name = "provenance-node", about = "Product-tracking ledger daemon")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, default_value_t = 3040)]
    port: u16,

    /// Ledger snapshot path (default: platform data dir).
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Genesis administrator account (0x…). Required when no snapshot
    /// exists yet; ignored once one does.
    #[arg(long)]
    admin: Option<AccountId>,

    /// Generate a fresh account keypair, print it, and exit.
    #[arg(long)]
    gen_account: bool,
}

struct AppState {
    ledger: RwLock<Ledger>,
    state_file: PathBuf,
}

/// Persist the committed state. A failed snapshot is logged, not
/// surfaced: the mutation has already been ordered and applied.
fn snapshot(state: &AppState, ledger: &Ledger) {
    if let Err(e) = persist::save(&state.state_file, ledger) {
        error!(path = %state.state_file.display(), "snapshot failed: {e:#}");
    }
}

// ─── API types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct AddProductRequest {
    caller: AccountId,
    name: String,
    price: u128,
    stock: u32,
}

#[derive(Serialize)]
struct AddProductResponse {
    id: ProductId,
}

#[derive(Deserialize)]
struct UpdateLocationRequest {
    caller: AccountId,
    location: String,
}

#[derive(Deserialize)]
struct UpdateStatusRequest {
    caller: AccountId,
    status: String,
}

#[derive(Deserialize)]
struct UpdatePriceRequest {
    caller: AccountId,
    price: u128,
}

#[derive(Deserialize)]
struct UpdateStockRequest {
    caller: AccountId,
    stock: u32,
}

#[derive(Deserialize)]
struct TransferRequest {
    caller: AccountId,
    new_owner: AccountId,
}

#[derive(Deserialize)]
struct PurchaseRequest {
    caller: AccountId,
    quantity: u32,
    payment: u128,
}

#[derive(Deserialize)]
struct CallerRequest {
    caller: AccountId,
}

#[derive(Deserialize)]
struct HasRoleQuery {
    role: Role,
    account: AccountId,
}

#[derive(Serialize)]
struct HasRoleResponse {
    has_role: bool,
}

#[derive(Deserialize)]
struct GrantRoleRequest {
    caller: AccountId,
    role: Role,
    account: AccountId,
}

#[derive(Serialize)]
struct OkResponse {
    ok: bool,
}

#[derive(Serialize)]
struct CountResponse {
    count: u64,
}

#[derive(Serialize)]
struct BalanceResponse {
    account: AccountId,
    balance: u128,
}

#[derive(Serialize)]
struct HistoryResponse {
    events: Vec<HistoryEvent>,
    /// Packed display strings for dashboards that render the legacy
    /// "{description} (Timestamp: {n})" encoding.
    packed: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: LedgerError) -> HandlerError {
    let status = match &err {
        LedgerError::Unauthorized(_) => StatusCode::FORBIDDEN,
        LedgerError::InvalidState(_) => StatusCode::CONFLICT,
        LedgerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LedgerError::PaymentMismatch { .. } => StatusCode::PAYMENT_REQUIRED,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn bad_request(message: String) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: message }),
    )
}

// ─── Mutation handlers ───────────────────────────────────────────────────────

async fn add_product_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddProductRequest>,
) -> Result<Json<AddProductResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    let id = ledger
        .add_product(req.caller, &req.name, req.price, req.stock, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = %id, caller = %req.caller, "product added");
    Ok(Json(AddProductResponse { id }))
}

async fn update_location_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .update_location(req.caller, ProductId(id), &req.location, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, "location updated");
    Ok(Json(OkResponse { ok: true }))
}

async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .update_status(req.caller, ProductId(id), &req.status, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, "status updated");
    Ok(Json(OkResponse { ok: true }))
}

async fn update_price_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdatePriceRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .update_product_price(req.caller, ProductId(id), req.price, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, "price updated");
    Ok(Json(OkResponse { ok: true }))
}

async fn update_stock_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateStockRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .update_product_stock(req.caller, ProductId(id), req.stock, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, "stock updated");
    Ok(Json(OkResponse { ok: true }))
}

async fn remove_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .remove_product(req.caller, ProductId(id), Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, "product removed");
    Ok(Json(OkResponse { ok: true }))
}

async fn transfer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .transfer_product(req.caller, ProductId(id), req.new_owner, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, new_owner = %req.new_owner, "custody transferred");
    Ok(Json(OkResponse { ok: true }))
}

async fn purchase_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .purchase_product(req.caller, ProductId(id), req.quantity, req.payment, Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(
        product = id,
        caller = %req.caller,
        quantity = req.quantity,
        "product purchased"
    );
    Ok(Json(OkResponse { ok: true }))
}

async fn mark_delivered_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<CallerRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .mark_delivered(req.caller, ProductId(id), Utc::now())
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(product = id, caller = %req.caller, "delivery confirmed");
    Ok(Json(OkResponse { ok: true }))
}

async fn grant_role_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GrantRoleRequest>,
) -> Result<Json<OkResponse>, HandlerError> {
    let mut ledger = state.ledger.write().await;
    ledger
        .grant_role(req.caller, req.role, req.account)
        .map_err(error_response)?;
    snapshot(&state, &ledger);
    info!(caller = %req.caller, role = %req.role, account = %req.account, "role granted");
    Ok(Json(OkResponse { ok: true }))
}

// ─── Read handlers ───────────────────────────────────────────────────────────

async fn basic_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ProductBasicDetails>, HandlerError> {
    let ledger = state.ledger.read().await;
    let details = ledger
        .get_product_basic_details(ProductId(id))
        .map_err(error_response)?;
    Ok(Json(details))
}

async fn delivery_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ProductDeliveryDetails>, HandlerError> {
    let ledger = state.ledger.read().await;
    let details = ledger
        .get_product_delivery_details(ProductId(id))
        .map_err(error_response)?;
    Ok(Json(details))
}

async fn history_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<HistoryResponse>, HandlerError> {
    let ledger = state.ledger.read().await;
    let events = ledger
        .get_history(ProductId(id))
        .map_err(error_response)?
        .to_vec();
    let packed = events.iter().map(HistoryEvent::packed).collect();
    Ok(Json(HistoryResponse { events, packed }))
}

async fn has_role_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HasRoleQuery>,
) -> Json<HasRoleResponse> {
    let ledger = state.ledger.read().await;
    Json(HasRoleResponse {
        has_role: ledger.has_role(query.role, query.account),
    })
}

async fn count_handler(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    let ledger = state.ledger.read().await;
    Json(CountResponse {
        count: ledger.product_count(),
    })
}

async fn balance_handler(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<Json<BalanceResponse>, HandlerError> {
    let account: AccountId = account.parse().map_err(bad_request)?;
    let ledger = state.ledger.read().await;
    Ok(Json(BalanceResponse {
        account,
        balance: ledger.balance_of(account),
    }))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn generate_account() {
    use rand::rngs::OsRng;

    let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
    let account = AccountId::from_verifying_key(&signing_key.verifying_key());
    println!("account: {account}");
    println!("secret:  {}", hex::encode(signing_key.to_bytes()));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if cli.gen_account {
        generate_account();
        return Ok(());
    }

    let state_file = cli
        .state_file
        .clone()
        .unwrap_or_else(persist::default_state_file);

    let ledger = match persist::load(&state_file)? {
        Some(ledger) => {
            info!(path = %state_file.display(), "loaded ledger snapshot");
            if cli.admin.is_some() {
                info!("--admin ignored: ledger already initialized");
            }
            ledger
        }
        None => {
            let admin = cli.admin.ok_or_else(|| {
                anyhow::anyhow!(
                    "no snapshot at {}; --admin is required to initialize a new ledger",
                    state_file.display()
                )
            })?;
            if admin.is_zero() {
                anyhow::bail!("--admin must not be the zero account");
            }
            info!(%admin, "initializing fresh ledger");
            Ledger::new(admin)
        }
    };

    let state = Arc::new(AppState {
        ledger: RwLock::new(ledger),
        state_file,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/products", post(add_product_handler))
        .route(
            "/products/{id}",
            get(basic_details_handler).delete(remove_product_handler),
        )
        .route("/products/{id}/delivery", get(delivery_details_handler))
        .route("/products/{id}/location", post(update_location_handler))
        .route("/products/{id}/status", post(update_status_handler))
        .route("/products/{id}/price", post(update_price_handler))
        .route("/products/{id}/stock", post(update_stock_handler))
        .route("/products/{id}/transfer", post(transfer_handler))
        .route("/products/{id}/purchase", post(purchase_handler))
        .route("/products/{id}/delivered", post(mark_delivered_handler))
        .route("/products/{id}/history", get(history_handler))
        .route("/roles/has", get(has_role_handler))
        .route("/roles/grant", post(grant_role_handler))
        .route("/count", get(count_handler))
        .route("/balances/{account}", get(balance_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state.clone());

    let addr = format!("0.0.0.0:{}", cli.port);
    info!(%addr, "provenance node listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
