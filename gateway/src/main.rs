//! satgate payment gateway daemon.
//!
//! Mediates between a merchant application and an LNbits-compatible payment
//! backend: creates invoices, renders them as scannable QR codes, reports
//! settlement status, and forwards confirmed payments to an optional
//! fulfillment endpoint.
//!
//! The backend stays the system of record: nothing is persisted here, and
//! every confirmation re-queries it before fulfillment is triggered.

mod error;
mod service;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use satgate_common::currency::SUPPORTED_UNIT;
use satgate_common::invoice::Invoice;
use satgate_common::payment::{Payment, PaymentRequest};
use satgate_common::qr::QrImage;

use crate::error::PaymentError;
use crate::service::{BackendConfig, PaymentService};

/// Pixel size of generated QR images.
const QR_SIZE: u32 = 256;

#[derive(Parser)]
#[command(name = "satgate-gateway", about = "Lightning payment gateway")]
struct Cli {
    /// API key for the payment backend.
    #[arg(long, env = "API_KEY")]
    api_key: String,

    /// Wallet identifier at the payment backend.
    #[arg(long, env = "WALLET_ID", default_value = "")]
    wallet_id: String,

    /// Invoice endpoint of the payment backend
    /// (e.g. "https://legend.lnbits.com/api/v1/payments").
    #[arg(long, env = "PAYMENT_URL")]
    payment_url: String,

    /// Webhook URL the backend calls on payment events.
    #[arg(long, env = "WEBHOOK")]
    webhook_url: String,

    /// Fulfillment endpoint notified once a payment is confirmed.
    #[arg(long, env = "SUCCESS_URL")]
    success_url: Option<String>,

    /// HTTP port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

// ─── API types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CheckQuery {
    checking_id: String,
}

#[derive(Deserialize)]
struct GenerateQuery {
    amount: u64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    wallet_id: String,
    fulfillment_configured: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: PaymentError) -> ApiError {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        match &err {
            PaymentError::NotFound => StatusCode::NOT_FOUND,
            PaymentError::Pending => StatusCode::CONFLICT,
            PaymentError::Qr(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        }
    };
    warn!(%err, "request failed");
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn create_payment_handler(
    State(payments): State<Arc<PaymentService>>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let invoice = payments
        .create_invoice(&request)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

async fn get_payment_handler(
    State(payments): State<Arc<PaymentService>>,
    Query(query): Query<CheckQuery>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    if query.checking_id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "checking_id is required".to_string(),
            }),
        ));
    }
    let records = payments
        .check_payment(&query.checking_id)
        .await
        .map_err(error_response)?;
    Ok(Json(records))
}

/// Create an invoice for a bare amount and answer with its QR code.
async fn generate_payment_handler(
    State(payments): State<Arc<PaymentService>>,
    Query(query): Query<GenerateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PaymentRequest {
        amount: query.amount,
        currency: SUPPORTED_UNIT.to_string(),
        item: None,
    };
    let invoice = payments
        .create_invoice(&request)
        .await
        .map_err(error_response)?;

    let qr = QrImage {
        size: QR_SIZE,
        content: invoice.payment_request,
    };
    let png = qr
        .render()
        .map_err(|e| error_response(PaymentError::from(e)))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn paid_handler(
    State(payments): State<Arc<PaymentService>>,
    Json(claim): Json<Payment>,
) -> Result<&'static str, ApiError> {
    payments.confirm_paid(&claim).await.map_err(error_response)?;
    Ok("OK")
}

async fn health_handler(State(payments): State<Arc<PaymentService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        wallet_id: payments.wallet_id().to_string(),
        fulfillment_configured: payments.fulfillment_configured(),
    })
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    info!(
        payment_url = %cli.payment_url,
        webhook = %cli.webhook_url,
        wallet_id = %cli.wallet_id,
        fulfillment_configured = cli.success_url.is_some(),
        "starting payment gateway"
    );

    let service = Arc::new(PaymentService::new(
        BackendConfig {
            payment_url: cli.payment_url,
            api_key: cli.api_key,
            wallet_id: cli.wallet_id,
            webhook_url: cli.webhook_url,
            success_url: cli.success_url,
        },
        reqwest::Client::new(),
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let app = Router::new()
        .route(
            "/payment",
            post(create_payment_handler).get(get_payment_handler),
        )
        .route("/generate", get(generate_payment_handler))
        .route("/paid", post(paid_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(service);

    let addr = format!("0.0.0.0:{}", cli.port);
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server failed");
}
