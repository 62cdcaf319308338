//! Payment orchestration against an LNbits-compatible backend.
//!
//! The backend is the system of record: nothing is cached or persisted here,
//! and every confirmation re-queries it before the fulfillment endpoint is
//! notified.

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use tracing::{debug, info};

use satgate_common::currency;
use satgate_common::invoice::{invoice_memo, Invoice, InvoiceRequest};
use satgate_common::payment::{Payment, PaymentAction, PaymentRequest};

use crate::error::PaymentError;

/// Header carrying the backend API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Action tag the fulfillment endpoint dispatches on.
const FULFILL_ACTION: &str = "blink";

/// Read-only connection settings, built once at startup and shared by every
/// request.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Invoice endpoint of the payment backend.
    pub payment_url: String,
    pub api_key: String,
    /// Wallet this gateway collects into.
    pub wallet_id: String,
    /// Callback URL registered with each created invoice.
    pub webhook_url: String,
    /// Fulfillment endpoint notified on confirmed payments, when deployed.
    pub success_url: Option<String>,
}

/// Stateless client for invoice creation, status checks and confirmation.
pub struct PaymentService {
    config: BackendConfig,
    client: reqwest::Client,
}

impl PaymentService {
    pub fn new(config: BackendConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Whether a fulfillment endpoint is deployed alongside this gateway.
    pub fn fulfillment_configured(&self) -> bool {
        self.config.success_url.is_some()
    }

    /// Wallet this gateway collects into.
    pub fn wallet_id(&self) -> &str {
        &self.config.wallet_id
    }

    /// Validate a merchant request and create an invoice at the backend.
    ///
    /// Fails fast on the first broken rule; nothing is sent to the backend
    /// unless all rules pass.
    pub async fn create_invoice(&self, request: &PaymentRequest) -> Result<Invoice, PaymentError> {
        if request.amount == 0 {
            return Err(PaymentError::MissingAmount);
        }
        if request.currency.is_empty() {
            return Err(PaymentError::MissingCurrency);
        }
        if !currency::is_supported(&request.currency) {
            return Err(PaymentError::UnsupportedCurrency(request.currency.clone()));
        }

        let body = InvoiceRequest::incoming(
            request.amount,
            invoice_memo(request.item.as_deref()),
            &self.config.webhook_url,
        );
        let invoice = self.submit_invoice(&body).await?;
        info!(
            checking_id = %invoice.checking_id,
            amount = request.amount,
            "invoice created"
        );
        Ok(invoice)
    }

    async fn submit_invoice(&self, body: &InvoiceRequest) -> Result<Invoice, PaymentError> {
        let response = self
            .client
            .post(&self.config.payment_url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        if response.status() != StatusCode::CREATED {
            return Err(PaymentError::UnexpectedStatus {
                status: response.status().as_u16(),
                expected: StatusCode::CREATED.as_u16(),
            });
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Query the backend for settlement records matching a checking id.
    ///
    /// Read-only and safe to repeat; ordering is whatever the backend
    /// returned. An empty id is forwarded for the backend to reject.
    pub async fn check_payment(&self, checking_id: &str) -> Result<Vec<Payment>, PaymentError> {
        let response = self
            .client
            .get(&self.config.payment_url)
            .query(&[("checking_id", checking_id)])
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(PaymentError::UnexpectedStatus {
                status: response.status().as_u16(),
                expected: StatusCode::OK.as_u16(),
            });
        }
        let text = response.text().await?;
        let payments: Vec<Payment> = serde_json::from_str(&text)?;
        debug!(checking_id, records = payments.len(), "checked payment");
        Ok(payments)
    }

    /// Re-verify a reported payment and notify the fulfillment endpoint.
    ///
    /// The claim is never trusted: the backend is asked again, and only a
    /// settled record counts. Notification is at-most-once per call; a
    /// failed notification is not retried and the confirmation fails.
    pub async fn confirm_paid(&self, claim: &Payment) -> Result<(), PaymentError> {
        if claim.amount == 0 {
            return Err(PaymentError::MissingAmount);
        }
        if claim.checking_id.is_empty() {
            return Err(PaymentError::MissingCheckingId);
        }

        let records = self.check_payment(&claim.checking_id).await?;
        let record = records.first().ok_or(PaymentError::NotFound)?;
        if record.pending {
            return Err(PaymentError::Pending);
        }
        info!(
            checking_id = %claim.checking_id,
            amount = record.amount,
            "payment confirmed"
        );

        if let Some(success_url) = &self.config.success_url {
            let action = PaymentAction {
                action: FULFILL_ACTION.to_string(),
                checking_id: claim.checking_id.clone(),
                amount: record.amount,
            };
            self.notify_fulfillment(success_url, &action).await?;
            info!(checking_id = %action.checking_id, "fulfillment notified");
        }
        Ok(())
    }

    async fn notify_fulfillment(
        &self,
        success_url: &str,
        action: &PaymentAction,
    ) -> Result<(), PaymentError> {
        let response = self.client.post(success_url).json(action).send().await?;
        if response.status() != StatusCode::OK {
            return Err(PaymentError::UnexpectedStatus {
                status: response.status().as_u16(),
                expected: StatusCode::OK.as_u16(),
            });
        }
        Ok(())
    }
}
