use satgate_common::qr::QrError;
use thiserror::Error;

/// Failures surfaced by the payment workflows.
///
/// Validation variants fire before any network call; `NotFound` and
/// `Pending` are expected outcomes of an unconfirmed payment, not faults,
/// and callers use them to decide whether to poll again.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("amount is required")]
    MissingAmount,

    #[error("currency is required")]
    MissingCurrency,

    #[error("currency {0:?} is not supported")]
    UnsupportedCurrency(String),

    #[error("checking_id is required")]
    MissingCheckingId,

    #[error("payment not found")]
    NotFound,

    #[error("payment is pending")]
    Pending,

    #[error("backend returned status {status}, expected {expected}")]
    UnexpectedStatus { status: u16, expected: u16 },

    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Qr(#[from] QrError),
}

impl PaymentError {
    /// True when the caller's input was invalid, as opposed to a backend or
    /// transport fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaymentError::MissingAmount
                | PaymentError::MissingCurrency
                | PaymentError::UnsupportedCurrency(_)
                | PaymentError::MissingCheckingId
        )
    }
}
