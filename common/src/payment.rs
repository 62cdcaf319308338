use serde::{Deserialize, Serialize};

/// A merchant request to invoice a customer.
///
/// Fields default when absent so that validation, not JSON decoding, reports
/// missing values with a usable message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRequest {
    pub amount: u64,
    pub currency: String,
    /// Free-text label of the item being bought; shows up in the invoice memo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

/// One settlement record as reported by the payment backend.
///
/// The backend omits fields it has no value for; decoding fills those with
/// zero values rather than failing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub checking_id: String,
    /// False only once funds have settled.
    pub pending: bool,
    pub amount: u64,
    pub fee: i64,
    pub memo: String,
    /// Unix timestamp assigned by the backend.
    pub time: i64,
    pub bolt11: String,
    pub preimage: String,
    pub payment_hash: String,
    pub wallet_id: String,
    pub webhook: String,
    pub webhook_status: i64,
}

/// Notification sent to the fulfillment endpoint once a payment is confirmed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAction {
    /// Tag the fulfillment endpoint dispatches on.
    pub action: String,
    pub checking_id: String,
    pub amount: u64,
}
