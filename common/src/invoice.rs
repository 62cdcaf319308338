use serde::{Deserialize, Serialize};

use crate::currency::SUPPORTED_UNIT;

/// Seconds until an unpaid invoice expires at the backend.
pub const INVOICE_EXPIRY_SECS: u64 = 3600;

/// An invoice issued by the payment backend.
///
/// `checking_id` is the durable handle for every later status query; it is
/// the only correlation key between invoice creation and confirmation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    pub payment_hash: String,
    /// BOLT11-encoded payable string the payer's wallet interprets.
    pub payment_request: String,
    pub checking_id: String,
}

/// Body of a backend invoice-creation call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Always false: this service only receives funds.
    pub out: bool,
    pub amount: u64,
    pub memo: String,
    pub expiry: u64,
    pub unit: String,
    /// URL the backend calls back on payment events.
    pub webhook: String,
    pub internal: bool,
}

impl InvoiceRequest {
    /// Build an incoming-payment request with the fixed fields pinned.
    pub fn incoming(amount: u64, memo: String, webhook: &str) -> Self {
        Self {
            out: false,
            amount,
            memo,
            expiry: INVOICE_EXPIRY_SECS,
            unit: SUPPORTED_UNIT.to_string(),
            webhook: webhook.to_string(),
            internal: false,
        }
    }
}

/// Memo shown in the payer's wallet, optionally labelled with the item
/// being bought.
pub fn invoice_memo(item: Option<&str>) -> String {
    match item {
        Some(item) => format!("Invoice for {item}"),
        None => "Payment".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo_defaults_to_payment() {
        assert_eq!(invoice_memo(None), "Payment");
        assert_eq!(invoice_memo(Some("Flat White")), "Invoice for Flat White");
    }

    #[test]
    fn test_incoming_pins_fixed_fields() {
        let request = InvoiceRequest::incoming(1000, "Payment".to_string(), "http://merchant/hook");
        assert!(!request.out);
        assert!(!request.internal);
        assert_eq!(request.expiry, INVOICE_EXPIRY_SECS);
        assert_eq!(request.unit, "sat");
        assert_eq!(request.amount, 1000);
        assert_eq!(request.webhook, "http://merchant/hook");
    }

    #[test]
    fn test_invoice_request_wire_keys() {
        // The backend contract is fixed; a renamed field would silently break it.
        let value = serde_json::to_value(InvoiceRequest::incoming(
            21,
            "Payment".to_string(),
            "http://merchant/hook",
        ))
        .unwrap();
        let object = value.as_object().unwrap();
        for key in ["out", "amount", "memo", "expiry", "unit", "webhook", "internal"] {
            assert!(object.contains_key(key), "missing wire key {key}");
        }
        assert_eq!(object.len(), 7);
    }
}
