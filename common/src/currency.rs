/// The only settlement unit the payment backend accepts. Amounts are
/// satoshis end to end; fiat display conversion is the merchant's problem.
pub const SUPPORTED_UNIT: &str = "sat";

/// Whether a caller-supplied currency token can be forwarded to the backend.
pub fn is_supported(unit: &str) -> bool {
    unit == SUPPORTED_UNIT
}
