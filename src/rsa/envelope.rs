// Ciphertext Envelope
// Encrypted units as space-separated decimals, wrapped in base64

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::debug;

use super::bigint::RsaBigInt;
use crate::error::{Result, RsaError};

/// Separator between encrypted units inside the envelope.
pub const UNIT_DELIMITER: &str = " ";

/// Join encrypted units and base64-encode the result.
/// No units gives the empty envelope.
pub fn wrap(units: &[RsaBigInt]) -> String {
    let joined = units
        .iter()
        .map(|unit| unit.to_str_radix(10))
        .collect::<Vec<_>>()
        .join(UNIT_DELIMITER);

    BASE64.encode(joined)
}

/// Decode an envelope back into encrypted units.
pub fn unwrap(envelope: &str) -> Result<Vec<RsaBigInt>> {
    let raw = BASE64.decode(envelope.trim()).map_err(|e| invalid(format!("bad base64: {}", e)))?;
    let body = String::from_utf8(raw).map_err(|_| invalid("envelope body is not UTF-8".to_string()))?;

    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(UNIT_DELIMITER)
        .enumerate()
        .map(|(i, token)| parse_unit(i, token))
        .collect()
}

fn parse_unit(index: usize, token: &str) -> Result<RsaBigInt> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("unit {} is not a decimal integer", index)));
    }

    RsaBigInt::parse_bytes(token.as_bytes(), 10)
        .ok_or_else(|| invalid(format!("unit {} is not a decimal integer", index)))
}

fn invalid(reason: String) -> RsaError {
    debug!(%reason, "rejected ciphertext envelope");
    RsaError::InvalidCiphertext(reason)
}
