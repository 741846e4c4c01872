// RSA Decryption Implementation
// Reverses the per-unit encryption and guesses the payload type

use num_traits::ToPrimitive;

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use super::envelope;
use super::keygen::RsaPrivateKey;
use super::message::{classify, Message};
use crate::error::Result;

/// Decrypt an envelope, classifying the result as text or bytes.
///
/// All-ASCII output is returned as text, so an attachment made only of
/// ASCII bytes comes back as `Message::Text`. A wrong key is not detected.
pub fn decrypt(envelope: &str, private_key: &RsaPrivateKey) -> Result<Message> {
    let units = decrypt_units(envelope, &private_key.d, &private_key.n)?;
    Ok(classify(&units))
}

/// Decrypt an envelope known to carry text.
pub fn decrypt_to_string(envelope: &str, private_key: &RsaPrivateKey) -> Result<String> {
    let units = decrypt_units(envelope, &private_key.d, &private_key.n)?;
    Ok(String::from_utf16_lossy(&units))
}

/// Decrypt an envelope known to carry an attachment.
/// Each recovered unit is truncated to its low byte.
pub fn decrypt_bytes(envelope: &str, private_key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let units = decrypt_units(envelope, &private_key.d, &private_key.n)?;
    Ok(units.into_iter().map(|u| u as u8).collect())
}

/// Decrypt every unit of an envelope with exponent `d` and modulus `n`.
///
/// Recovered values are reduced to 16-bit code units.
pub fn decrypt_units(envelope: &str, d: &RsaBigInt, n: &RsaBigInt) -> Result<Vec<u16>> {
    let mask = from_u64(0xFFFF);

    let units = envelope::unwrap(envelope)?
        .iter()
        .map(|c| {
            let m = mod_pow(c, d, n);
            (&m & &mask).to_u16().unwrap_or_default()
        })
        .collect();

    Ok(units)
}
