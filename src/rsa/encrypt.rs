// RSA Encryption Implementation
// Textbook RSA applied to each code unit or byte, no padding

use tracing::trace;

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use super::envelope;
use super::keygen::RsaPublicKey;
use super::message::Message;
use crate::error::{Result, RsaError};

/// Encrypt a message into a base64 envelope.
///
/// Every unit is encrypted on its own, so equal units always produce equal
/// ciphertext under the same key.
pub fn encrypt(message: &Message, public_key: &RsaPublicKey) -> Result<String> {
    encrypt_units(message.units(), &public_key.e, &public_key.n)
}

/// Encrypt a string using RSA public key
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> Result<String> {
    encrypt(&Message::from(plaintext), public_key)
}

/// Encrypt bytes using RSA public key
pub fn encrypt_bytes(plaintext: &[u8], public_key: &RsaPublicKey) -> Result<String> {
    encrypt(&Message::from(plaintext), public_key)
}

/// Encrypt raw unit values with exponent `e` and modulus `n`.
///
/// Units must be below `n`; a larger unit could never be recovered.
pub fn encrypt_units<I>(units: I, e: &RsaBigInt, n: &RsaBigInt) -> Result<String>
where
    I: IntoIterator<Item = u32>,
{
    let encrypted = units
        .into_iter()
        .map(|unit| {
            let m = from_u64(u64::from(unit));
            if &m >= n {
                return Err(RsaError::UnitOutOfRange {
                    unit,
                    modulus_bits: n.bits(),
                });
            }
            Ok(mod_pow(&m, e, n))
        })
        .collect::<Result<Vec<_>>>()?;

    trace!(units = encrypted.len(), "encrypted message");

    Ok(envelope::wrap(&encrypted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::keygen::small_test_keypair;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    #[test]
    fn test_encrypt_string() {
        let keypair = small_test_keypair(1);
        let envelope = encrypt_string("HI", &keypair.public_key).unwrap();

        let body = String::from_utf8(BASE64.decode(&envelope).unwrap()).unwrap();
        let units: Vec<_> = body.split(' ').collect();
        assert_eq!(units.len(), 2);

        let expected = mod_pow(&from_u64(u64::from(b'H')), &keypair.public_key.e, &keypair.public_key.n);
        assert_eq!(units[0], expected.to_string());
    }

    #[test]
    fn test_equal_units_encrypt_equally() {
        let keypair = small_test_keypair(2);
        let envelope = encrypt_bytes(&[9, 9, 9], &keypair.public_key).unwrap();

        let body = String::from_utf8(BASE64.decode(&envelope).unwrap()).unwrap();
        let units: Vec<_> = body.split(' ').collect();
        assert_eq!(units[0], units[1]);
        assert_eq!(units[1], units[2]);
    }

    #[test]
    fn test_encrypt_empty() {
        let keypair = small_test_keypair(3);
        assert_eq!(encrypt_string("", &keypair.public_key).unwrap(), "");
        assert_eq!(encrypt_bytes(&[], &keypair.public_key).unwrap(), "");
    }

    #[test]
    fn test_unit_not_below_modulus() {
        // n = 11 * 13 = 143 cannot carry byte 200
        let result = encrypt_units([65, 200], &from_u64(7), &from_u64(143));
        assert!(matches!(
            result,
            Err(RsaError::UnitOutOfRange { unit: 200, .. })
        ));
    }

    #[test]
    fn test_key_method_matches_free_function() {
        let keypair = small_test_keypair(4);
        let message = Message::from("same");
        assert_eq!(
            keypair.public_key.encrypt(&message).unwrap(),
            encrypt(&message, &keypair.public_key).unwrap()
        );
    }
}
