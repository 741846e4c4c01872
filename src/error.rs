// Error types for RSA key generation and the message codec

use thiserror::Error;

/// Errors produced by the RSA core and its persistence helpers.
///
/// Decrypting with the wrong key is not an error: the scheme carries no
/// integrity tag, so a mismatched key yields garbage output instead.
#[derive(Error, Debug)]
pub enum RsaError {
    /// The random byte source failed. Key generation cannot continue.
    #[error("entropy source failure: {0}")]
    Entropy(String),

    /// The envelope is not valid base64 or contains a non-numeric unit.
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    /// A plaintext unit does not fit below the modulus.
    #[error("plaintext unit {unit} is not below the modulus ({modulus_bits}-bit)")]
    UnitOutOfRange { unit: u32, modulus_bits: u64 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Stored key material could not be parsed.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for RSA operations
pub type Result<T> = std::result::Result<T, RsaError>;
