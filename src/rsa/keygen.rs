// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::time::Instant;

use num_traits::One;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use tracing::debug;

use super::bigint::{from_u64, gcd, mod_inverse, RsaBigInt};
use super::message::Message;
use super::prime::{generate_distinct_primes, MILLER_RABIN_ROUNDS};
use crate::error::{Result, RsaError};

/// Modulus size used by `generate_keypair`.
pub const DEFAULT_KEY_BITS: u32 = 1024;

/// First public exponent tried; scanning moves upward from here.
pub const DEFAULT_PUBLIC_EXPONENT: u64 = 65537;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: RsaBigInt, // Public exponent
    pub n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub d: RsaBigInt, // Private exponent
    pub n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair (both public and private keys)
///
/// Never mutated after generation; regenerating means building a new pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Encrypt a message using this public key
    /// Returns the base64 envelope
    pub fn encrypt(&self, message: &Message) -> Result<String> {
        super::encrypt::encrypt(message, self)
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }

    /// Decrypt an envelope using this private key
    pub fn decrypt(&self, envelope: &str) -> Result<Message> {
        super::decrypt::decrypt(envelope, self)
    }
}

impl RsaKeyPair {
    /// Get the bit length of the key
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

/// Key generation settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub bit_length: u32,
    pub public_exponent: u64,
    pub primality_rounds: u32,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            bit_length: DEFAULT_KEY_BITS,
            public_exponent: DEFAULT_PUBLIC_EXPONENT,
            primality_rounds: MILLER_RABIN_ROUNDS,
        }
    }
}

impl KeyGenConfig {
    pub fn with_bit_length(mut self, bit_length: u32) -> Self {
        self.bit_length = bit_length;
        self
    }

    pub fn with_public_exponent(mut self, e: u64) -> Self {
        self.public_exponent = e;
        self
    }

    pub fn with_primality_rounds(mut self, rounds: u32) -> Self {
        self.primality_rounds = rounds;
        self
    }
}

/// Generate a 1024-bit key pair from the operating system's random source.
pub fn generate_keypair() -> Result<RsaKeyPair> {
    generate_keypair_with(&KeyGenConfig::default(), &mut OsRng)
}

/// Generate RSA key pair with the given settings and random source
pub fn generate_keypair_with<R>(config: &KeyGenConfig, rng: &mut R) -> Result<RsaKeyPair>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if config.bit_length < 8 {
        return Err(RsaError::InvalidParameter(format!(
            "key length must be at least 8 bits, got {}",
            config.bit_length
        )));
    }
    if config.public_exponent < 3 {
        return Err(RsaError::InvalidParameter(format!(
            "public exponent must be at least 3, got {}",
            config.public_exponent
        )));
    }

    let started = Instant::now();
    debug!(bit_length = config.bit_length, "generating RSA key pair");

    // Step 1: two random primes p != q of half the modulus size
    let (p, q) = generate_distinct_primes(config.bit_length, config.primality_rounds, rng)?;

    let keypair = keypair_from_primes(&p, &q, config.public_exponent)?;

    debug!(
        modulus_bits = keypair.bit_length(),
        e = %keypair.public_key.e,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated RSA key pair"
    );

    Ok(keypair)
}

/// Smallest exponent `>= start` that is coprime with `phi`.
pub fn choose_public_exponent(phi: &RsaBigInt, start: u64) -> RsaBigInt {
    let mut e = from_u64(start);
    while !gcd(&e, phi).is_one() {
        e += 1u8;
    }
    e
}

/// Build the key pair for two distinct primes.
pub(crate) fn keypair_from_primes(
    p: &RsaBigInt,
    q: &RsaBigInt,
    exponent_start: u64,
) -> Result<RsaKeyPair> {
    // Step 2: Compute n = p * q
    let n = p * q;

    // Step 3: Compute φ(n) = (p-1)(q-1)
    let phi_n = (p - 1u8) * (q - 1u8);

    // Step 4: First e coprime with φ(n)
    let e = choose_public_exponent(&phi_n, exponent_start);

    // Step 5: Compute d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &phi_n).ok_or_else(|| {
        RsaError::InvalidParameter("public exponent has no inverse modulo φ(n)".to_string())
    })?;

    Ok(RsaKeyPair {
        public_key: RsaPublicKey { e, n: n.clone() },
        private_key: RsaPrivateKey { d, n },
    })
}

/// Small deterministic key pair for codec tests (16-bit primes).
#[cfg(test)]
pub(crate) fn small_test_keypair(seed: u64) -> RsaKeyPair {
    use rand::SeedableRng;

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let config = KeyGenConfig::default().with_bit_length(32);
    generate_keypair_with(&config, &mut rng).expect("small key generation")
}
