// Prime Generation
// Random odd candidates filtered through Miller-Rabin

use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use tracing::trace;

use super::bigint::{from_u64, mod_pow, RsaBigInt};
use crate::error::{Result, RsaError};

/// Miller-Rabin rounds; false positive probability is at most 4^-40.
pub const MILLER_RABIN_ROUNDS: u32 = 40;

/// Draw a random odd integer of exactly `bit_length` bits.
///
/// Random bytes come from `rng`; the top bit and the low bit are forced on.
/// A failing random source is reported as `RsaError::Entropy`.
pub fn generate_random_odd_bigint<R>(bit_length: u32, rng: &mut R) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bit_length < 2 {
        return Err(RsaError::InvalidParameter(format!(
            "prime candidates need at least 2 bits, got {}",
            bit_length
        )));
    }

    let num_bytes = ((bit_length + 7) / 8) as usize;
    let excess = num_bytes as u32 * 8 - bit_length;
    let top_bit = RsaBigInt::one() << (bit_length - 1);
    let mut buf = vec![0u8; num_bytes];

    loop {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| RsaError::Entropy(e.to_string()))?;

        // Mask off the bits above bit_length
        buf[0] &= 0xFFu8 >> excess;

        let mut candidate = RsaBigInt::from_bytes_be(&buf);
        candidate |= &top_bit;
        candidate |= RsaBigInt::one();

        if candidate.bits() == u64::from(bit_length) && candidate.is_odd() {
            return Ok(candidate);
        }
    }
}

/// Probabilistic primality test with the default 40 rounds.
pub fn is_prime(n: &RsaBigInt) -> bool {
    is_probable_prime(n, MILLER_RABIN_ROUNDS, &mut rand::thread_rng())
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime<R>(n: &RsaBigInt, iterations: u32, rng: &mut R) -> bool
where
    R: RngCore + ?Sized,
{
    if n <= &RsaBigInt::one() {
        return false;
    }
    if n <= &from_u64(3) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let mut d = n - 1u8;
    while d.is_even() {
        d >>= 1;
    }

    (0..iterations).all(|_| miller_rabin_test(n, &d, rng))
}

/// One Miller-Rabin round for odd `n >= 5` with `n - 1 = 2^s * d`.
///
/// Picks a random witness in `[2, n-2]` and returns false when it proves
/// `n` composite.
pub fn miller_rabin_test<R>(n: &RsaBigInt, d: &RsaBigInt, rng: &mut R) -> bool
where
    R: RngCore + ?Sized,
{
    let n_minus_one = n - 1u8;
    let a = rng.gen_biguint_range(&from_u64(2), &n_minus_one);

    let mut x = mod_pow(&a, d, n);
    if x.is_one() || x == n_minus_one {
        return true;
    }

    let mut d = d.clone();
    while d != n_minus_one {
        x = (&x * &x) % n;
        d <<= 1;

        if x.is_one() {
            return false;
        }
        if x == n_minus_one {
            return true;
        }
    }

    false
}

/// Generate a random prime of specified bit length
pub fn generate_prime_number<R>(bit_length: u32, rounds: u32, rng: &mut R) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut rejected = 0u64;

    loop {
        let candidate = generate_random_odd_bigint(bit_length, rng)?;
        if is_probable_prime(&candidate, rounds, rng) {
            trace!(bit_length, rejected, "found prime");
            return Ok(candidate);
        }
        rejected += 1;
    }
}

/// Generate two different primes of `bit_length / 2` bits each.
pub fn generate_distinct_primes<R>(
    bit_length: u32,
    rounds: u32,
    rng: &mut R,
) -> Result<(RsaBigInt, RsaBigInt)>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let half_bits = bit_length / 2;
    // 3 bits is the smallest size holding two odd primes (5 and 7)
    if half_bits < 3 {
        return Err(RsaError::InvalidParameter(format!(
            "{}-bit modulus leaves no room for two distinct odd primes",
            bit_length
        )));
    }

    let p = generate_prime_number(half_bits, rounds, rng)?;
    let mut q = generate_prime_number(half_bits, rounds, rng)?;
    while q == p {
        trace!(half_bits, "second prime collided with the first, redrawing");
        q = generate_prime_number(half_bits, rounds, rng)?;
    }

    Ok((p, q))
}

/// Random source whose every draw fails.
#[cfg(test)]
pub(crate) struct FailingRng;

#[cfg(test)]
impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("entropy source exhausted")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("entropy source exhausted")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("entropy source exhausted")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        Err(rand::Error::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            "entropy source exhausted",
        )))
    }
}

#[cfg(test)]
impl CryptoRng for FailingRng {}
