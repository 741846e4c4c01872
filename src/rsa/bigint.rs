// RSA Big Integer Operations
// Modular arithmetic over num-bigint for key generation and the message codec

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Greatest common divisor (iterative Euclid).
/// `gcd(a, 0) == a`.
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    let mut a = a.clone();
    let mut b = b.clone();

    while !b.is_zero() {
        let r = &a % &b;
        a = std::mem::replace(&mut b, r);
    }

    a
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Compute modular inverse: a^(-1) mod m, in `[0, m)`.
///
/// Iterative extended Euclid over signed coefficients. Returns None when
/// `gcd(a, m) != 1`; the key generator never asks for that case.
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let modulus = BigInt::from(m.clone());
    let (mut old_r, mut r) = (BigInt::from(a % m), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &q * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return None;
    }

    old_s.mod_floor(&modulus).to_biguint()
}
