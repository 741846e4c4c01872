//! Textbook RSA for a two-party chat.
//!
//! Key pairs are generated from Miller-Rabin tested primes. Messages are
//! encrypted one UTF-16 code unit (text) or one byte (attachments) at a time
//! and shipped as a base64 envelope of space-separated decimal integers.
//!
//! This is a teaching implementation: there is no padding, no integrity
//! check and no constant-time arithmetic.

pub mod error;
pub mod rsa;
pub mod util;

pub use error::{Result, RsaError};
