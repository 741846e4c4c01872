// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod envelope;
pub mod key_file;
pub mod keygen;
pub mod message;
pub mod prime;

pub use decrypt::{decrypt, decrypt_bytes, decrypt_to_string};
pub use encrypt::{encrypt, encrypt_bytes, encrypt_string};
pub use key_file::{export_key_files, KeyFile};
pub use keygen::{
    generate_keypair, generate_keypair_with, KeyGenConfig, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};
pub use message::Message;
