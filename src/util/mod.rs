// Utilities around the RSA core: key persistence and file handling

pub mod file_ops;
pub mod key_store;

pub use key_store::{KeyRing, StoredKey};
