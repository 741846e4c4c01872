//! Persisted key representation.
//!
//! A keyring is one JSON object mapping an actor's key label to
//! `{ "n": "...", "e": "...", "d": "..." }`, every integer written as a
//! decimal string so it survives text-based storage:
//!
//! ```json
//! { "aliceKey": { "n": "3233", "e": "17", "d": "2753" }, "bobKey": { ... } }
//! ```

use std::collections::BTreeMap;

use num_traits::One;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::error::{Result, RsaError};
use crate::rsa::bigint::RsaBigInt;
use crate::rsa::keygen::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};

/// Keyring label used for an actor, e.g. `aliceKey` for "Alice".
pub fn actor_label(actor: &str) -> String {
    format!("{}Key", actor.to_lowercase())
}

/// One actor's key pair flattened to its three integers.
#[serde_as]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredKey {
    #[serde_as(as = "DisplayFromStr")]
    pub n: RsaBigInt,
    #[serde_as(as = "DisplayFromStr")]
    pub e: RsaBigInt,
    #[serde_as(as = "DisplayFromStr")]
    pub d: RsaBigInt,
}

impl StoredKey {
    pub fn to_keypair(&self) -> Result<RsaKeyPair> {
        if self.n <= RsaBigInt::one() {
            return Err(RsaError::InvalidKey("modulus must be greater than 1".to_string()));
        }

        Ok(RsaKeyPair {
            public_key: RsaPublicKey {
                e: self.e.clone(),
                n: self.n.clone(),
            },
            private_key: RsaPrivateKey {
                d: self.d.clone(),
                n: self.n.clone(),
            },
        })
    }
}

impl From<&RsaKeyPair> for StoredKey {
    fn from(keypair: &RsaKeyPair) -> Self {
        Self {
            n: keypair.public_key.n.clone(),
            e: keypair.public_key.e.clone(),
            d: keypair.private_key.d.clone(),
        }
    }
}

/// Key pairs of every actor, keyed by label.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeyRing {
    keys: BTreeMap<String, StoredKey>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a keyring.
    ///
    /// Fields that are not decimal integers are reported as `InvalidKey`.
    pub fn from_json(json: &str) -> Result<Self> {
        let ring: KeyRing = serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                RsaError::InvalidKey(e.to_string())
            } else {
                RsaError::Json(e)
            }
        })?;

        for stored in ring.keys.values() {
            stored.to_keypair()?;
        }

        Ok(ring)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Store a key pair under `label`, replacing any previous pair.
    pub fn insert(&mut self, label: &str, keypair: &RsaKeyPair) {
        self.keys.insert(label.to_string(), StoredKey::from(keypair));
    }

    pub fn get(&self, label: &str) -> Result<Option<RsaKeyPair>> {
        self.keys.get(label).map(StoredKey::to_keypair).transpose()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use crate::rsa::keygen::small_test_keypair;

    #[test]
    fn test_keyring_json_shape() {
        let alice = small_test_keypair(40);
        let mut ring = KeyRing::new();
        ring.insert(&actor_label("Alice"), &alice);

        let value: serde_json::Value = serde_json::from_str(&ring.to_json().unwrap()).unwrap();
        let entry = &value["aliceKey"];
        assert_eq!(entry["n"], serde_json::Value::String(alice.public_key.n.to_string()));
        assert_eq!(entry["e"], serde_json::Value::String(alice.public_key.e.to_string()));
        assert_eq!(entry["d"], serde_json::Value::String(alice.private_key.d.to_string()));
    }

    #[test]
    fn test_keyring_reload() {
        let alice = small_test_keypair(41);
        let bob = small_test_keypair(42);

        let mut ring = KeyRing::new();
        ring.insert("aliceKey", &alice);
        ring.insert("bobKey", &bob);

        let reloaded = KeyRing::from_json(&ring.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("aliceKey").unwrap(), Some(alice));
        assert_eq!(reloaded.get("bobKey").unwrap(), Some(bob));
        assert_eq!(reloaded.get("carolKey").unwrap(), None);
    }

    #[test]
    fn test_parse_browser_storage_format() {
        let json = r#"{"aliceKey":{"n":"3233","e":"17","d":"2753"},"bobKey":{"n":"3127","e":"3","d":"2011"}}"#;
        let ring = KeyRing::from_json(json).unwrap();

        let alice = ring.get("aliceKey").unwrap().unwrap();
        assert_eq!(alice.public_key.n, from_u64(3233));
        assert_eq!(alice.public_key.e, from_u64(17));
        assert_eq!(alice.private_key.d, from_u64(2753));
        assert_eq!(ring.labels().collect::<Vec<_>>(), vec!["aliceKey", "bobKey"]);
    }

    #[test]
    fn test_insert_replaces_pair() {
        let mut ring = KeyRing::new();
        ring.insert("aliceKey", &small_test_keypair(43));
        let regenerated = small_test_keypair(44);
        ring.insert("aliceKey", &regenerated);

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("aliceKey").unwrap(), Some(regenerated));
    }

    #[test]
    fn test_rejects_non_decimal_fields() {
        let json = r#"{"aliceKey":{"n":"0x10","e":"17","d":"2753"}}"#;
        assert!(matches!(KeyRing::from_json(json), Err(RsaError::InvalidKey(_))));
    }

    #[test]
    fn test_rejects_degenerate_modulus() {
        let json = r#"{"aliceKey":{"n":"1","e":"17","d":"2753"}}"#;
        assert!(matches!(KeyRing::from_json(json), Err(RsaError::InvalidKey(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(KeyRing::from_json("{"), Err(RsaError::Json(_))));
    }
}
