use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use rand::rngs::OsRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rsa_messaging::rsa::{generate_keypair_with, KeyGenConfig, Message, RsaKeyPair};
use rsa_messaging::util::file_ops::{load_keyring, save_keyring, write_key_files};
use rsa_messaging::util::key_store::{actor_label, KeyRing};

const ACTORS: [&str; 2] = ["Alice", "Bob"];

const CONVERSATION: [(&str, &str); 4] = [
    ("Alice", "Hi Bob!"),
    ("Bob", "Hey Alice, how are you?"),
    ("Alice", "I'm good, thanks! How about you?"),
    ("Bob", "I'm doing well too, thanks!"),
];

/// Settings read from the environment
struct Settings {
    keyring_path: PathBuf,
    key_dir: PathBuf,
    key_bits: u32,
}

impl Settings {
    fn from_env() -> Result<Self> {
        let key_bits = match env::var("RSA_KEY_BITS") {
            Ok(bits) => bits.parse().context("RSA_KEY_BITS must be an integer")?,
            Err(_) => KeyGenConfig::default().bit_length,
        };

        Ok(Self {
            keyring_path: env::var_os("RSA_KEYRING")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("rsa_keys.json")),
            key_dir: env::var_os("RSA_KEY_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("keys")),
            key_bits,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error running application: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    let ring = load_or_generate(&settings)?;

    let mut keys = Vec::with_capacity(ACTORS.len());
    for actor in ACTORS {
        let keypair = ring
            .get(&actor_label(actor))?
            .with_context(|| format!("no key pair for {}", actor))?;
        write_key_files(&settings.key_dir, actor, &keypair)
            .with_context(|| format!("failed to export key files for {}", actor))?;
        keys.push((actor, keypair));
    }

    for (sender, text) in CONVERSATION {
        let recipient = recipient_of(&keys, sender)?;

        let envelope = recipient.1.public_key.encrypt(&Message::from(text))?;
        let received = recipient.1.private_key.decrypt(&envelope)?;

        println!("{} -> {}: {}", sender, recipient.0, envelope);
        println!("{} reads: {}", recipient.0, received);
    }

    Ok(())
}

fn load_or_generate(settings: &Settings) -> Result<KeyRing> {
    let mut ring = load_keyring(&settings.keyring_path)
        .with_context(|| format!("failed to load {}", settings.keyring_path.display()))?
        .unwrap_or_default();

    let config = KeyGenConfig::default().with_bit_length(settings.key_bits);
    let mut generated = false;

    for actor in ACTORS {
        let label = actor_label(actor);
        if ring.get(&label)?.is_none() {
            info!(actor, bits = config.bit_length, "generating key pair");
            let keypair = generate_keypair_with(&config, &mut OsRng)?;
            ring.insert(&label, &keypair);
            generated = true;
        }
    }

    if generated {
        save_keyring(&settings.keyring_path, &ring)
            .with_context(|| format!("failed to save {}", settings.keyring_path.display()))?;
    }

    Ok(ring)
}

fn recipient_of<'a>(
    keys: &'a [(&'a str, RsaKeyPair)],
    sender: &str,
) -> Result<&'a (&'a str, RsaKeyPair)> {
    keys.iter()
        .find(|(actor, _)| *actor != sender)
        .with_context(|| format!("no recipient for {}", sender))
}
