// File Operations for keys and attachments
// Keyring persistence, key file export and attachment encryption

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::key_store::KeyRing;
use crate::error::Result;
use crate::rsa::{
    decrypt, encrypt_bytes, export_key_files, Message, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
};

/// Read entire file into memory
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Write data to file, creating parent directories as needed
pub fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    Ok(())
}

/// Load a keyring; a missing file is not an error.
pub fn load_keyring(path: &Path) -> Result<Option<KeyRing>> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(KeyRing::from_json(&json)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_keyring(path: &Path, ring: &KeyRing) -> Result<()> {
    write_file(path, ring.to_json()?.as_bytes())?;
    info!(path = %path.display(), keys = ring.len(), "saved keyring");
    Ok(())
}

/// Write `<label>_public.key` and `<label>_private.key` into `dir`.
pub fn write_key_files(dir: &Path, label: &str, keypair: &RsaKeyPair) -> Result<(PathBuf, PathBuf)> {
    let (public, private) = export_key_files(&keypair.public_key, &keypair.private_key, label);

    let public_path = dir.join(&public.file_name);
    let private_path = dir.join(&private.file_name);
    write_file(&public_path, public.contents.as_bytes())?;
    write_file(&private_path, private.contents.as_bytes())?;

    info!(dir = %dir.display(), label, "exported key files");
    Ok((public_path, private_path))
}

/// Encrypt a file attachment byte by byte.
pub fn encrypt_file(path: &Path, public_key: &RsaPublicKey) -> Result<String> {
    let data = read_file(path)?;
    info!(
        path = %path.display(),
        size = %format_file_size(data.len() as u64),
        "encrypting attachment"
    );
    encrypt_bytes(&data, public_key)
}

/// Decrypt an attachment envelope and write the recovered content to `path`.
pub fn decrypt_to_file(envelope: &str, private_key: &RsaPrivateKey, path: &Path) -> Result<Message> {
    let message = decrypt(envelope, private_key)?;
    let data = message.clone().into_bytes();

    write_file(path, &data)?;
    info!(
        path = %path.display(),
        size = %format_file_size(data.len() as u64),
        "wrote decrypted attachment"
    );
    Ok(message)
}

/// Format file size for display
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
