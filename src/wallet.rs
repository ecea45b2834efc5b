//! Keystore wallet loading.
//!
//! Decrypts a JSON keystore into a local signer. The password is
//! resolved from the environment (see `chain.keystore_password_env` in
//! the config) and handled as a secret. Any failure here is fatal at
//! startup; the controller never reaches scheduling without an account.

use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::info;

use crate::types::RotorError;

/// Decrypt the keystore at `path` and return the signing account.
pub fn load_keystore(path: &Path, password: &SecretString) -> Result<PrivateKeySigner> {
    let signer = PrivateKeySigner::decrypt_keystore(path, password.expose_secret())
        .map_err(|e| {
            RotorError::Credential(format!(
                "Failed to decrypt keystore {}: {e}",
                path.display()
            ))
        })?;

    info!(address = %signer.address(), "Loaded account");
    Ok(signer)
}
