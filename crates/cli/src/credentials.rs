//! The credential document: everything `login` learned, kept in a single JSON
//! file (`~/.fpn.cf` unless `FPN_CREDENTIALS_PATH` says otherwise).
//!
//! The file is rewritten wholesale after every command that changes it, and
//! only once the matching remote calls have succeeded.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::api::{Account, Device, ServerCatalog};
use tracing::debug;

use crate::{config::Config, error::FpnError};

const FILE_NAME: &str = ".fpn.cf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Origin of the VPN API this session belongs to.
    pub url: String,
    pub token: String,
    pub user: Account,
    /// Local half of each registered device. Never sent to the server except `pubkey`.
    #[serde(default)]
    pub keys: Vec<DeviceKeys>,
    #[serde(default)]
    pub servers: ServerCatalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceKeys {
    pub device: String,
    pub privkey: String,
    pub pubkey: String,
}

impl Credentials {
    pub fn keys_for(&self, device: &str) -> Option<&DeviceKeys> {
        self.keys.iter().find(|k| k.device == device)
    }

    /// Looks up a device together with its private key, as needed to bring a tunnel up.
    pub fn device_with_keys(&self, name: &str) -> Result<(&Device, &DeviceKeys), FpnError> {
        let device = self
            .user
            .device(name)
            .ok_or_else(|| FpnError::device_not_found(name))?;
        let keys = self.keys_for(name).ok_or_else(|| FpnError::NotFound {
            kind: "Private key for device",
            name: name.to_string(),
        })?;

        Ok((device, keys))
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        let path = config.credentials_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(FILE_NAME)
        });

        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Credentials, FpnError> {
        debug!(path = %self.path.display(), "loading credentials");

        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                FpnError::ConfigMissing(self.path.clone())
            } else {
                self.unreadable(err)
            }
        })?;

        serde_json::from_str(&raw).map_err(|err| self.unreadable(err))
    }

    pub fn save(&self, creds: &Credentials) -> Result<(), FpnError> {
        debug!(path = %self.path.display(), devices = creds.user.devices.len(), "saving credentials");

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(creds).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, json)?;

        // The document holds private keys and the bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn delete(&self) -> Result<(), FpnError> {
        match std::fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn unreadable(&self, reason: impl ToString) -> FpnError {
        FpnError::ConfigUnreadable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}
