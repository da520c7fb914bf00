//! Failures a command can end with.
//!
//! Every variant is terminal for the running command. Commands wrap these in
//! `anyhow::Error`; `main` downcasts to decide the exit path and `ui` uses the
//! rendered message to pick a hint.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FpnError {
    #[error("The argument doesn't look like a valid URL: {0}")]
    InvalidInput(String),

    #[error("`{name}` is not a usable device name: {reason}")]
    InvalidDeviceName { name: String, reason: String },

    #[error("Refusing to send an invalid request: {0}")]
    InvalidPayload(String),

    #[error("Not signed in: no credentials at `{}`", .0.display())]
    ConfigMissing(PathBuf),

    #[error("Unable to read the config file `{}`: {reason}", path.display())]
    ConfigUnreadable { path: PathBuf, reason: String },

    #[error("Unable to reach `{url}`: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected answer from `{url}`: expected {expected}, got {actual}")]
    Protocol {
        url: String,
        expected: StatusCode,
        actual: StatusCode,
    },

    #[error("Malformed answer from `{url}`: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{kind} `{name}` already exists")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("{kind} `{name}` does not exist")]
    NotFound { kind: &'static str, name: String },

    #[error("Aborted by the user")]
    UserAborted,

    #[error("`{program}` failed: {reason}")]
    SubprocessFailure { program: String, reason: String },

    #[error("Login was not approved after {0} attempts")]
    LoginTimedOut(u32),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FpnError {
    pub fn device_exists(name: &str) -> Self {
        Self::AlreadyExists {
            kind: "Device",
            name: name.to_string(),
        }
    }

    pub fn device_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "Device",
            name: name.to_string(),
        }
    }
}
