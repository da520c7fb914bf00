//! WireGuard key generation through the external `wg` tool.
//!
//! `wg genkey` prints a private key; `wg pubkey` reads it back on stdin and
//! prints the matching public key. Nothing is kept between calls.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::FpnError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub privkey: String,
    pub pubkey: String,
}

#[async_trait]
pub trait KeyProvider: Send + Sync {
    async fn generate(&self) -> Result<KeyPair, FpnError>;
}

pub struct WgKeys {
    program: String,
}

impl WgKeys {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, subcommand: &str, input: Option<&str>) -> Result<String, FpnError> {
        debug!(program = %self.program, subcommand, "running key tool");

        let failure = |reason: String| FpnError::SubprocessFailure {
            program: format!("{} {}", self.program, subcommand),
            reason,
        };

        let mut child = Command::new(&self.program)
            .arg(subcommand)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| failure(err.to_string()))?;

        if let Some(input) = input
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin
                .write_all(format!("{input}\n").as_bytes())
                .await
                .map_err(|err| failure(err.to_string()))?;
            // stdin is dropped here so the tool sees EOF
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|err| failure(err.to_string()))?;

        if !output.status.success() {
            return Err(failure(format!("exited with {}", output.status)));
        }

        let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if key.is_empty() {
            return Err(failure("printed no key".into()));
        }

        Ok(key)
    }
}

#[async_trait]
impl KeyProvider for WgKeys {
    async fn generate(&self) -> Result<KeyPair, FpnError> {
        let privkey = self.run("genkey", None).await?;
        let pubkey = self.run("pubkey", Some(&privkey)).await?;

        Ok(KeyPair { privkey, pubkey })
    }
}
