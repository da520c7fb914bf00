//! Test context for CLI command tests.
//!
//! Provides a TestContext struct that sets up:
//! - A wiremock MockServer for API mocking
//! - A temporary credentials file
//! - Scripted prompt, key and tunnel stand-ins the test can inspect afterwards

use std::sync::Arc;

use tempfile::TempDir;
use wiremock::MockServer;

use super::fixtures::{self, RecordingTunnel, ScriptedPrompt, SequentialKeys};
use crate::{
    config::Config,
    context::Context,
    credentials::{CredentialStore, Credentials},
};

pub struct TestContext {
    /// The wiremock mock server for API mocking.
    pub mock_server: MockServer,
    /// Context handed to the command under test.
    pub ctx: Context,
    pub prompt: Arc<ScriptedPrompt>,
    pub keys: Arc<SequentialKeys>,
    pub tunnel: Arc<RecordingTunnel>,
    /// Temporary directory for credential storage (keeps it alive).
    pub _temp_dir: Arc<TempDir>,
}

impl TestContext {
    /// Create a new test context with a running mock server and no stored credentials.
    ///
    /// Confirmations are answered from `answers`, then "no".
    pub async fn new(answers: &[bool]) -> Self {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let config = Config {
            api_url: mock_server.uri(),
            credentials_path: Some(temp_dir.path().join(".fpn.cf")),
            login_max_polls: Some(20),
            ..Config::default()
        };

        let prompt = Arc::new(ScriptedPrompt::answering(answers));
        let keys = Arc::new(SequentialKeys::default());
        let tunnel = Arc::new(RecordingTunnel::succeeding());

        let ctx = Context {
            store: CredentialStore::from_config(&config),
            prompt: prompt.clone(),
            keys: keys.clone(),
            tunnel: tunnel.clone(),
            config,
        };

        Self {
            mock_server,
            ctx,
            prompt,
            keys,
            tunnel,
            _temp_dir: Arc::new(temp_dir),
        }
    }

    /// Create a test context with stored credentials for `devices`, pointing at the mock server.
    pub async fn with_devices(devices: &[&str], answers: &[bool]) -> Self {
        let ctx = Self::new(answers).await;

        let creds = fixtures::credentials(&ctx.mock_server.uri(), devices);
        ctx.ctx
            .store
            .save(&creds)
            .expect("Failed to write credentials");

        ctx
    }

    pub fn stored(&self) -> Credentials {
        self.ctx.store.load().expect("Failed to read credentials")
    }

    pub fn raw_stored(&self) -> Vec<u8> {
        std::fs::read(self.ctx.store.path()).expect("Failed to read credentials")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_context_creates_mock_server() {
        let ctx = TestContext::new(&[]).await;

        assert!(ctx.mock_server.uri().starts_with("http://"));
        assert_eq!(ctx.ctx.config.api_url, ctx.mock_server.uri());
        assert!(!ctx.ctx.store.exists());
    }

    #[tokio::test]
    async fn test_context_with_devices() {
        let ctx = TestContext::with_devices(&["laptop"], &[]).await;

        let creds = ctx.stored();
        assert_eq!(creds.url, ctx.mock_server.uri());
        assert!(creds.device_with_keys("laptop").is_ok());
    }
}
