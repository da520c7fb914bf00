//! Everything a command needs besides its arguments.

use std::sync::Arc;

use crate::{
    api::Api,
    config::Config,
    credentials::CredentialStore,
    keys::{KeyProvider, WgKeys},
    prompt::{Prompt, Terminal},
    tunnel::{TunnelTool, WgQuick},
};

pub struct Context {
    pub config: Config,
    pub store: CredentialStore,
    pub prompt: Arc<dyn Prompt>,
    pub keys: Arc<dyn KeyProvider>,
    pub tunnel: Arc<dyn TunnelTool>,
}

impl Context {
    /// Wires the real terminal and WireGuard tools.
    pub fn from_config(config: Config) -> Self {
        Self {
            store: CredentialStore::from_config(&config),
            prompt: Arc::new(Terminal),
            keys: Arc::new(WgKeys::new(config.wg.clone())),
            tunnel: Arc::new(WgQuick::new(config.wg_quick.clone())),
            config,
        }
    }

    pub fn api(&self, url: &str) -> Api {
        Api::new(url.to_string())
    }
}
