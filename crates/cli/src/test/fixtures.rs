//! Sample data and scripted stand-ins for the terminal and external tools.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::api::{Account, City, Country, Device, Server, ServerCatalog, Subscription};
use tempfile::TempDir;

use crate::{
    credentials::{Credentials, DeviceKeys},
    error::FpnError,
    keys::{KeyPair, KeyProvider},
    prompt::Prompt,
    tunnel::{Direction, TunnelTool},
};

pub fn device(name: &str) -> Device {
    let n = name.bytes().fold(0u8, |acc, b| acc.wrapping_add(b)) % 200 + 2;
    Device {
        name: name.to_string(),
        pubkey: format!("{name}-pubkey"),
        ipv4_address: format!("10.66.0.{n}/32"),
        ipv6_address: format!("fc00:bbbb:bbbb:bb01::{n:x}/128"),
        created_at: Utc.with_ymd_and_hms(2020, 3, 1, 12, 0, 0).unwrap(),
    }
}

pub fn keys(name: &str) -> DeviceKeys {
    DeviceKeys {
        device: name.to_string(),
        privkey: format!("{name}-privkey"),
        pubkey: format!("{name}-pubkey"),
    }
}

pub fn server(hostname: &str, addr_in: &str) -> Server {
    Server {
        hostname: hostname.to_string(),
        public_key: format!("{hostname}-key"),
        ipv4_gateway: "10.64.0.1".into(),
        ipv4_addr_in: addr_in.to_string(),
        port_ranges: vec![[53, 54], [4000, 33433]],
        extra: [("weight".to_string(), serde_json::json!(10))]
            .into_iter()
            .collect(),
    }
}

pub fn catalog() -> ServerCatalog {
    ServerCatalog {
        countries: vec![
            Country {
                name: "France".into(),
                code: "fr".into(),
                cities: vec![City {
                    name: "Paris".into(),
                    code: "par".into(),
                    latitude: 48.85,
                    longitude: 2.35,
                    servers: vec![server("fr1-wireguard", "198.51.100.1")],
                }],
            },
            Country {
                name: "USA".into(),
                code: "us".into(),
                cities: vec![
                    City {
                        name: "Dallas".into(),
                        code: "dal".into(),
                        latitude: 32.78,
                        longitude: -96.8,
                        servers: vec![server("us1-wireguard", "198.51.100.2")],
                    },
                    City {
                        name: "New York".into(),
                        code: "nyc".into(),
                        latitude: 40.71,
                        longitude: -74.0,
                        servers: vec![
                            server("us2-wireguard", "198.51.100.3"),
                            server("us3-wireguard", "198.51.100.4"),
                        ],
                    },
                ],
            },
        ],
    }
}

pub fn account(devices: &[&str]) -> Account {
    Account {
        email: Some("user@example.com".into()),
        avatar: Some("https://example.com/avatar.png".into()),
        display_name: Some("Test User".into()),
        devices: devices.iter().map(|name| device(name)).collect(),
        subscriptions: BTreeMap::from([(
            "guardian_vpn".to_string(),
            Subscription {
                active: true,
                created_at: Some(Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap()),
                renews_on: Some(Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap()),
            },
        )]),
    }
}

pub fn credentials(url: &str, devices: &[&str]) -> Credentials {
    Credentials {
        url: url.to_string(),
        token: "test-token".into(),
        user: account(devices),
        keys: devices.iter().map(|name| keys(name)).collect(),
        servers: catalog(),
    }
}

/// Writes an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Answers confirmations from a queue (then "no") and records what it was asked.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    questions: Mutex<Vec<String>>,
    acknowledged: AtomicUsize,
    opened: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            ..Self::default()
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }

    pub fn acknowledged(&self) -> usize {
        self.acknowledged.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn acknowledge(&self, _message: &str) -> io::Result<()> {
        self.acknowledged.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn confirm(&self, message: &str) -> io::Result<bool> {
        self.questions.lock().unwrap().push(message.to_string());
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }

    fn open_url(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

/// Hands out `priv-N`/`pub-N` pairs.
#[derive(Default)]
pub struct SequentialKeys {
    count: AtomicUsize,
}

impl SequentialKeys {
    pub fn generated(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyProvider for SequentialKeys {
    async fn generate(&self) -> Result<KeyPair, FpnError> {
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(KeyPair {
            privkey: format!("priv-{n}"),
            pubkey: format!("pub-{n}"),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TunnelCall {
    pub direction: Direction,
    pub path: PathBuf,
    /// File contents at the time of the call.
    pub contents: Option<String>,
}

/// Records each invocation instead of touching the network stack.
pub struct RecordingTunnel {
    succeed: bool,
    calls: Mutex<Vec<TunnelCall>>,
}

impl RecordingTunnel {
    pub fn succeeding() -> Self {
        Self {
            succeed: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<TunnelCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TunnelTool for RecordingTunnel {
    async fn run(&self, direction: Direction, config_path: &Path) -> Result<bool, FpnError> {
        self.calls.lock().unwrap().push(TunnelCall {
            direction,
            path: config_path.to_path_buf(),
            contents: std::fs::read_to_string(config_path).ok(),
        });

        if self.succeed {
            Ok(true)
        } else {
            Err(FpnError::SubprocessFailure {
                program: "wg-quick".into(),
                reason: "exited with exit status: 1".into(),
            })
        }
    }
}
