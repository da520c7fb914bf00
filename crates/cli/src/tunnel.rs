//! WireGuard tunnel configuration and the `wg-quick` hand-off.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use shared::api::{Device, Server, ServerCatalog};
use tokio::process::Command;
use tracing::debug;

use crate::{credentials::DeviceKeys, error::FpnError, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_arg(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// A server together with where it sits in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct LocatedServer<'a> {
    pub country: &'a str,
    pub city: &'a str,
    pub server: &'a Server,
}

pub fn flatten(catalog: &ServerCatalog) -> Vec<LocatedServer<'_>> {
    catalog
        .countries
        .iter()
        .flat_map(|country| {
            country.cities.iter().flat_map(move |city| {
                city.servers.iter().map(move |server| LocatedServer {
                    country: &country.name,
                    city: &city.name,
                    server,
                })
            })
        })
        .collect()
}

/// Picks the server called `hostname`, or any server uniformly at random.
pub fn select_server<'a, R: Rng>(
    catalog: &'a ServerCatalog,
    hostname: Option<&str>,
    rng: &mut R,
) -> Result<LocatedServer<'a>, FpnError> {
    let servers = flatten(catalog);

    let chosen = match hostname {
        Some(hostname) => servers
            .into_iter()
            .find(|s| s.server.hostname == hostname)
            .ok_or_else(|| FpnError::NotFound {
                kind: "Server",
                name: hostname.to_string(),
            })?,
        None => *servers.choose(rng).ok_or_else(|| FpnError::NotFound {
            kind: "Server",
            name: "(any)".into(),
        })?,
    };

    Ok(chosen)
}

/// Picks one `[min, max)` range uniformly, then a port uniformly inside it.
/// An empty range `[a, a)` yields `a`.
pub fn choose_port<R: Rng>(server: &Server, rng: &mut R) -> Result<u16, FpnError> {
    let [min, max] = *server
        .port_ranges
        .choose(rng)
        .ok_or_else(|| FpnError::NotFound {
            kind: "Port range for server",
            name: server.hostname.clone(),
        })?;

    if max <= min {
        return Ok(min);
    }

    Ok(rng.random_range(min..max))
}

pub fn build_config(keys: &DeviceKeys, device: &Device, server: &Server, port: u16) -> String {
    format!(
        "[Interface]\n\
         PrivateKey = {privkey}\n\
         Address = {ipv4},{ipv6}\n\
         DNS = {dns}\n\
         \n\
         [Peer]\n\
         PublicKey = {server_key}\n\
         Endpoint = {endpoint}:{port}\n\
         AllowedIPs = 0.0.0.0/0,::0/0\n",
        privkey = keys.privkey,
        ipv4 = device.ipv4_address,
        ipv6 = device.ipv6_address,
        dns = server.ipv4_gateway,
        server_key = server.public_key,
        endpoint = server.ipv4_addr_in,
    )
}

/// Brings a tunnel described by a config file up or down.
#[async_trait]
pub trait TunnelTool: Send + Sync {
    /// Returns whether the tool reported success.
    async fn run(&self, direction: Direction, config_path: &Path) -> Result<bool, FpnError>;
}

pub struct WgQuick {
    program: String,
}

impl WgQuick {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl TunnelTool for WgQuick {
    async fn run(&self, direction: Direction, config_path: &Path) -> Result<bool, FpnError> {
        debug!(
            program = %self.program,
            direction = direction.as_arg(),
            path = %config_path.display(),
            "running tunnel tool"
        );

        let status = Command::new(&self.program)
            .arg(direction.as_arg())
            .arg(config_path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| FpnError::SubprocessFailure {
                program: self.program.clone(),
                reason: err.to_string(),
            })?;

        debug!(%status, "tunnel tool finished");
        Ok(status.success())
    }
}

/// Writes `config` to `<tmp>/<interface>.conf`, runs the tool on it, and
/// removes the temporary directory whatever the outcome.
pub async fn apply(
    tool: &dyn TunnelTool,
    direction: Direction,
    interface: &str,
    config: &str,
) -> Result<bool, FpnError> {
    let dir = tempfile::Builder::new().prefix("fpn-").tempdir()?;
    let path = dir.path().join(format!("{}.conf", interface));

    std::fs::write(&path, config)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }
    ui::info(&format!("Configuration file: {}", ui::highlight(path.display())));

    let result = tool.run(direction, &path).await;

    dir.close()?;
    result
}
