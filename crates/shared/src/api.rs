//! Request/response types for the VPN web API (`/api/v1/vpn/*`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use garde::Validate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Returned by `POST /api/v1/vpn/login`. Describes a login waiting for approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingLogin {
    /// Page the user opens in a browser to approve the login.
    pub login_url: String,
    /// Polled until it answers 200.
    pub verification_url: String,
    /// Seconds to wait between two polls of `verification_url`.
    pub poll_interval: u64,
}

/// Body of the 200 answer from the verification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCompletion {
    pub token: String,
    pub user: Account,
}

/// Account snapshot, as returned by the login verification and `GET /api/v1/vpn/account`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub display_name: Option<String>,
    pub devices: Vec<Device>,
    pub subscriptions: BTreeMap<String, Subscription>,
}

impl Account {
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    pub fn device_position(&self, name: &str) -> Option<usize> {
        self.devices.iter().position(|d| d.name == name)
    }
}

/// A device registered against the account. Addresses are assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub pubkey: String,
    pub ipv4_address: String,
    pub ipv6_address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub renews_on: Option<DateTime<Utc>>,
}

/// A device name the service accepts.
#[derive(Debug, Clone, Validate)]
pub struct DeviceName {
    #[garde(length(min = 1, max = 128))]
    pub name: String,
}

/// Register a new device for the authenticated account.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateDevicePayload {
    #[garde(length(min = 1, max = 128))]
    pub name: String,
    /// WireGuard public key, base64 encoded.
    #[garde(length(min = 1))]
    pub pubkey: String,
}

/// `GET /api/v1/vpn/servers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerCatalog {
    #[serde(default)]
    pub countries: Vec<Country>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub servers: Vec<Server>,
}

/// A WireGuard endpoint.
///
/// Only the fields needed to build a tunnel are typed. Anything else the server
/// sends (weights, multihop ports, ...) lands in `extra`, in the order it was
/// sent, so it survives a save/load cycle and can still be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub hostname: String,
    pub public_key: String,
    pub ipv4_gateway: String,
    pub ipv4_addr_in: String,
    /// Half-open `[min, max)` port ranges.
    #[serde(default)]
    pub port_ranges: Vec<[u16; 2]>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl ServerCatalog {
    pub fn server_count(&self) -> usize {
        self.countries
            .iter()
            .flat_map(|country| &country.cities)
            .map(|city| city.servers.len())
            .sum()
    }
}
