use std::path::PathBuf;

use serde::Deserialize;

/// Settings read from `FPN_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Origin used by `login` when no URL argument is given.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Overrides the credential document location (`~/.fpn.cf`).
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    /// WireGuard key tool.
    #[serde(default = "default_wg")]
    pub wg: String,
    /// Tunnel up/down tool.
    #[serde(default = "default_wg_quick")]
    pub wg_quick: String,
    /// Interface name used when `activate`/`deactivate` get none.
    #[serde(default = "default_interface")]
    pub interface: String,
    /// Give up on login approval after this many polls. Unset polls forever.
    #[serde(default)]
    pub login_max_polls: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            credentials_path: None,
            wg: default_wg(),
            wg_quick: default_wg_quick(),
            interface: default_interface(),
            login_max_polls: None,
        }
    }
}

fn default_api_url() -> String {
    "https://fpn.firefox.com".into()
}

fn default_wg() -> String {
    "wg".into()
}

fn default_wg_quick() -> String {
    "wg-quick".into()
}

fn default_interface() -> String {
    "wg0".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_environment_uses_defaults() {
        let config: Config = envy::prefixed("FPN_")
            .from_iter(Vec::<(String, String)>::new())
            .unwrap();

        assert_eq!(config.api_url, "https://fpn.firefox.com");
        assert_eq!(config.wg, "wg");
        assert_eq!(config.wg_quick, "wg-quick");
        assert_eq!(config.interface, "wg0");
        assert!(config.credentials_path.is_none());
        assert!(config.login_max_polls.is_none());
    }

    #[test]
    fn reads_prefixed_variables() {
        let vars = vec![
            ("FPN_API_URL".to_string(), "https://vpn.example.com".to_string()),
            ("FPN_LOGIN_MAX_POLLS".to_string(), "30".to_string()),
            ("FPN_CREDENTIALS_PATH".to_string(), "/tmp/fpn.json".to_string()),
            ("OTHER_API_URL".to_string(), "ignored".to_string()),
        ];
        let config: Config = envy::prefixed("FPN_").from_iter(vars).unwrap();

        assert_eq!(config.api_url, "https://vpn.example.com");
        assert_eq!(config.login_max_polls, Some(30));
        assert_eq!(config.credentials_path, Some(PathBuf::from("/tmp/fpn.json")));
    }
}
