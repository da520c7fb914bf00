//! HTTP client for the VPN web API.
//!
//! Each call expects exactly one status code. Anything else ends the command
//! with [`FpnError::Protocol`]; there is no retry.

use garde::Validate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::api::{
    Account, CreateDevicePayload, Device, LoginCompletion, PendingLogin, ServerCatalog,
};
use tracing::{debug, trace};

use crate::error::FpnError;

/// Characters left alone by JavaScript's `encodeURIComponent`. Public keys are
/// base64, so `+`, `/` and `=` must be escaped to fit in one path segment.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub struct Api {
    pub http: Client,
    pub base_url: String,
}

impl Api {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Starts a device-authorization login.
    pub async fn initiate_login(&self) -> Result<PendingLogin, FpnError> {
        let url = format!("{}/api/v1/vpn/login", self.base_url);
        let response = self.send(&url, self.http.post(&url)).await?;

        Self::json(&url, Self::expect(&url, response, StatusCode::OK)?).await
    }

    /// Asks whether the pending login was approved. `None` means "not yet".
    pub async fn poll_login(
        &self,
        verification_url: &str,
    ) -> Result<Option<LoginCompletion>, FpnError> {
        let response = self
            .send(verification_url, self.http.get(verification_url))
            .await?;

        if response.status() != StatusCode::OK {
            trace!(status = %response.status(), "login not approved yet");
            return Ok(None);
        }

        Self::json(verification_url, response).await.map(Some)
    }

    /// Registers a device's public key; the server assigns its addresses.
    pub async fn create_device(
        &self,
        token: &str,
        payload: CreateDevicePayload,
    ) -> Result<Device, FpnError> {
        payload
            .validate()
            .map_err(|err| FpnError::InvalidPayload(err.to_string()))?;

        let url = format!("{}/api/v1/vpn/device", self.base_url);
        let response = self
            .send(&url, self.http.post(&url).bearer_auth(token).json(&payload))
            .await?;

        Self::json(&url, Self::expect(&url, response, StatusCode::CREATED)?).await
    }

    /// Deletes the device registered with `pubkey`.
    pub async fn delete_device(&self, token: &str, pubkey: &str) -> Result<(), FpnError> {
        let url = format!(
            "{}/api/v1/vpn/device/{}",
            self.base_url,
            utf8_percent_encode(pubkey, COMPONENT)
        );
        let response = self
            .send(&url, self.http.delete(&url).bearer_auth(token))
            .await?;

        Self::expect(&url, response, StatusCode::NO_CONTENT)?;

        Ok(())
    }

    pub async fn fetch_account(&self, token: &str) -> Result<Account, FpnError> {
        let url = format!("{}/api/v1/vpn/account", self.base_url);
        let response = self.send(&url, self.http.get(&url).bearer_auth(token)).await?;

        Self::json(&url, Self::expect(&url, response, StatusCode::OK)?).await
    }

    pub async fn fetch_servers(&self, token: &str) -> Result<ServerCatalog, FpnError> {
        let url = format!("{}/api/v1/vpn/servers", self.base_url);
        let response = self.send(&url, self.http.get(&url).bearer_auth(token)).await?;

        Self::json(&url, Self::expect(&url, response, StatusCode::OK)?).await
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, FpnError> {
        debug!(%url, "sending request");

        let response = request.send().await.map_err(|source| FpnError::Network {
            url: url.to_string(),
            source,
        })?;

        debug!(%url, status = %response.status(), "received response");
        Ok(response)
    }

    fn expect(url: &str, response: Response, expected: StatusCode) -> Result<Response, FpnError> {
        let actual = response.status();
        if actual != expected {
            return Err(FpnError::Protocol {
                url: url.to_string(),
                expected,
                actual,
            });
        }

        Ok(response)
    }

    async fn json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, FpnError> {
        response
            .json()
            .await
            .map_err(|source| FpnError::MalformedResponse {
                url: url.to_string(),
                source,
            })
    }
}
