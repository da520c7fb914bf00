//! Device-authorization login.
//!
//! Flow:
//! 1. Ask the API for a pending login (a browser URL plus a verification URL)
//! 2. Wait for the user to acknowledge, then open the browser URL
//! 3. Poll the verification URL every `poll_interval` seconds until it answers 200
//!
//! Nothing is persisted here. The caller decides what to do with the token and
//! account once the flow returns.

use std::time::Duration;

use shared::api::LoginCompletion;
use tracing::{debug, info};

use crate::{api::Api, error::FpnError, prompt::Prompt, ui};

/// How long to keep polling for approval.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollLimit {
    /// `None` polls until the server answers 200.
    pub max_polls: Option<u32>,
}

pub async fn authorize(
    api: &Api,
    prompt: &dyn Prompt,
    limit: PollLimit,
) -> Result<LoginCompletion, FpnError> {
    let pending = ui::spin("Requesting a login token...", api.initiate_login()).await?;
    info!(poll_interval = pending.poll_interval, "login pending");

    prompt.acknowledge("Press [enter] to open the authentication page in the browser")?;
    prompt.open_url(&pending.login_url);

    let interval = Duration::from_secs(pending.poll_interval);
    let completion = ui::spin(
        "Waiting for approval...",
        poll(api, &pending.verification_url, interval, limit),
    )
    .await?;

    ui::success("Login approved");
    Ok(completion)
}

async fn poll(
    api: &Api,
    verification_url: &str,
    interval: Duration,
    limit: PollLimit,
) -> Result<LoginCompletion, FpnError> {
    let mut attempts = 0u32;

    loop {
        if let Some(max) = limit.max_polls
            && attempts >= max
        {
            return Err(FpnError::LoginTimedOut(attempts));
        }

        tokio::time::sleep(interval).await;
        attempts += 1;
        debug!(attempt = attempts, "polling login verification");

        if let Some(completion) = api.poll_login(verification_url).await? {
            return Ok(completion);
        }
    }
}
