//! Sign in with the device-authorization flow and register this machine.
//!
//! Flow:
//! 1. Run the browser approval flow and receive a token plus the account
//! 2. If the account already has a device with this name, replace it (confirmed)
//! 3. Generate a WireGuard keypair and register its public half
//! 4. Fetch the server catalog
//! 5. Store everything in the credentials file
//!
//! Nothing is written locally until every remote step succeeded.

use anyhow::Result;
use reqwest::Url;

use crate::{
    auth::{self, PollLimit},
    context::Context,
    credentials::Credentials,
    devices,
    error::FpnError,
    ui,
};

pub async fn run(ctx: &Context, url: Option<&str>, device_name: Option<&str>) -> Result<()> {
    let origin = origin(url.unwrap_or(&ctx.config.api_url))?;
    let device_name = super::device_or_hostname(device_name);
    devices::check_name(&device_name)?;
    let api = ctx.api(&origin);

    if ctx.store.exists() {
        ui::info(&format!(
            "Existing credentials at {} will be replaced",
            ui::highlight(ctx.store.path().display())
        ));
    }

    let completion = auth::authorize(
        &api,
        ctx.prompt.as_ref(),
        PollLimit {
            max_polls: ctx.config.login_max_polls,
        },
    )
    .await?;

    let mut creds = Credentials {
        url: origin,
        token: completion.token,
        user: completion.user,
        keys: Vec::new(),
        servers: Default::default(),
    };

    devices::replace_existing(&api, ctx.prompt.as_ref(), &mut creds, &device_name).await?;
    devices::create_device(&api, ctx.keys.as_ref(), &mut creds, &device_name).await?;

    creds.servers = ui::spin("Retrieving servers list...", api.fetch_servers(&creds.token)).await?;

    ctx.store.save(&creds)?;

    ui::success(&format!(
        "Signed in as device {} ({} servers available)",
        ui::highlight(&device_name),
        creds.servers.server_count()
    ));

    Ok(())
}

/// Reduces a user-supplied URL to its origin (`scheme://host[:port]`).
fn origin(input: &str) -> Result<String, FpnError> {
    let url = Url::parse(input).map_err(|_| FpnError::InvalidInput(input.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
        return Err(FpnError::InvalidInput(input.to_string()));
    }

    Ok(url.origin().ascii_serialization())
}
