//! Add or remove devices of the signed-in account.
//!
//! Each device gets its own WireGuard keypair. The private half stays in the
//! credentials file; the server only ever sees the public half.

use anyhow::Result;

use crate::{
    context::Context,
    devices::{self, Removal},
    ui,
};

pub async fn add(ctx: &Context, name: &str) -> Result<()> {
    let mut creds = ctx.store.load()?;
    let api = ctx.api(&creds.url);

    devices::create_device(&api, ctx.keys.as_ref(), &mut creds, name).await?;
    ctx.store.save(&creds)?;

    ui::success(&format!("Device {} added", ui::highlight(name)));
    Ok(())
}

pub async fn delete(ctx: &Context, name: &str) -> Result<()> {
    let mut creds = ctx.store.load()?;
    let api = ctx.api(&creds.url);

    match devices::remove_device(&api, ctx.prompt.as_ref(), &mut creds, name).await? {
        Removal::Removed => {
            ctx.store.save(&creds)?;
            ui::success(&format!("Device {} removed", ui::highlight(name)));
        }
        Removal::LastDevice => {
            ctx.store.delete()?;
            ui::success(&format!(
                "Device {} removed. No devices left, signed out",
                ui::highlight(name)
            ));
        }
    }

    Ok(())
}
