//! Fetch the account from the API and print it.
//!
//! Read-only: the credentials file is not updated with what comes back.

use anyhow::Result;

use crate::{context::Context, ui};

pub async fn run(ctx: &Context) -> Result<()> {
    let creds = ctx.store.load()?;
    let api = ctx.api(&creds.url);

    let account = ui::spin("Retrieving account data...", api.fetch_account(&creds.token)).await?;

    super::show::print_account(&api.base_url, &account, None);

    Ok(())
}
