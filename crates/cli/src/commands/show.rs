//! Print what the credentials file knows about the session.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use shared::api::Account;

use crate::{context::Context, ui};

pub async fn run(ctx: &Context) -> Result<()> {
    let creds = ctx.store.load()?;

    print_account(&creds.url, &creds.user, Some(&creds.token));

    Ok(())
}

/// Shared by `show` (local snapshot, with token) and `account` (remote, without).
pub(crate) fn print_account(url: &str, account: &Account, token: Option<&str>) {
    ui::section("General");
    ui::item("URL", url);

    ui::section("User Data");
    ui::item("Email", or_dash(account.email.as_deref()));
    ui::item("Avatar", or_dash(account.avatar.as_deref()));
    ui::item("Display Name", or_dash(account.display_name.as_deref()));
    if let Some(token) = token {
        ui::item("Token", token);
    }

    ui::section("Devices");
    for device in &account.devices {
        ui::item("Name", &device.name);
        ui::detail("Public Key", &device.pubkey);
        ui::detail("IPv4 Address", &device.ipv4_address);
        ui::detail("IPv6 Address", &device.ipv6_address);
        ui::detail("Created At", when(Some(device.created_at)));
    }

    ui::section("Subscriptions");
    for (name, subscription) in &account.subscriptions {
        ui::item("Name", name);
        ui::detail("Active", subscription.active);
        ui::detail("Created At", when(subscription.created_at));
        ui::detail("Renews On", when(subscription.renews_on));
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn when(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => format!("{} ({})", at.format("%Y-%m-%d %H:%M UTC"), HumanTime::from(at)),
        None => "-".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::FpnError, test::context::TestContext};

    #[tokio::test]
    async fn reads_local_credentials_only() {
        let t = TestContext::with_devices(&["laptop"], &[]).await;

        run(&t.ctx).await.unwrap();

        assert!(
            t.mock_server
                .received_requests()
                .await
                .unwrap_or_default()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn damaged_file_is_config_unreadable() {
        let t = TestContext::new(&[]).await;
        std::fs::write(t.ctx.store.path(), "[]").unwrap();

        let err = run(&t.ctx).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FpnError>(),
            Some(FpnError::ConfigUnreadable { .. })
        ));
    }

    #[test]
    fn missing_dates_render_as_dash() {
        assert_eq!(when(None), "-");
        assert_eq!(or_dash(None), "-");
    }
}
