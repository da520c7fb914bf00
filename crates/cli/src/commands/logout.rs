//! Sign out: unregister every device of this session, then forget the credentials.
//!
//! The devices are removed server-side first. If that fails midway the
//! credentials file is left as it was.

use anyhow::Result;

use crate::{context::Context, devices, ui};

pub async fn run(ctx: &Context) -> Result<()> {
    let mut creds = ctx.store.load()?;
    let api = ctx.api(&creds.url);

    devices::remove_all(&api, &mut creds).await?;
    ctx.store.delete()?;

    ui::success("Signed out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::FpnError, test::context::TestContext};
    use wiremock::{
        Mock, ResponseTemplate,
        matchers::{method, path_regex},
    };

    #[tokio::test]
    async fn removes_every_device_and_the_file() {
        let t = TestContext::with_devices(&["laptop", "phone"], &[]).await;
        Mock::given(method("DELETE"))
            .and(path_regex("^/api/v1/vpn/device/.+$"))
            .respond_with(ResponseTemplate::new(204))
            .expect(2)
            .mount(&t.mock_server)
            .await;

        run(&t.ctx).await.unwrap();

        assert!(!t.ctx.store.exists());
    }

    #[tokio::test]
    async fn keeps_file_when_server_refuses() {
        let t = TestContext::with_devices(&["laptop"], &[]).await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&t.mock_server)
            .await;
        let before = t.raw_stored();

        let err = run(&t.ctx).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FpnError>(),
            Some(FpnError::Protocol { .. })
        ));
        assert_eq!(t.raw_stored(), before);
    }

    #[tokio::test]
    async fn without_credentials_is_config_missing() {
        let t = TestContext::new(&[]).await;

        let err = run(&t.ctx).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FpnError>(),
            Some(FpnError::ConfigMissing(_))
        ));
    }
}
