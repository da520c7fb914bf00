//! Bring the VPN up or down through `wg-quick`.
//!
//! Flow:
//! 1. Resolve the device (default: hostname) and its private key
//! 2. Pick the requested server, or a random one from the stored catalog
//! 3. Render a WireGuard config with a random port from the server's ranges
//! 4. Run `wg-quick up|down` on a temporary copy of the config, then delete it

use anyhow::Result;

use crate::{
    commands::servers::server_fields,
    context::Context,
    tunnel::{self, Direction},
    ui,
};

pub async fn run(
    ctx: &Context,
    direction: Direction,
    server_name: Option<&str>,
    interface: Option<&str>,
    device_name: Option<&str>,
) -> Result<()> {
    let device_name = super::device_or_hostname(device_name);
    let interface = interface.unwrap_or(&ctx.config.interface);

    let creds = ctx.store.load()?;
    let (device, keys) = creds.device_with_keys(&device_name)?;

    let (located, config) = {
        let mut rng = rand::rng();
        let located = tunnel::select_server(&creds.servers, server_name, &mut rng)?;
        let port = tunnel::choose_port(located.server, &mut rng)?;
        let config = tunnel::build_config(keys, device, located.server, port);
        (located, config)
    };

    ui::section("Server");
    ui::item("country", located.country);
    ui::item("city", located.city);
    for (field, value) in server_fields(located.server) {
        ui::item(&field, value);
    }
    println!();

    let ok = tunnel::apply(ctx.tunnel.as_ref(), direction, interface, &config).await?;

    match (ok, direction) {
        (true, Direction::Up) => ui::success("VPN should be up and running."),
        (true, Direction::Down) => ui::success("VPN is down."),
        (false, _) => ui::warning(&format!(
            "{} reported a failure, see its output above.",
            ctx.config.wg_quick
        )),
    }

    Ok(())
}
