pub mod account;
pub mod activate;
pub mod devices;
pub mod login;
pub mod logout;
pub mod servers;
pub mod show;

use sysinfo::System;

use crate::ui;

/// The device name to act on: the given one, else this machine's hostname.
fn device_or_hostname(name: Option<&str>) -> String {
    if let Some(name) = name {
        return name.to_string();
    }

    let hostname = System::host_name().unwrap_or_else(|| "localhost".into());
    ui::info(&format!(
        "No device name passed. Hostname is used instead: {}",
        ui::highlight(&hostname)
    ));
    hostname
}
