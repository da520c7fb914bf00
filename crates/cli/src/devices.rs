//! Keeps the local device list and key list in step with the remote account.
//!
//! Every change goes to the API first. The in-memory document is only touched
//! once the remote call succeeded, so a caller that saves after an `Ok` never
//! records a device the server does not know about (or forgets one it does).
//!
//! A device record and its key record are added and removed together.

use garde::Validate;
use shared::api::{CreateDevicePayload, Device, DeviceName};

use crate::{
    api::Api,
    credentials::{Credentials, DeviceKeys},
    error::FpnError,
    keys::KeyProvider,
    prompt::Prompt,
    ui,
};

/// What a successful [`remove_device`] left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Other devices remain; save the document.
    Removed,
    /// That was the last device; the whole local session must go.
    LastDevice,
}

/// Fails unless the service would accept `name` for a new device.
pub fn check_name(name: &str) -> Result<(), FpnError> {
    DeviceName {
        name: name.to_string(),
    }
    .validate()
    .map_err(|report| FpnError::InvalidDeviceName {
        name: name.to_string(),
        reason: report.to_string(),
    })
}

/// Generates a keypair, registers its public half as `name` and records both halves.
pub async fn create_device(
    api: &Api,
    keys: &dyn KeyProvider,
    creds: &mut Credentials,
    name: &str,
) -> Result<(), FpnError> {
    check_name(name)?;

    if creds.user.device(name).is_some() {
        return Err(FpnError::device_exists(name));
    }

    let pair = ui::spin("Generating keys...", keys.generate()).await?;

    let device = ui::spin(
        "Creating the device...",
        api.create_device(
            &creds.token,
            CreateDevicePayload {
                name: name.to_string(),
                pubkey: pair.pubkey.clone(),
            },
        ),
    )
    .await?;

    // A key record without a device can only be a leftover; this one supersedes it
    creds.keys.retain(|k| k.device != name);
    creds.keys.push(DeviceKeys {
        device: name.to_string(),
        privkey: pair.privkey,
        pubkey: pair.pubkey,
    });
    creds.user.devices.push(device);

    Ok(())
}

/// Removes `name` remotely and locally.
///
/// Removing the last device ends the session, so it needs an explicit yes.
/// Declining returns [`FpnError::UserAborted`] with `creds` untouched.
pub async fn remove_device(
    api: &Api,
    prompt: &dyn Prompt,
    creds: &mut Credentials,
    name: &str,
) -> Result<Removal, FpnError> {
    let index = creds
        .user
        .device_position(name)
        .ok_or_else(|| FpnError::device_not_found(name))?;

    let last = creds.user.devices.len() == 1;
    if last && !prompt.confirm("Removing the last device logs you out. Do you want to proceed?")? {
        return Err(FpnError::UserAborted);
    }

    remove_at(api, creds, index).await?;

    Ok(if last {
        Removal::LastDevice
    } else {
        Removal::Removed
    })
}

/// Called during login with a freshly fetched account. If it already has a
/// device called `name`, that device is removed (after confirmation) so the
/// new registration can take its place. Its old keys are not recoverable.
pub async fn replace_existing(
    api: &Api,
    prompt: &dyn Prompt,
    creds: &mut Credentials,
    name: &str,
) -> Result<(), FpnError> {
    let Some(index) = creds.user.device_position(name) else {
        return Ok(());
    };

    let question = format!(
        "Device `{}` is already registered. Remove it and discard its keys to register this machine instead?",
        name
    );
    if !prompt.confirm(&question)? {
        return Err(FpnError::UserAborted);
    }

    remove_at(api, creds, index).await?;

    Ok(())
}

/// Removes every device, newest first.
pub async fn remove_all(api: &Api, creds: &mut Credentials) -> Result<(), FpnError> {
    while let Some(index) = creds.user.devices.len().checked_sub(1) {
        remove_at(api, creds, index).await?;
    }

    Ok(())
}

async fn remove_at(api: &Api, creds: &mut Credentials, index: usize) -> Result<Device, FpnError> {
    let target = &creds.user.devices[index];

    ui::spin(
        &format!("Removing the device {}...", target.name),
        api.delete_device(&creds.token, &target.pubkey),
    )
    .await?;

    let device = creds.user.devices.remove(index);
    creds.keys.retain(|k| k.device != device.name);

    Ok(device)
}
