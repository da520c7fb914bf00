//! List the server catalog stored at login, optionally refreshing it first.

use anyhow::Result;
use owo_colors::OwoColorize;
use shared::api::Server;

use crate::{context::Context, ui};

pub async fn run(ctx: &Context, verbose: bool, refresh: bool) -> Result<()> {
    let mut creds = ctx.store.load()?;

    if refresh {
        let api = ctx.api(&creds.url);
        creds.servers = ui::spin("Retrieving servers list...", api.fetch_servers(&creds.token)).await?;
        ctx.store.save(&creds)?;
    }

    ui::section("Countries");
    for country in &creds.servers.countries {
        println!(
            " {} {} - code: {}",
            "*".yellow(),
            ui::highlight(&country.name),
            ui::highlight(&country.code)
        );
        println!(" - cities:");
        for city in &country.cities {
            println!("   > {}", city.name.cyan());
            println!("     code: {}", city.code.cyan());
            println!("     latitude: {}", city.latitude.cyan());
            println!("     longitude: {}", city.longitude.cyan());

            if verbose {
                println!("     servers:");
                for server in &city.servers {
                    for (i, (field, value)) in server_fields(server).into_iter().enumerate() {
                        let bullet = if i == 0 { "." } else { " " };
                        println!("      {} {}: {}", bullet, field, value);
                    }
                }
            } else {
                let hostnames: Vec<&str> =
                    city.servers.iter().map(|s| s.hostname.as_str()).collect();
                println!("     servers: {}", hostnames.join(", ").cyan());
            }
        }
    }

    Ok(())
}

/// Every field of a server as display pairs, known fields first, then whatever
/// else the API sent.
pub(crate) fn server_fields(server: &Server) -> Vec<(String, String)> {
    let ranges: Vec<String> = server
        .port_ranges
        .iter()
        .map(|[min, max]| format!("[{}, {})", min, max))
        .collect();

    let mut fields = vec![
        ("hostname".to_string(), server.hostname.clone()),
        ("public_key".to_string(), server.public_key.clone()),
        ("ipv4_gateway".to_string(), server.ipv4_gateway.clone()),
        ("ipv4_addr_in".to_string(), server.ipv4_addr_in.clone()),
        ("port_ranges".to_string(), ranges.join(", ")),
    ];

    fields.extend(
        server
            .extra
            .iter()
            .map(|(key, value)| (key.clone(), display_value(value))),
    );

    fields
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
