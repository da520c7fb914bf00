mod api;
mod auth;
mod commands;
mod config;
mod context;
mod credentials;
mod devices;
mod error;
mod keys;
mod prompt;
mod tunnel;
mod ui;

#[cfg(test)]
mod test;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{config::Config, context::Context, error::FpnError, tunnel::Direction};

#[derive(Parser)]
#[command(name = "fpn")]
#[command(about = "Command-line client for the Firefox Private Network VPN")]
#[command(version)]
#[command(after_help = "Examples:
  fpn login                      Sign in and register this machine
  fpn servers                    List available servers
  fpn activate                   Connect to a random server
  fpn activate us2-wireguard     Connect to a specific server
  fpn deactivate                 Disconnect")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the authentication flow and register this device
    #[command(after_help = "Examples:
  fpn login
  fpn login https://fpn.firefox.com laptop")]
    Login {
        /// API origin (defaults to FPN_API_URL or https://fpn.firefox.com)
        url: Option<String>,
        /// Name to register this machine under (defaults to the hostname)
        device_name: Option<String>,
    },

    /// Remove all devices and forget the stored credentials
    #[command(after_help = "Example: fpn logout")]
    Logout,

    /// Show the locally stored session
    #[command(after_help = "Example: fpn show")]
    Show,

    /// Show the account as the server currently sees it
    #[command(after_help = "Example: fpn account")]
    Account,

    /// List available servers
    #[command(after_help = "Examples:
  fpn servers
  fpn servers --verbose
  fpn servers --refresh")]
    Servers {
        /// Print every field of every server
        #[arg(short, long)]
        verbose: bool,
        /// Download the server list again before printing it
        #[arg(short, long)]
        refresh: bool,
    },

    /// Same as `servers --verbose`
    #[command(hide = true)]
    Fullservers,

    /// Register a new device with its own keypair
    #[command(name = "adddevice")]
    #[command(after_help = "Example: fpn adddevice phone")]
    AddDevice {
        /// Unique device name
        device_name: String,
    },

    /// Unregister a device and drop its keys
    #[command(name = "deldevice")]
    #[command(after_help = "Example: fpn deldevice phone")]
    DelDevice {
        /// Device to remove
        device_name: String,
    },

    /// Bring the VPN up
    #[command(after_help = "Examples:
  fpn activate
  fpn activate us2-wireguard wg0 laptop")]
    Activate(TunnelArgs),

    /// Bring the VPN down
    #[command(after_help = "Example: fpn deactivate us2-wireguard wg0 laptop")]
    Deactivate(TunnelArgs),
}

#[derive(Args)]
struct TunnelArgs {
    /// Server hostname (defaults to a random server)
    server_name: Option<String>,
    /// WireGuard interface name (defaults to FPN_INTERFACE or wg0)
    interface_name: Option<String>,
    /// Device to connect as (defaults to the hostname)
    device_name: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(err) = run(cli, std::env::vars()).await {
        if let Some(FpnError::UserAborted) = err.downcast_ref::<FpnError>() {
            println!("Aborted by the user.");
            return;
        }

        ui::print_error(&err);
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default: warnings only).
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Runs an already parsed command, so help and usage errors never depend on
/// the environment.
async fn run(cli: Cli, vars: impl IntoIterator<Item = (String, String)>) -> anyhow::Result<()> {
    let config = envy::prefixed("FPN_")
        .from_iter::<_, Config>(vars)
        .context("Invalid FPN_* environment variable")?;
    let ctx = Context::from_config(config);

    match cli.command {
        Commands::Login { url, device_name } => {
            commands::login::run(&ctx, url.as_deref(), device_name.as_deref()).await
        }
        Commands::Logout => commands::logout::run(&ctx).await,
        Commands::Show => commands::show::run(&ctx).await,
        Commands::Account => commands::account::run(&ctx).await,
        Commands::Servers { verbose, refresh } => {
            commands::servers::run(&ctx, verbose, refresh).await
        }
        Commands::Fullservers => commands::servers::run(&ctx, true, false).await,
        Commands::AddDevice { device_name } => commands::devices::add(&ctx, &device_name).await,
        Commands::DelDevice { device_name } => {
            commands::devices::delete(&ctx, &device_name).await
        }
        Commands::Activate(args) => tunnel_command(&ctx, Direction::Up, args).await,
        Commands::Deactivate(args) => tunnel_command(&ctx, Direction::Down, args).await,
    }
}

async fn tunnel_command(ctx: &Context, direction: Direction, args: TunnelArgs) -> anyhow::Result<()> {
    commands::activate::run(
        ctx,
        direction,
        args.server_name.as_deref(),
        args.interface_name.as_deref(),
        args.device_name.as_deref(),
    )
    .await
}
