//! User interaction points: acknowledgements, yes/no questions, opening a URL.
//!
//! Commands talk to a [`Prompt`] instead of the terminal so the login and
//! device flows can run against scripted answers in tests.

use std::io;

use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use crate::ui;

pub trait Prompt: Send + Sync {
    /// Blocks until the user acknowledges `message`.
    fn acknowledge(&self, message: &str) -> io::Result<()>;

    /// Asks a yes/no question. Anything but an explicit yes is a no.
    fn confirm(&self, message: &str) -> io::Result<bool>;

    /// Hands `url` to the desktop's default handler.
    fn open_url(&self, url: &str);
}

pub struct Terminal;

impl Prompt for Terminal {
    fn acknowledge(&self, message: &str) -> io::Result<()> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(|dialoguer::Error::IO(err)| err)?;

        Ok(())
    }

    fn confirm(&self, message: &str) -> io::Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|dialoguer::Error::IO(err)| err)
    }

    fn open_url(&self, url: &str) {
        if let Err(e) = open::that(url) {
            ui::warning(&format!("Could not open browser: {}", e));
            println!();
            println!("Open this URL manually:");
            println!("  {}", url);
        }
    }
}
