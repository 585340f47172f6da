//! Encrypt and decrypt grayscale images with AES-ECB or AES-CBC.
//!
//! Without a subcommand an interactive menu is shown.

mod app;
mod cli;
mod menu;
mod raster;

use std::io;

use anyhow::Result;
use clap::Parser;
use image_cipher::FsKeyStore;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{Cli, Command};
use crate::menu::Menu;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let mut app = App::new(FsKeyStore::new(&cli.key_dir), &cli.output_dir);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => Menu::new(&mut app, io::stdin().lock(), io::stdout()).run(),
        command => {
            let message = app.execute(&command)?;
            println!("{message}");
            Ok(())
        }
    }
}

/// Logs go to stderr so they never interleave with menu prompts.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
