//! `aes256-key` — print a new random base64-encoded AES-256 key.

use std::process::ExitCode;

use aes_seal_cli::commands;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "aes256-key",
    version,
    about = "Print a new random base64-encoded AES-256 key"
)]
struct Args {}

fn main() -> ExitCode {
    let Args {} = Args::parse();

    aes_seal_cli::run("aes256-key", |_settings| {
        println!("{}", commands::generate_key());
        Ok(())
    })
}
