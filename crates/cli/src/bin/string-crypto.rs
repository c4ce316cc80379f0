//! `string-crypto` — encrypt a string to base64 text, or decrypt it back.

use std::process::ExitCode;

use aes_seal_cli::commands::{self, Mode};
use clap::{builder::NonEmptyStringValueParser, ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "string-crypto",
    version,
    about = "Encrypt or decrypt a string with a base64-encoded AES-256 key"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["encrypt", "decrypt"])))]
struct Args {
    /// Encrypt
    #[arg(short, long)]
    encrypt: bool,

    /// Decrypt
    #[arg(short, long)]
    decrypt: bool,

    /// Base64-encoded AES-256 key (falls back to SEAL_KEY)
    #[arg(short, long)]
    key: Option<String>,

    /// Plaintext to encrypt, or base64 ciphertext to decrypt
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    text: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mode = if args.encrypt {
        Mode::Encrypt
    } else {
        Mode::Decrypt
    };

    aes_seal_cli::run("string-crypto", |settings| {
        let key = commands::load_key(args.key.as_deref(), settings)?;
        let rendered = commands::run_text(mode, &args.text, &key)?;
        println!("{rendered}");
        Ok(())
    })
}
