//! `file-crypto` — encrypt or decrypt a whole file (or stdin) in memory.

use std::path::PathBuf;
use std::process::ExitCode;

use aes_seal_cli::{
    commands::{self, Mode},
    io, telemetry,
};
use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "file-crypto",
    version,
    about = "Encrypt or decrypt a file with a base64-encoded AES-256 key; the file must fit in memory"
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

    /// Input file; if not provided, input is read from stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file; if not provided, output is sent to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mode = if args.encrypt {
        Mode::Encrypt
    } else {
        Mode::Decrypt
    };

    aes_seal_cli::run("file-crypto", |settings| {
        let key = commands::load_key(args.key.as_deref(), settings)?;

        let input = {
            let _io = telemetry::domain_span("io").entered();
            io::read_input(args.input.as_deref())?
        };

        let rendered = commands::run_bytes(mode, &input.data, &key)?;

        let _io = telemetry::domain_span("io").entered();
        io::write_output(args.output.as_deref(), &rendered, input.permissions)
    })
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, CommandFactory};

    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("file-crypto").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_paths() {
        let args = parse(&["-d", "-i", "secret.bin", "-o", "plain.txt"]).unwrap();
        assert!(args.decrypt);
        assert_eq!(args.input, Some(PathBuf::from("secret.bin")));
        assert_eq!(args.output, Some(PathBuf::from("plain.txt")));
    }

    #[test]
    fn paths_default_to_standard_streams() {
        let args = parse(&["--encrypt"]).unwrap();
        assert!(args.input.is_none());
        assert!(args.output.is_none());
    }

    #[test]
    fn both_modes_is_a_usage_error() {
        let err = parse(&["-e", "-d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_mode_is_a_usage_error() {
        let err = parse(&["-i", "plain.txt"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }
}
