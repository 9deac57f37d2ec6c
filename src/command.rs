//! Command surface of the `cryptkit` binary.
//!
//! Every command reads at most one line of hex from its input and produces a
//! single JSON document. Failures are returned as [`CryptError`] and rendered
//! by the caller as an [`ErrorEnvelope`](crate::error::ErrorEnvelope).

use std::io::BufRead;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::error::CryptError;
use crate::key::{EcCurve, PrivateKey};
use crate::{cert, csr, hash, key, random};

#[derive(Debug, Parser)]
#[command(
    name = "cryptkit",
    version,
    about = "Certificate, key, hashing and random number utilities with hex input and JSON output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Describe a PEM certificate read as hex from stdin
    Certinfo,
    /// Generate a CSR from a hex-encoded JSON request read from stdin
    Csr,
    /// Describe a PEM private key given as hex (argument or stdin)
    Pkinfo {
        /// Hex-encoded PEM key; read from stdin when omitted
        hex: Option<String>,
    },
    /// Print a uniform random integer in [0, MAX)
    Randint {
        #[arg(allow_negative_numbers = true)]
        max: i64,
    },
    /// SHA-256 of hex-encoded bytes read from stdin
    Hashsha256,
    /// SHA-512 of hex-encoded bytes read from stdin
    Hashsha512,
    /// Generate a private key in a format `pkinfo` and `csr` accept
    #[command(subcommand)]
    Pkgen(PkgenCommand),
}

#[derive(Debug, Subcommand)]
pub enum PkgenCommand {
    /// SEC1 elliptic curve key
    Ec(EcArgs),
    /// PKCS#1 RSA key
    Rsa(RsaArgs),
}

#[derive(Debug, Args)]
pub struct EcArgs {
    /// P-224, P-256, P-384 or P-521
    #[arg(long, default_value = "P-256")]
    pub curve: EcCurve,
}

#[derive(Debug, Args)]
pub struct RsaArgs {
    /// Modulus size in bits
    #[arg(long, default_value_t = 2048)]
    pub bits: usize,
}

/// `{Message}` output of hashing and `randint`.
#[derive(Debug, Serialize)]
pub struct MessageOutput<T> {
    #[serde(rename = "Message")]
    pub message: T,
}

/// `{Req}` output of `csr`.
#[derive(Debug, Serialize)]
pub struct CsrOutput {
    #[serde(rename = "Req")]
    pub req: String,
}

/// `{Key}` output of `pkgen`.
#[derive(Debug, Serialize)]
pub struct KeyOutput {
    #[serde(rename = "Key")]
    pub key: String,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Certinfo => "certinfo",
            Commands::Csr => "csr",
            Commands::Pkinfo { .. } => "pkinfo",
            Commands::Randint { .. } => "randint",
            Commands::Hashsha256 => "hashsha256",
            Commands::Hashsha512 => "hashsha512",
            Commands::Pkgen(_) => "pkgen",
        }
    }
}

/// Cause carried in the envelope for a command line clap rejected.
///
/// A bare invocation makes clap render the help text as its error, so that
/// case is named explicitly. Otherwise the first line of the clap error is
/// used, without its `error: ` prefix.
pub fn argument_error(e: &clap::Error) -> CryptError {
    if matches!(
        e.kind(),
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    ) {
        return CryptError::Argument("missing subcommand".to_string());
    }
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    CryptError::Argument(first.trim_start_matches("error: ").to_string())
}

/// Reads one line of input. A missing trailing newline is fine; an empty
/// stream yields an empty string.
fn read_line(input: &mut impl BufRead) -> Result<String, CryptError> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| CryptError::Decode(e.to_string()))?;
    Ok(line)
}

/// Runs a command and returns its JSON output.
pub fn execute(command: &Commands, input: &mut impl BufRead) -> Result<String, CryptError> {
    tracing::debug!(command = command.name(), "dispatching");
    let json = match command {
        Commands::Certinfo => serde_json::to_string(&cert::certificate_info(&read_line(input)?)?)?,
        Commands::Csr => serde_json::to_string(&CsrOutput {
            req: csr::create_csr(&read_line(input)?)?,
        })?,
        Commands::Pkinfo { hex } => {
            let hex = match hex {
                Some(hex) => hex.clone(),
                None => read_line(input)?,
            };
            serde_json::to_string(&key::private_key_info(&hex)?)?
        }
        Commands::Randint { max } => serde_json::to_string(&MessageOutput {
            message: random::random_int(*max)?,
        })?,
        Commands::Hashsha256 => serde_json::to_string(&MessageOutput {
            message: hash::hash_sha256_hex(&read_line(input)?)?,
        })?,
        Commands::Hashsha512 => serde_json::to_string(&MessageOutput {
            message: hash::hash_sha512_hex(&read_line(input)?)?,
        })?,
        Commands::Pkgen(PkgenCommand::Ec(args)) => serde_json::to_string(&KeyOutput {
            key: PrivateKey::generate_ec(args.curve).to_pem()?,
        })?,
        Commands::Pkgen(PkgenCommand::Rsa(args)) => serde_json::to_string(&KeyOutput {
            key: PrivateKey::generate_rsa(args.bits)?.to_pem()?,
        })?,
    };
    Ok(json)
}
