use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use cryptkit::command::{Cli, argument_error, execute};
use cryptkit::error::{CryptError, ErrorEnvelope};
use cryptkit::telemetry;

/// Prints the error envelope on stdout and yields exit status 1.
fn report(err: &CryptError) -> ExitCode {
    tracing::warn!(error = %err, "command failed");
    let envelope = ErrorEnvelope::from(err);
    match serde_json::to_string(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("could not encode error envelope: {e}"),
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    if let Err(err) = telemetry::init_tracing() {
        eprintln!("logging disabled: {err}");
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => return report(&argument_error(&e)),
    };

    let stdin = io::stdin();
    match execute(&cli.command, &mut stdin.lock()) {
        Ok(json) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{json}") {
                return report(&CryptError::Serialization(e.to_string()));
            }
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}
