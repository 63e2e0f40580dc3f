//! Control client: an external collaborator to the daemon, not part of it.
//! Validates a single command byte against the control alphabet, writes it
//! to the configured socket, exits.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::process::ExitCode;

use vaswm::command::Command;
use vaswm::config::DEFAULT_SOCKET_PATH;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let raw = match args.next() {
        Some(s) => s,
        None => {
            eprintln!("usage: vaswmctl <command>");
            return ExitCode::FAILURE;
        }
    };

    if Command::parse(raw.as_bytes()).is_none() {
        eprintln!("unknown command: {:?}", raw);
        return ExitCode::FAILURE;
    }

    let socket_path = std::env::var("VASWM_SOCKET").unwrap_or_else(|_| DEFAULT_SOCKET_PATH.to_string());

    let mut stream = match UnixStream::connect(&socket_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("could not connect to {}: {}", socket_path, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = stream.write_all(&raw.as_bytes()[..1]) {
        eprintln!("write failed: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
