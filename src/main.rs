//! Bootstrap: parse an optional config path, open the X display, build the
//! `Monitor`, bind the command socket, install signal handling, and run the
//! dispatcher until shutdown or a fatal error.

#[macro_use]
extern crate log;

use nix::sys::signal::{self, SigHandler, Signal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use vaswm::error::Error;
use vaswm::{Config, EventDispatcher, Monitor, Xlib};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn request_shutdown(_signum: i32) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

fn install_signal_handlers() {
    let handler = SigHandler::Handler(request_shutdown);
    unsafe {
        signal::signal(Signal::SIGINT, handler).expect("failed to install SIGINT handler");
        signal::signal(Signal::SIGTERM, handler).expect("failed to install SIGTERM handler");
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .write_style(env_logger::WriteStyle::Auto)
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref());

    install_signal_handlers();

    let conn = match Xlib::open() {
        Ok(conn) => conn,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let monitor = match Monitor::new(conn, &config) {
        Ok(m) => m,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut dispatcher = match EventDispatcher::new(monitor, &config.socket_path, &SHUTDOWN) {
        Ok(d) => d,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("vaswm started, control socket at {}", config.socket_path);

    match dispatcher.run() {
        Ok(()) => {
            info!("shutting down cleanly");
            ExitCode::SUCCESS
        }
        Err(e @ Error::ConnectionLost) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
