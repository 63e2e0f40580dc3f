#[macro_use]
extern crate log;

pub mod client;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod layout;
pub mod monitor;
pub mod workspace;
pub mod xconn;

pub use config::Config;
pub use dispatcher::EventDispatcher;
pub use error::{Error, Result};
pub use monitor::Monitor;
pub use xconn::Xlib;
