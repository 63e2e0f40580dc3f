use std::io;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can surface out of a dispatcher handler.
/// `TransientWindow` is deliberately *not* meant to escape a single
/// handler -- call sites recover from it locally and only ever log it.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An X request referenced a window that has since been destroyed. The
    /// model will be reconciled by the UnmapNotify/DestroyNotify that is
    /// already in flight; callers should swallow this and move on.
    #[error("stale window {0:#x}: {1}")]
    TransientWindow(u64, &'static str),

    /// A malformed or unexpected response from the X server (atom interning
    /// failure, a request we didn't expect to fail failing anyway).
    #[error("X protocol error: {0}")]
    Protocol(String),

    /// The connection to the X server was closed.
    #[error("connection to the X server was lost")]
    ConnectionLost,

    #[error("command socket error: {0}")]
    Socket(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// An internal invariant was observed to be false. This is always a
/// programming error, never a recoverable condition, so it is raised as a
/// panic rather than threaded through `Result` -- see DESIGN.md.
#[track_caller]
pub fn invariant_violation(what: &str) -> ! {
    panic!("internal invariant violated: {}", what);
}
