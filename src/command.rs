//! The command alphabet: the wire format accepted on the local control
//! socket, and its mapping onto `Monitor`/`Workspace` operations.

use crate::monitor::Monitor;
use crate::xconn::XConn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FocusNext,
    FocusPrev,
    NextWorkspace,
    PrevWorkspace,
    Close,
    NextLayout,
    PrevLayout,
    GotoWorkspace(usize),
}

impl Command {
    /// Parses a single command byte off the wire. `buf` may be up to two
    /// bytes per the protocol, but only the first byte carries meaning
    /// today; a second byte is reserved and ignored.
    pub fn parse(buf: &[u8]) -> Option<Command> {
        let b = *buf.first()?;
        match b {
            b'n' => Some(Command::FocusNext),
            b'p' => Some(Command::FocusPrev),
            b'N' => Some(Command::NextWorkspace),
            b'P' => Some(Command::PrevWorkspace),
            b'q' => Some(Command::Close),
            b'l' => Some(Command::NextLayout),
            b'L' => Some(Command::PrevLayout),
            b'1'..=b'5' => Some(Command::GotoWorkspace((b - b'1') as usize)),
            _ => None,
        }
    }

    /// Dispatch to the relevant `Monitor` method. Workspace commands
    /// addressing a tag beyond the configured list are silently ignored.
    pub fn apply<X: XConn>(self, monitor: &mut Monitor<X>) {
        let ws = monitor.current_workspace;
        match self {
            Command::FocusNext => monitor.focus_next(ws, false),
            Command::FocusPrev => monitor.focus_next(ws, true),
            Command::NextWorkspace => monitor.next_workspace(false),
            Command::PrevWorkspace => monitor.next_workspace(true),
            Command::Close => monitor.destroy_current_window(ws),
            Command::NextLayout => monitor.next_layout(ws, false),
            Command::PrevLayout => monitor.next_layout(ws, true),
            Command::GotoWorkspace(target) => {
                if target < monitor.workspaces.len() {
                    monitor.set_workspace(target);
                }
            }
        }
    }
}
