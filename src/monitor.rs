//! The root aggregate: owns every `Client` and `Workspace`, the X
//! connection, and the currently visible workspace. All mutation of the
//! shared world happens through `&mut Monitor` methods, and every one of
//! them is written to leave the crate's invariants holding when it returns.

use crate::client::Client;
use crate::config::Config;
use crate::layout::Placement;
use crate::workspace::Workspace;
use crate::xconn::{Atom, Window, XConn};

pub struct Atoms {
    pub wm_protocols: Atom,
    pub wm_delete_window: Atom,
}

pub struct Monitor<X: XConn> {
    pub conn: X,
    pub atoms: Atoms,
    pub w: u32,
    pub h: u32,
    pub borderpx: u32,
    pub colour_accent: u64,
    pub colour_default: u64,
    /// Ordered sequence of all managed clients across all workspaces;
    /// insertion order encodes stacking-for-layout order, not z-order.
    pub clients: Vec<Client>,
    pub workspaces: Vec<Workspace>,
    pub current_workspace: usize,
}

impl<X: XConn> Monitor<X> {
    pub fn new(conn: X, config: &Config) -> crate::error::Result<Self> {
        let (w, h) = conn.screen_dimensions();
        let wm_protocols = conn.intern_atom("WM_PROTOCOLS")?;
        let wm_delete_window = conn.intern_atom("WM_DELETE_WINDOW")?;
        let workspaces = config
            .tags
            .iter()
            .map(|tag| Workspace::new(tag.clone(), config.default_layout))
            .collect();

        Ok(Monitor {
            conn,
            atoms: Atoms { wm_protocols, wm_delete_window },
            w,
            h,
            borderpx: config.borderpx,
            colour_accent: config.colours.accent,
            colour_default: config.colours.default,
            clients: Vec::new(),
            workspaces,
            current_workspace: 0,
        })
    }

    /// Derived view: the projection of `clients` onto `ws`, in `clients`
    /// order. Recomputed on demand rather than cached.
    pub fn workspace_windows(&self, ws: usize) -> Vec<Window> {
        self.clients
            .iter()
            .filter(|c| c.workspace == ws)
            .map(|c| c.window)
            .collect()
    }

    fn client_index(&self, window: Window) -> Option<usize> {
        self.clients.iter().position(|c| c.window == window)
    }

    pub fn find_client(&self, window: Window) -> Option<&Client> {
        self.clients.iter().find(|c| c.window == window)
    }

    pub fn workspace_of_window(&self, window: Window) -> Option<usize> {
        self.find_client(window).map(|c| c.workspace)
    }

    /// Handles a `MapRequest` for an unmanaged window: construct and add it.
    pub fn manage_window(&mut self, window: Window) {
        let ws = self.current_workspace;
        let client = Client::new(&self.conn, window, ws, self.colour_default);
        self.add_client(client);
    }

    /// Inserts a newly constructed client into its workspace's client list
    /// and focuses or arranges it as appropriate.
    pub fn add_client(&mut self, client: Client) {
        let window = client.window;
        let ws = client.workspace;
        let insert_at = self.workspaces[ws]
            .current
            .and_then(|cur| self.client_index(cur))
            .map(|pos| pos + 1)
            .unwrap_or(self.clients.len());
        self.clients.insert(insert_at, client);

        let had_focus = self.workspaces[ws].current.is_some();
        let ordered = self.workspace_windows(ws);
        let idx = self.workspaces[ws].current_index(&ordered);
        self.workspaces[ws].layout.update_range(ordered.len(), idx);

        if !had_focus {
            self.focus_window(ws, window);
        } else {
            self.arrange_workspace(ws);
        }
    }

    /// Removes a client and refocuses a neighbour if it was focused.
    pub fn delete_client(&mut self, window: Window) {
        let global_idx = match self.client_index(window) {
            Some(i) => i,
            None => return,
        };
        let ws = self.clients[global_idx].workspace;
        let ordered_before = self.workspace_windows(ws);
        let pos_in_ws = Workspace::index_of(&ordered_before, window);
        let was_focused = self.workspaces[ws].current == Some(window);

        self.clients.remove(global_idx);
        if was_focused {
            self.workspaces[ws].current = None;
        }

        let ordered_after = self.workspace_windows(ws);
        let idx = self.workspaces[ws].current_index(&ordered_after);
        self.workspaces[ws].layout.update_range(ordered_after.len(), idx);

        if !was_focused || ordered_after.is_empty() {
            return;
        }

        // Bias focus toward a neighbour of the removed client.
        let refocus = if pos_in_ws == Some(0) {
            ordered_after[0]
        } else {
            *ordered_after.last().unwrap()
        };
        self.focus_window(ws, refocus);
    }

    /// The focus state machine, centralised here since it needs access to
    /// both the previously- and newly-focused client plus the workspace's
    /// layout and the monitor's dimensions.
    pub fn focus_window(&mut self, ws: usize, target: Window) {
        if self.workspaces[ws].current == Some(target) {
            return;
        }

        if let Some(old) = self.workspaces[ws].current {
            if let Some(old_client) = self.find_client(old) {
                old_client.default_border(&self.conn, self.colour_default);
            }
            if self.workspaces[ws].current == Some(old) {
                self.workspaces[ws].current = None;
            }
        }

        self.workspaces[ws].current = Some(target);

        let is_current_workspace = ws == self.current_workspace;
        if is_current_workspace {
            if let Some(client) = self.find_client(target) {
                client.accent_border(&self.conn, self.colour_accent);
                client.set_input_focus(&self.conn);
            }
        }
        // Cross-workspace focus requests defer border/input-focus side
        // effects until the workspace becomes current; the control socket's
        // command vocabulary never triggers this path, but `set_workspace`
        // below still applies them correctly if it happens.

        let ordered = self.workspace_windows(ws);
        let idx = Workspace::index_of(&ordered, target);
        let in_range = idx.map_or(false, |i| self.workspaces[ws].layout.range.contains(&i));
        if !in_range {
            self.workspaces[ws].layout.update_range(ordered.len(), idx);
            if is_current_workspace {
                self.arrange_workspace(ws);
            }
        }
    }

    /// Requests that the workspace's current client close itself.
    pub fn destroy_current_window(&mut self, ws: usize) {
        if let Some(window) = self.workspaces[ws].current {
            if let Some(client) = self.find_client(window) {
                client.destroy(&self.conn, self.atoms.wm_protocols, self.atoms.wm_delete_window);
            }
        }
    }

    /// Cycles focus to the next (or previous) client in `ws`.
    pub fn focus_next(&mut self, ws: usize, reverse: bool) {
        let ordered = self.workspace_windows(ws);
        if let Some(target) = self.workspaces[ws].next_candidate(&ordered, reverse) {
            self.focus_window(ws, target);
        }
    }

    /// Cycles `ws` to the next (or previous) layout and rearranges it.
    pub fn next_layout(&mut self, ws: usize, reverse: bool) {
        let ordered = self.workspace_windows(ws);
        self.workspaces[ws].next_layout(reverse, &ordered);
        if ws == self.current_workspace {
            self.arrange_workspace(ws);
        }
    }

    /// Switches to the next (or previous) workspace in tag order.
    pub fn next_workspace(&mut self, reverse: bool) {
        let n = self.workspaces.len();
        let next = if reverse {
            (self.current_workspace + n - 1) % n
        } else {
            (self.current_workspace + 1) % n
        };
        self.set_workspace(next);
    }

    /// Switches the visible workspace to `ws`, hiding the outgoing one's
    /// clients and re-arranging and focusing the incoming one.
    pub fn set_workspace(&mut self, ws: usize) {
        if ws == self.current_workspace {
            return;
        }
        let outgoing = self.current_workspace;
        for window in self.workspace_windows(outgoing) {
            if let Some(idx) = self.client_index(window) {
                self.clients[idx].hide(&self.conn);
            }
        }

        self.current_workspace = ws;
        self.arrange_workspace(ws);

        if let Some(target) = self.workspaces[ws].current {
            if let Some(client) = self.find_client(target) {
                client.accent_border(&self.conn, self.colour_accent);
                client.set_input_focus(&self.conn);
            }
        }
    }

    /// Applies the workspace's layout to its clients. No-op unless `ws` is
    /// the current workspace.
    pub fn arrange_workspace(&mut self, ws: usize) {
        if ws != self.current_workspace {
            return;
        }
        let ordered = self.workspace_windows(ws);
        let current_idx = self.workspaces[ws].current_index(&ordered);
        let placements = self.workspaces[ws]
            .layout
            .arrange(ordered.len(), self.w, self.h, self.borderpx, current_idx);

        for placement in placements {
            match placement {
                Placement::Show(i, rect) => {
                    let window = ordered[i];
                    if let Some(idx) = self.client_index(window) {
                        self.clients[idx].resize(&self.conn, rect.x, rect.y, rect.w, rect.h);
                    }
                }
                Placement::Hide(i) => {
                    let window = ordered[i];
                    if let Some(idx) = self.client_index(window) {
                        self.clients[idx].hide(&self.conn);
                    }
                }
            }
        }
        self.conn.flush();
    }

    /// Asserts the structural invariants every mutating method must leave
    /// holding: no duplicate windows, a focused client is always a member of
    /// its own workspace, and a workspace's visible range is always a valid,
    /// correctly-sized, focus-containing slice of its client list.
    #[cfg(test)]
    pub fn check_invariants(&self) {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for c in &self.clients {
            assert!(seen.insert(c.window), "duplicate window {:#x}", c.window);
        }

        for (ws, workspace) in self.workspaces.iter().enumerate() {
            let ordered = self.workspace_windows(ws);
            if let Some(cur) = workspace.current {
                assert!(ordered.contains(&cur), "current client is not a member of its own workspace");
            }
            let range = &workspace.layout.range;
            assert!(range.start <= range.end, "range start > end");
            assert!(range.end <= ordered.len(), "range end beyond client count");
            assert!(
                range.end - range.start <= workspace.layout.kind.max_cols(),
                "range wider than max_cols"
            );
            if let Some(cur) = workspace.current {
                let idx = Workspace::index_of(&ordered, cur).unwrap();
                assert!(range.contains(&idx), "current client index outside visible range");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::layout::LayoutKind;
    use crate::xconn::test_support::RecordingConn;

    fn monitor() -> Monitor<RecordingConn> {
        let conn = RecordingConn::new(1200, 800);
        Monitor::new(conn, &Config::default()).unwrap()
    }

    #[test]
    fn manage_window_focuses_first_client() {
        let mut m = monitor();
        m.manage_window(1);
        assert_eq!(m.workspaces[0].current, Some(1));
        m.check_invariants();
    }

    // Delete then add leaves the client count unchanged.
    #[test]
    fn delete_then_add_preserves_length() {
        let mut m = monitor();
        m.manage_window(1);
        m.manage_window(2);
        m.manage_window(3);
        assert_eq!(m.clients.len(), 3);

        m.delete_client(2);
        assert_eq!(m.clients.len(), 2);

        m.manage_window(4);
        assert_eq!(m.clients.len(), 3);
        m.check_invariants();
    }

    // Deleting a client that was never focused must not move focus or touch
    // borders/input focus on any other client.
    #[test]
    fn delete_non_focused_client_leaves_focus_untouched() {
        use crate::xconn::test_support::Call;
        let mut m = monitor();
        m.manage_window(1);
        m.manage_window(2);
        m.manage_window(3);
        assert_eq!(m.workspaces[0].current, Some(1));

        m.conn.calls.borrow_mut().clear();
        m.delete_client(2);

        assert_eq!(m.workspace_windows(0), vec![1, 3]);
        assert_eq!(m.workspaces[0].current, Some(1));
        assert!(
            m.conn
                .calls
                .borrow()
                .iter()
                .all(|c| !matches!(c, Call::Border(..) | Call::Focus(..))),
            "deleting an unfocused client must not touch border/input focus"
        );
        m.check_invariants();
    }

    // Delete the focused client at index 0 of a three-client workspace.
    #[test]
    fn delete_focused_head_refocuses_new_head() {
        let mut m = monitor();
        m.manage_window(1);
        m.manage_window(2);
        m.manage_window(3);
        m.focus_window(0, 1);
        assert_eq!(m.workspace_windows(0), vec![1, 2, 3]);

        m.delete_client(1);
        assert_eq!(m.workspace_windows(0), vec![2, 3]);
        assert_eq!(m.workspaces[0].current, Some(2));
        m.check_invariants();
    }

    // `q` / destroy_current_window sends exactly one delete event, no
    // immediate removal.
    #[test]
    fn destroy_current_window_sends_delete_event_only() {
        use crate::xconn::test_support::Call;
        let mut m = monitor();
        m.manage_window(1);
        m.destroy_current_window(0);
        assert_eq!(m.clients.len(), 1, "destroy must not remove the client itself");
        assert_eq!(m.conn.calls.borrow().iter().filter(|c| matches!(c, Call::DeleteWindow(_))).count(), 1);
    }

    // Switching workspace hides all clients of the outgoing workspace.
    #[test]
    fn set_workspace_hides_outgoing_clients() {
        let mut m = monitor();
        m.manage_window(1);
        m.set_workspace(1);
        assert_eq!(m.current_workspace, 1);
        // hidden client's x is off-screen to the left.
        let c = m.find_client(1).unwrap();
        assert!(c.x < 0);
        m.check_invariants();
    }

    // next_workspace repeated once per workspace returns to the start.
    #[test]
    fn next_workspace_cycle_returns_to_start() {
        let mut m = monitor();
        let k = m.workspaces.len();
        for _ in 0..k {
            m.next_workspace(false);
        }
        assert_eq!(m.current_workspace, 0);
    }

    #[test]
    fn next_layout_cycles_and_rearranges() {
        let mut m = monitor();
        m.manage_window(1);
        assert_eq!(m.workspaces[0].layout.kind, LayoutKind::ThreeColumns);
        m.next_layout(0, false);
        assert_eq!(m.workspaces[0].layout.kind, LayoutKind::FourColumns);
    }

    #[quickcheck_macros::quickcheck]
    fn invariants_hold_after_random_operations(ops: Vec<u8>) -> bool {
        let mut m = monitor();
        let mut next_window: Window = 1;
        for op in ops {
            match op % 6 {
                0 => {
                    m.manage_window(next_window);
                    next_window += 1;
                }
                1 => {
                    if let Some(&w) = m.clients.first().map(|c| &c.window) {
                        m.delete_client(w);
                    }
                }
                2 => m.focus_next(m.current_workspace, false),
                3 => m.focus_next(m.current_workspace, true),
                4 => m.next_layout(m.current_workspace, false),
                _ => m.next_workspace(false),
            }
        }
        m.check_invariants();
        true
    }
}
