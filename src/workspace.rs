//! A named group of clients with its own focus pointer and layout.
//! The ordered client list is a derived view over
//! `Monitor::clients`, so `Workspace` itself only stores what cannot be
//! recomputed: its tag, its current layout, and which window (if any) is
//! focused within it.

use crate::layout::{Layout, LayoutKind};
use crate::xconn::Window;

#[derive(Debug, Clone)]
pub struct Workspace {
    pub tag: String,
    pub layout: Layout,
    /// `None` if this workspace has no clients, or none of them is focused.
    pub current: Option<Window>,
}

impl Workspace {
    pub fn new(tag: impl Into<String>, default_layout: LayoutKind) -> Self {
        Workspace {
            tag: tag.into(),
            layout: Layout::new(default_layout),
            current: None,
        }
    }

    /// Index of `window` within `ordered` (this workspace's derived client
    /// view, in `Monitor::clients` order).
    pub fn index_of(ordered: &[Window], window: Window) -> Option<usize> {
        ordered.iter().position(|&w| w == window)
    }

    /// Index of the currently focused client, if any. It must be a member
    /// of `ordered` whenever `current` is set.
    pub fn current_index(&self, ordered: &[Window]) -> Option<usize> {
        self.current.and_then(|w| Self::index_of(ordered, w))
    }

    /// A fresh `Layout` of the next type in the cycle, with `update_range`
    /// already applied. `arrange()` is the caller's responsibility
    /// (typically immediate, if this workspace is current).
    pub fn next_layout(&mut self, reverse: bool, ordered: &[Window]) {
        let kind = self.layout.kind.cycle(reverse);
        let mut layout = Layout::new(kind);
        layout.update_range(ordered.len(), self.current_index(ordered));
        self.layout = layout;
    }

    /// The window that should become focused, cycling through `ordered`.
    /// Returns `None` if fewer than two clients (no-op) or if nothing is
    /// currently focused.
    pub fn next_candidate(&self, ordered: &[Window], reverse: bool) -> Option<Window> {
        if ordered.len() < 2 {
            return None;
        }
        let cur = self.current_index(ordered)?;
        let n = ordered.len();
        let next = if reverse { (cur + n - 1) % n } else { (cur + 1) % n };
        Some(ordered[next])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_candidate_cycles_forward_and_back() {
        let mut ws = Workspace::new("wrk", LayoutKind::ThreeColumns);
        let ordered = vec![1, 2, 3];
        ws.current = Some(1);
        assert_eq!(ws.next_candidate(&ordered, false), Some(2));
        assert_eq!(ws.next_candidate(&ordered, true), Some(3));
    }

    #[test]
    fn next_candidate_is_none_below_two_clients() {
        let mut ws = Workspace::new("wrk", LayoutKind::ThreeColumns);
        ws.current = Some(1);
        assert_eq!(ws.next_candidate(&[1], false), None);
        assert_eq!(ws.next_candidate(&[], false), None);
    }

    // Repeated focus_next N times on an N-client workspace returns to start.
    #[test]
    fn focus_next_full_cycle_returns_to_start() {
        let mut ws = Workspace::new("wrk", LayoutKind::ThreeColumns);
        let ordered = vec![10, 20, 30, 40];
        ws.current = Some(10);
        let mut cur = ws.current.unwrap();
        for _ in 0..ordered.len() {
            cur = ws.next_candidate(&ordered, false).unwrap();
            ws.current = Some(cur);
        }
        assert_eq!(cur, 10);
    }
}
