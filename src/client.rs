//! A managed top-level window.

use crate::xconn::{Window, XConn};

/// One managed top-level X window. `workspace` is assigned at first-map and
/// never changes thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Client {
    pub window: Window,
    pub workspace: usize,
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Client {
    /// Border width is already applied during `ConfigureRequest` handling,
    /// so construction here only records geometry and maps the window with
    /// its default border.
    pub fn new<X: XConn>(conn: &X, window: Window, workspace: usize, default_colour: u64) -> Client {
        let geom = conn.get_geometry(window).unwrap_or(crate::xconn::Geometry {
            x: 0,
            y: 0,
            w: 1,
            h: 1,
        });
        conn.map_window(window);
        conn.change_border_colour(window, default_colour);
        Client {
            window,
            workspace,
            x: geom.x,
            y: geom.y,
            w: geom.w,
            h: geom.h,
        }
    }

    /// Ask the client to close cooperatively via `WM_DELETE_WINDOW`/
    /// `WM_PROTOCOLS`. The manager does not unmap or kill unilaterally -- it
    /// waits for the resulting UnmapNotify/DestroyNotify.
    pub fn destroy<X: XConn>(&self, conn: &X, wm_protocols: crate::xconn::Atom, wm_delete_window: crate::xconn::Atom) {
        conn.send_delete_window(self.window, wm_protocols, wm_delete_window);
    }

    pub fn map<X: XConn>(&self, conn: &X) {
        conn.map_window(self.window);
    }

    /// Park the window off-screen to the left rather than unmapping it,
    /// since Unmap would generate a synthetic UnmapNotify the dispatcher
    /// would mistake for client removal.
    pub fn hide<X: XConn>(&mut self, conn: &X) {
        let x = -2 * self.w as i32;
        self.resize(conn, x, self.y, self.w, self.h);
    }

    pub fn resize<X: XConn>(&mut self, conn: &X, x: i32, y: i32, w: u32, h: u32) {
        self.x = x;
        self.y = y;
        self.w = w;
        self.h = h;
        conn.configure_window(self.window, x, y, w, h, None);
    }

    pub fn accent_border<X: XConn>(&self, conn: &X, colour: u64) {
        conn.change_border_colour(self.window, colour);
    }

    pub fn default_border<X: XConn>(&self, conn: &X, colour: u64) {
        conn.change_border_colour(self.window, colour);
    }

    pub fn set_input_focus<X: XConn>(&self, conn: &X) {
        conn.set_input_focus(self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xconn::test_support::RecordingConn;

    #[test]
    fn construct_maps_and_borders_with_default_colour() {
        let conn = RecordingConn::new(1200, 800);
        let c = Client::new(&conn, 7, 0, 0x888888);
        assert_eq!(c.window, 7);
        assert_eq!(c.w, 1200);
        use crate::xconn::test_support::Call;
        assert!(conn.calls.borrow().contains(&Call::Map(7)));
        assert!(conn.calls.borrow().contains(&Call::Border(7, 0x888888)));
    }

    #[test]
    fn hide_parks_window_off_screen_to_the_left() {
        let conn = RecordingConn::new(1200, 800);
        let mut c = Client::new(&conn, 7, 0, 0x888888);
        c.w = 600;
        c.hide(&conn);
        assert_eq!(c.x, -1200);
    }
}
