//! The seam between the pure workspace/layout/focus state machine and the
//! real X11 server, kept to the handful of requests this crate actually
//! needs, and backed by raw Xlib rather than `x11rb`/XCB.
//!
//! Everything above this trait (`Client`, `Workspace`, `Monitor`) is a pure
//! function of in-memory state plus a sequence of calls against `XConn`; the
//! real implementation (`Xlib`) is the only place `unsafe` FFI appears, and
//! tests substitute `test_support::RecordingConn` to exercise the state
//! machine without an X server.

use crate::error::{Error, Result};
use std::ffi::CString;
use std::os::raw::c_int;
use x11::xlib;

pub type Window = xlib::Window;
pub type Atom = xlib::Atom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

pub trait XConn {
    fn screen_dimensions(&self) -> (u32, u32);
    fn intern_atom(&self, name: &str) -> Result<Atom>;
    fn get_geometry(&self, window: Window) -> Result<Geometry>;
    fn map_window(&self, window: Window);
    fn configure_window(&self, window: Window, x: i32, y: i32, w: u32, h: u32, border: Option<u32>);
    fn select_enter_events(&self, window: Window);
    fn change_border_colour(&self, window: Window, pixel: u64);
    fn set_input_focus(&self, window: Window);
    fn send_delete_window(&self, window: Window, wm_protocols: Atom, wm_delete_window: Atom);
    fn flush(&self);
}

/// Real connection, backed by `x11::xlib`. All requests here are
/// best-effort: a `BadWindow` from a request racing a client's own
/// destruction is swallowed at the call site, not here -- this type only
/// issues the request.
pub struct Xlib {
    display: *mut xlib::Display,
    root: Window,
    screen: c_int,
}

// The connection is only ever touched from the single dispatcher loop
// thread: there is no concurrent access to `display` to race on.
unsafe impl Send for Xlib {}

impl Xlib {
    pub fn open() -> Result<Self> {
        let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };
        if display.is_null() {
            return Err(Error::Protocol("could not open X display".into()));
        }
        let screen = unsafe { xlib::XDefaultScreen(display) };
        let root = unsafe { xlib::XRootWindow(display, screen) };
        Ok(Xlib { display, root, screen })
    }

    pub fn display(&self) -> *mut xlib::Display {
        self.display
    }

    pub fn root(&self) -> Window {
        self.root
    }

    /// The raw connection fd, for registering with `poll`.
    pub fn connection_fd(&self) -> c_int {
        unsafe { xlib::XConnectionNumber(self.display) }
    }

    pub fn select_root_events(&self) {
        unsafe {
            xlib::XSelectInput(
                self.display,
                self.root,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask,
            );
        }
    }

    pub fn pending(&self) -> c_int {
        unsafe { xlib::XPending(self.display) }
    }

    pub fn next_event(&self) -> xlib::XEvent {
        let mut event: xlib::XEvent = unsafe { std::mem::zeroed() };
        unsafe {
            xlib::XNextEvent(self.display, &mut event);
        }
        event
    }
}

impl XConn for Xlib {
    fn screen_dimensions(&self) -> (u32, u32) {
        unsafe {
            let w = xlib::XDisplayWidth(self.display, self.screen);
            let h = xlib::XDisplayHeight(self.display, self.screen);
            (w as u32, h as u32)
        }
    }

    fn intern_atom(&self, name: &str) -> Result<Atom> {
        let cname = CString::new(name).map_err(|_| Error::Protocol(format!("bad atom name {}", name)))?;
        let atom = unsafe { xlib::XInternAtom(self.display, cname.as_ptr(), xlib::False) };
        if atom == 0 {
            return Err(Error::Protocol(format!("failed to intern atom {}", name)));
        }
        Ok(atom)
    }

    fn get_geometry(&self, window: Window) -> Result<Geometry> {
        let mut attrs: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        let ok = unsafe { xlib::XGetWindowAttributes(self.display, window, &mut attrs) };
        if ok == 0 {
            return Err(Error::TransientWindow(window, "XGetWindowAttributes"));
        }
        Ok(Geometry {
            x: attrs.x,
            y: attrs.y,
            w: attrs.width as u32,
            h: attrs.height as u32,
        })
    }

    fn map_window(&self, window: Window) {
        unsafe {
            xlib::XMapWindow(self.display, window);
        }
    }

    fn configure_window(&self, window: Window, x: i32, y: i32, w: u32, h: u32, border: Option<u32>) {
        let mut mask = (xlib::CWX | xlib::CWY | xlib::CWWidth | xlib::CWHeight) as u32;
        let mut changes = xlib::XWindowChanges {
            x,
            y,
            width: w as c_int,
            height: h as c_int,
            border_width: 0,
            sibling: 0,
            stack_mode: 0,
        };
        if let Some(bw) = border {
            mask |= xlib::CWBorderWidth as u32;
            changes.border_width = bw as c_int;
        }
        unsafe {
            xlib::XConfigureWindow(self.display, window, mask as u32, &mut changes);
        }
    }

    fn select_enter_events(&self, window: Window) {
        unsafe {
            xlib::XSelectInput(self.display, window, xlib::EnterWindowMask);
        }
    }

    fn change_border_colour(&self, window: Window, pixel: u64) {
        unsafe {
            xlib::XSetWindowBorder(self.display, window, pixel);
        }
    }

    fn set_input_focus(&self, window: Window) {
        unsafe {
            xlib::XSetInputFocus(
                self.display,
                window,
                xlib::RevertToPointerRoot,
                xlib::CurrentTime,
            );
        }
    }

    fn send_delete_window(&self, window: Window, wm_protocols: Atom, wm_delete_window: Atom) {
        let mut data = xlib::ClientMessageData::new();
        data.set_long(0, wm_delete_window as i64);
        let event = xlib::XClientMessageEvent {
            type_: xlib::ClientMessage,
            serial: 0,
            send_event: xlib::True,
            display: self.display,
            window,
            message_type: wm_protocols,
            format: 32,
            data,
        };
        let mut xevent = xlib::XEvent::from(event);
        unsafe {
            xlib::XSendEvent(self.display, window, xlib::False, xlib::NoEventMask, &mut xevent);
        }
    }

    fn flush(&self) {
        unsafe {
            xlib::XFlush(self.display);
        }
    }
}

impl Drop for Xlib {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.display);
        }
        info!("closed X display");
    }
}
