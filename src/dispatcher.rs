//! Demultiplexes X events and socket commands into `Monitor` mutations.
//! This is the only place concurrency is observed -- a single `poll(2)`
//! call waits on the X connection fd and the command-socket listener fd;
//! each wake-up drains its source fully before flushing to the server.

use crate::command::Command;
use crate::error::{Error, Result};
use crate::monitor::Monitor;
use crate::xconn::{XConn, Xlib};
use nix::poll::{poll, PollFd, PollFlags};
use std::io::Read;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixListener;
use std::sync::atomic::{AtomicBool, Ordering};
use x11::xlib;

pub struct EventDispatcher {
    pub monitor: Monitor<Xlib>,
    listener: UnixListener,
    shutdown: &'static AtomicBool,
}

impl EventDispatcher {
    pub fn new(monitor: Monitor<Xlib>, socket_path: &str, shutdown: &'static AtomicBool) -> Result<Self> {
        let _ = std::fs::remove_file(socket_path);
        let listener = UnixListener::bind(socket_path)?;
        listener.set_nonblocking(true)?;
        monitor.conn.select_root_events();
        monitor.conn.flush();
        Ok(EventDispatcher { monitor, listener, shutdown })
    }

    /// Runs until the shutdown flag is set (SIGINT/SIGTERM, installed by
    /// the caller) or a fatal error surfaces.
    pub fn run(&mut self) -> Result<()> {
        let x_fd = self.monitor.conn.connection_fd();
        let socket_fd = self.listener.as_raw_fd();

        while !self.shutdown.load(Ordering::SeqCst) {
            let mut fds = [
                PollFd::new(x_fd, PollFlags::POLLIN),
                PollFd::new(socket_fd, PollFlags::POLLIN),
            ];

            match poll(&mut fds, -1) {
                Ok(_) => {}
                Err(nix::Error::EINTR) => continue,
                Err(e) => return Err(Error::Protocol(format!("poll failed: {}", e))),
            }

            let x_ready = fds[0].revents().unwrap_or_else(PollFlags::empty).contains(PollFlags::POLLIN);
            let socket_ready = fds[1].revents().unwrap_or_else(PollFlags::empty).contains(PollFlags::POLLIN);

            if x_ready {
                self.drain_x_events()?;
            }
            if socket_ready {
                self.accept_commands();
            }
        }
        Ok(())
    }

    /// X events are drained fully per wake-up so the geometry state never
    /// starves behind a backlog of socket commands.
    fn drain_x_events(&mut self) -> Result<()> {
        while self.monitor.conn.pending() > 0 {
            let event = self.monitor.conn.next_event();
            self.handle_x_event(event);
            self.monitor.conn.flush();
        }
        Ok(())
    }

    fn handle_x_event(&mut self, event: xlib::XEvent) {
        #[allow(non_upper_case_globals)]
        /* Safe because the event type dictates well-defined union member access. */
        unsafe {
            match event.get_type() {
                xlib::EnterNotify => self.on_enter_notify(&event.crossing),
                xlib::ConfigureRequest => self.on_configure_request(&event.configure_request),
                xlib::MapRequest => self.on_map_request(&event.map_request),
                xlib::UnmapNotify => self.on_unmap_notify(&event.unmap),
                xlib::LeaveNotify => {
                    // Observed, not acted on.
                    trace!("LeaveNotify on {:#x}, no-op", event.crossing.window);
                }
                other => trace!("ignoring unhandled X event type {}", other),
            }
        }
    }

    /// EnterNotify: reassert focus/border on the already-current client
    /// rather than moving focus to the entered window ("sloppy focus"
    /// discipline).
    fn on_enter_notify(&mut self, event: &xlib::XCrossingEvent) {
        let ws = match self.monitor.workspace_of_window(event.window) {
            Some(ws) => ws,
            None => return,
        };
        if ws != self.monitor.current_workspace {
            return;
        }
        if let Some(current) = self.monitor.workspaces[ws].current {
            if current != event.window {
                if let Some(client) = self.monitor.find_client(current) {
                    client.accent_border(&self.monitor.conn, self.monitor.colour_accent);
                    client.set_input_focus(&self.monitor.conn);
                }
            }
        }
    }

    /// Handles a `ConfigureRequest`.
    fn on_configure_request(&mut self, event: &xlib::XConfigureRequestEvent) {
        match self.monitor.find_client(event.window) {
            Some(client) => {
                // Managed: override with our own commanded geometry.
                self.monitor
                    .conn
                    .configure_window(event.window, client.x, client.y, client.w, client.h, None);
            }
            None => {
                // Unmanaged: grant the request, forcing our border width,
                // and subscribe to EnterWindow so sloppy focus can see it.
                self.monitor.conn.configure_window(
                    event.window,
                    event.x,
                    event.y,
                    event.width.max(0) as u32,
                    event.height.max(0) as u32,
                    Some(self.monitor.borderpx),
                );
                self.monitor.conn.select_enter_events(event.window);
            }
        }
        self.monitor.conn.flush();
    }

    /// Handles a `MapRequest`.
    fn on_map_request(&mut self, event: &xlib::XMapRequestEvent) {
        match self.monitor.find_client(event.window) {
            Some(client) => client.map(&self.monitor.conn),
            None => self.monitor.manage_window(event.window),
        }
    }

    /// Handles an `UnmapNotify`.
    fn on_unmap_notify(&mut self, event: &xlib::XUnmapEvent) {
        if self.monitor.find_client(event.window).is_some() {
            self.monitor.delete_client(event.window);
        }
    }

    /// Accept one connection, read its command, dispatch, flush, close.
    /// Non-blocking accept means a `WouldBlock` here just means the
    /// listener woke us up spuriously.
    fn accept_commands(&mut self) {
        loop {
            let (mut stream, _addr) = match self.listener.accept() {
                Ok(pair) => pair,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return,
                Err(e) => {
                    warn!("command socket accept failed: {}", e);
                    return;
                }
            };

            let mut buf = [0u8; 2];
            let n = match stream.read(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    warn!("command socket read failed: {}", e);
                    continue;
                }
            };

            if let Some(command) = Command::parse(&buf[..n]) {
                command.apply(&mut self.monitor);
            } else {
                warn!("ignoring malformed command: {:?}", &buf[..n]);
            }
            self.monitor.conn.flush();
            // `stream` is dropped here, closing the connection.
        }
    }
}
