// src/idle/x11.rs

//! Idle time from the X11 MIT-SCREEN-SAVER extension.

use tracing::debug;
use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::screensaver::{self, ConnectionExt as _};
use x11rb::protocol::xproto::Window;
use x11rb::rust_connection::RustConnection;

use super::{IdleSample, IdleSource};
use crate::errors::{IdlemonError, Result};

pub struct X11IdleSource {
    conn: RustConnection,
    root: Window,
}

impl X11IdleSource {
    /// Connect to `$DISPLAY` and check that the screensaver extension is
    /// available.
    pub fn connect() -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| IdlemonError::IdleSource(format!("failed to open display: {e}")))?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| IdlemonError::IdleSource(format!("no screen {screen_num}")))?;

        let present = conn
            .extension_information(screensaver::X11_EXTENSION_NAME)
            .map_err(|e| IdlemonError::IdleSource(format!("extension query failed: {e}")))?
            .is_some();
        if !present {
            return Err(IdlemonError::IdleSource(
                "screensaver extension not enabled".to_string(),
            ));
        }

        debug!(screen = screen_num, "connected to X11 screensaver extension");
        Ok(Self { conn, root })
    }
}

impl IdleSource for X11IdleSource {
    fn query(&mut self) -> Result<IdleSample> {
        let info = self
            .conn
            .screensaver_query_info(self.root)
            .map_err(|e| IdlemonError::IdleSource(format!("query failed: {e}")))?
            .reply()
            .map_err(|e| IdlemonError::IdleSource(format!("query failed: {e}")))?;

        Ok(IdleSample {
            idle_ms: u64::from(info.ms_since_user_input),
            active: info.state == u8::from(screensaver::State::ON),
        })
    }
}
