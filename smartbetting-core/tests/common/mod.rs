//! Shared helpers for integration tests.

#![allow(dead_code)]

use smartbetting_core::Team;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

/// Captures formatted log output for the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Install a plain-text subscriber that writes into this capture.
    ///
    /// Logs are recorded while the returned guard is alive. Tests must run on
    /// the current-thread runtime (the `#[tokio::test]` default).
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn hawks() -> Team {
    Team::new(1, "East", "Southeast", "Atlanta", "Hawks", "Atlanta Hawks", "ATL")
}

pub fn celtics() -> Team {
    Team::new(2, "East", "Atlantic", "Boston", "Celtics", "Boston Celtics", "BOS")
}
