//! Desktop platform over the process's standard streams

use std::io::{self, Read, Write};
use std::time::Instant;

use super::Platform;
use crate::error::{Error, ErrorKind, PmResult};
use crate::logging::{error, info};

pub struct HostPlatform {
    started: Instant,
}

impl HostPlatform {
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HostPlatform {
    fn init(&mut self) -> PmResult<()> {
        self.started = Instant::now();
        info!(target: "plat", "host platform initialized");
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> PmResult<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(&[byte])
            .and_then(|_| stdout.flush())
            .map_err(|e| Error::io_error(format!("failed to send byte: {}", e)))
    }

    fn receive_byte(&mut self) -> PmResult<u8> {
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(Error::io_error("end of input")),
            Err(e) => Err(Error::io_error(format!("failed to receive byte: {}", e))),
        }
    }

    fn tick_count(&self) -> u32 {
        self.started.elapsed().as_millis() as u32
    }

    fn report_error(&mut self, kind: ErrorKind) {
        error!(target: "plat", code = kind.code(), kind = kind.name(), "error reported");
    }
}
