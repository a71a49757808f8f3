//! In-memory loopback platform
//!
//! The VM side (`MemoryPlatform`) and the device side (`MemoryPort`) share
//! buffers behind a mutex, standing in for a UART and its peer.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::ticks::TickCounter;
use super::Platform;
use crate::error::{Error, ErrorKind, PmResult};
use crate::logging::warn;

#[derive(Debug)]
enum Incoming {
    Byte(u8),
    FramingError,
}

#[derive(Debug, Default)]
struct Shared {
    rx: VecDeque<Incoming>,
    tx: Vec<u8>,
    errors: Vec<ErrorKind>,
    initialized: bool,
}

pub struct MemoryPlatform {
    shared: Arc<Mutex<Shared>>,
    ticks: Arc<TickCounter>,
}

/// Peer handle used to feed and inspect a `MemoryPlatform`
#[derive(Clone)]
pub struct MemoryPort {
    shared: Arc<Mutex<Shared>>,
    ticks: Arc<TickCounter>,
}

impl MemoryPlatform {
    /// Platform plus the port that drives it
    pub fn new() -> (Self, MemoryPort) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let ticks = Arc::new(TickCounter::new());
        let port = MemoryPort {
            shared: Arc::clone(&shared),
            ticks: Arc::clone(&ticks),
        };
        (Self { shared, ticks }, port)
    }
}

impl MemoryPort {
    pub fn feed(&self, bytes: &[u8]) {
        self.shared.lock().rx.extend(bytes.iter().map(|&b| Incoming::Byte(b)));
    }

    /// Queue a receive fault after any bytes already fed
    pub fn inject_framing_error(&self) {
        self.shared.lock().rx.push_back(Incoming::FramingError);
    }

    /// Bytes sent by the platform so far, draining them
    pub fn take_sent(&self) -> Vec<u8> {
        std::mem::take(&mut self.shared.lock().tx)
    }

    pub fn reported_errors(&self) -> Vec<ErrorKind> {
        self.shared.lock().errors.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.shared.lock().initialized
    }

    /// Simulated timer interrupt
    pub fn advance(&self, usec: u32) {
        self.ticks.periodic(usec);
    }
}

impl Platform for MemoryPlatform {
    fn init(&mut self) -> PmResult<()> {
        self.shared.lock().initialized = true;
        Ok(())
    }

    fn send_byte(&mut self, byte: u8) -> PmResult<()> {
        self.shared.lock().tx.push(byte);
        Ok(())
    }

    fn receive_byte(&mut self) -> PmResult<u8> {
        match self.shared.lock().rx.pop_front() {
            Some(Incoming::Byte(b)) => Ok(b),
            Some(Incoming::FramingError) => Err(Error::io_error("framing error")),
            None => Err(Error::io_error("receive buffer empty")),
        }
    }

    fn tick_count(&self) -> u32 {
        self.ticks.read_ms()
    }

    fn report_error(&mut self, kind: ErrorKind) {
        warn!(target: "plat", code = kind.code(), "error reported to loopback platform");
        self.shared.lock().errors.push(kind);
    }
}
