//! Logging infrastructure - structured tracing throughout the heap and VM core
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable level through env or `RuntimeConfig`
//! - Zero-cost when disabled
//! - Console or file output, human-readable or JSON

use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

// Re-export tracing macros for use throughout the crate
pub use tracing::{debug, error, info, trace, warn, Level};

use crate::config::LogSettings;

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

const DEFAULT_LOG_FILE: &str = "mite_core.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Log file path; console output when absent
    pub log_path: Option<String>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // MITE_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level_str) = std::env::var("MITE_LOG_LEVEL") {
            config.level = parse_level(&level_str);
        }

        if let Ok(path) = std::env::var("MITE_LOG_FILE") {
            config.log_path = Some(path);
        }

        config.json_format = std::env::var("MITE_LOG_JSON").is_ok();
        config.show_spans = std::env::var("MITE_LOG_SPANS").is_ok();

        config
    }

    /// Quiet config for embedding: errors only
    pub fn quiet() -> Self {
        Self {
            level: Level::ERROR,
            ..Self::default()
        }
    }
}

impl From<&LogSettings> for LogConfig {
    fn from(settings: &LogSettings) -> Self {
        Self {
            level: parse_level(&settings.level),
            log_path: settings.file.clone(),
            json_format: settings.json,
            show_spans: settings.spans,
        }
    }
}

/// Unknown names fall back to INFO
pub fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize logging with configuration from the environment
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration (first call wins)
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("mite_core={}", config.level.as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = fmt::layer()
            .with_writer(make_writer(config.log_path.as_deref()))
            .with_span_events(span_events)
            .with_target(true)
            .with_line_number(cfg!(debug_assertions));

        // Ignore error if a global subscriber was installed elsewhere
        if config.json_format {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(layer.json())
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(layer)
                .try_init()
                .ok();
        }
    });
}

fn make_writer(log_path: Option<&str>) -> BoxMakeWriter {
    match log_path {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file = path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| DEFAULT_LOG_FILE.into());
            BoxMakeWriter::new(tracing_appender::rolling::never(dir, file))
        }
        None => BoxMakeWriter::new(io::stdout),
    }
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

// ============================================================================
// Heap and collector events
// ============================================================================

/// Log chunk allocation
#[inline]
pub fn log_allocation(kind: &'static str, slot: u32, chunk_bytes: usize) {
    trace!(
        target: "allocator",
        event = "allocation",
        kind,
        slot,
        chunk_bytes,
        "chunk allocated"
    );
}

/// Log explicit chunk release
#[inline]
pub fn log_free(slot: u32, chunk_bytes: usize) {
    trace!(
        target: "allocator",
        event = "free",
        slot,
        chunk_bytes,
        "chunk released"
    );
}

/// Log allocator exhaustion after any collection attempt
pub fn log_out_of_memory(requested: usize, bytes_free: usize) {
    warn!(
        target: "allocator",
        event = "out_of_memory",
        requested,
        bytes_free,
        "heap exhausted"
    );
}

/// Log GC cycle start
pub fn log_gc_start(live_objects: usize) {
    debug!(
        target: "gc",
        event = "gc_start",
        live_objects,
        "starting garbage collection cycle"
    );
}

/// Log GC mark phase
pub fn log_gc_mark(marked: usize) {
    debug!(
        target: "gc",
        event = "gc_mark",
        objects_marked = marked,
        "mark phase complete"
    );
}

/// Log GC sweep phase
pub fn log_gc_sweep(swept: usize, bytes_reclaimed: usize) {
    debug!(
        target: "gc",
        event = "gc_sweep",
        objects_swept = swept,
        bytes_reclaimed,
        "sweep phase complete"
    );
}

/// Log GC cycle completion
pub fn log_gc_complete(duration_us: u64, collected: usize, live: usize) {
    info!(
        target: "gc",
        event = "gc_complete",
        objects_collected = collected,
        live_objects = live,
        duration_us,
        "garbage collection cycle complete"
    );
}

/// Log the root set a cycle starts from
pub fn log_gc_roots(roots: usize, in_flight: usize) {
    debug!(
        target: "gc",
        event = "gc_roots",
        roots,
        in_flight,
        "collecting with objects under construction"
    );
}

/// Log native function dispatch
#[inline]
pub fn log_native_call(index: usize, args: usize) {
    trace!(
        target: "native",
        event = "native_call",
        index,
        args,
        "native function called"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::INFO);
        assert!(config.log_path.is_none());

        let quiet = LogConfig::quiet();
        assert_eq!(quiet.level, Level::ERROR);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("TRACE"), Level::TRACE);
        assert_eq!(parse_level("warning"), Level::WARN);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }

    #[test]
    fn test_from_settings() {
        let settings = LogSettings {
            level: "debug".to_string(),
            file: Some("out/heap.log".to_string()),
            json: true,
            spans: false,
        };
        let config = LogConfig::from(&settings);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.log_path.as_deref(), Some("out/heap.log"));
        assert!(config.json_format);
    }

    #[test]
    fn test_init_idempotent() {
        init_with_config(LogConfig::quiet());
        init_with_config(LogConfig::quiet());
        assert!(is_initialized());
    }

    #[test]
    fn test_event_helpers_do_not_panic() {
        log_allocation("List", 3, 8);
        log_free(3, 8);
        log_out_of_memory(64, 12);
        log_gc_start(10);
        log_gc_mark(7);
        log_gc_sweep(3, 24);
        log_gc_complete(100, 3, 7);
        log_gc_roots(5, 1);
        log_native_call(2, 1);
    }
}
