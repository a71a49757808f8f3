//! Runtime configuration - heap sizing and logging, loaded from TOML

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::allocator::MIN_CHUNK_SIZE;
use crate::error::{Error, PmResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub heap: HeapConfig,

    #[serde(default)]
    pub logging: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapConfig {
    /// Total chunk budget of the arena in bytes
    #[serde(default = "default_arena_bytes")]
    pub arena_bytes: usize,

    /// Largest chunk a single allocation may request
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,

    /// Run a collection before reporting exhaustion
    #[serde(default = "default_true")]
    pub collect_on_exhaustion: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub spans: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            arena_bytes: default_arena_bytes(),
            max_chunk_bytes: default_max_chunk_bytes(),
            collect_on_exhaustion: true,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            json: false,
            spans: false,
        }
    }
}

fn default_arena_bytes() -> usize { 8 * 1024 }
fn default_max_chunk_bytes() -> usize { 512 }
fn default_true() -> bool { true }
fn default_level() -> String { "info".to_string() }

impl HeapConfig {
    /// Heap of the given arena size, other settings at their defaults
    pub fn with_arena_bytes(arena_bytes: usize) -> Self {
        Self {
            arena_bytes,
            max_chunk_bytes: default_max_chunk_bytes().min(arena_bytes),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PmResult<()> {
        if self.arena_bytes == 0 {
            return Err(Error::value_error("arena_bytes must be non-zero"));
        }
        if self.max_chunk_bytes < MIN_CHUNK_SIZE {
            return Err(Error::value_error("max_chunk_bytes is below the minimum chunk size"));
        }
        if self.max_chunk_bytes > self.arena_bytes {
            return Err(Error::value_error("max_chunk_bytes exceeds arena_bytes"));
        }
        Ok(())
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> PmResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io_error(format!("failed to read config: {}", e)))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> PmResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::value_error(format!("failed to parse config: {}", e)))?;
        config.heap.validate()?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> PmResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::value_error(format!("failed to serialize config: {}", e)))
    }
}
