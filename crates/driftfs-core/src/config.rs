//! Transfer configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::COPY_CHUNK_SIZE;

/// Configuration for planning and running transfers.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct TransferConfig {
    /// Stat each file during planning so task sizes reflect byte
    /// counts. Leave off for cheap plans meant for immediate
    /// execution.
    #[builder(default = "false")]
    #[serde(default)]
    pub measure_size: bool,

    /// Bytes streamed per copy chunk; cancellation is polled at this
    /// granularity.
    #[builder(default = "COPY_CHUNK_SIZE")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Copy timestamps and permissions onto copied entries.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub preserve_attrs: bool,
}

fn default_chunk_size() -> usize {
    COPY_CHUNK_SIZE
}

fn default_true() -> bool {
    true
}

impl TransferConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == Some(0) {
            return Err("chunk_size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            measure_size: false,
            chunk_size: COPY_CHUNK_SIZE,
            preserve_attrs: true,
        }
    }
}

impl TransferConfig {
    /// Create a config builder.
    pub fn builder() -> TransferConfigBuilder {
        TransferConfigBuilder::default()
    }

    /// Config for pre-flight plans with accurate totals, as a
    /// progress bar needs.
    pub fn measured() -> Self {
        Self {
            measure_size: true,
            ..Self::default()
        }
    }
}
