//! On-disk configuration for the execution gate, loaded from a TOML file's `[engine]` table.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Top-level config file shape. Only the `[engine]` table is read by this crate; unknown
/// top-level tables are ignored rather than rejected, so this file can be shared with other
/// node components that define their own sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Execution-gate tuning parameters.
    pub engine: EngineConfig,
}

/// Tuning parameters for the execution gate's run loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Maximum number of blocks the run loop executes before yielding back to the scheduler,
    /// re-checking for shutdown, and logging a stats snapshot.
    pub num_blocks_per_iteration: u64,
    /// A single block taking longer than this to execute is logged as a slow-block warning and
    /// counted in telemetry, but does not stop the run loop.
    #[serde(with = "humantime_serde")]
    pub max_tolerated_block_time: Duration,
    /// How often the stats ticker logs and updates gauges.
    #[serde(with = "humantime_serde")]
    pub stats_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_blocks_per_iteration: 1_000,
            max_tolerated_block_time: Duration::from_secs(12),
            stats_interval: Duration::from_secs(20),
        }
    }
}

impl Config {
    /// Reads and parses a config file from `path`.
    pub fn from_path(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.num_blocks_per_iteration, 1_000);
        assert_eq!(config.max_tolerated_block_time, Duration::from_secs(12));
        assert_eq!(config.stats_interval, Duration::from_secs(20));
    }

    #[test]
    fn parses_partial_engine_table() {
        let config: Config = toml::from_str(
            r#"
            [engine]
            numBlocksPerIteration = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.num_blocks_per_iteration, 4);
        assert_eq!(config.engine.stats_interval, Duration::from_secs(20));
    }

    #[test]
    fn loads_from_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reth.toml");
        std::fs::write(&path, "[engine]\nnumBlocksPerIteration = 7\n").unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(config.engine.num_blocks_per_iteration, 7);
    }
}
