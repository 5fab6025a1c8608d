use reth_metrics::{metrics::Counter, Metrics};

/// Telemetry counters updated by the run loop and read back by the stats ticker task, scoped
/// under `engine` (so they surface as `engine_blocks_executed_total` etc.).
#[derive(Metrics)]
#[metrics(scope = "engine")]
pub(crate) struct EngineStats {
    /// Total blocks executed since the engine opened.
    pub(crate) blocks_executed_total: Counter,
    /// Total gas used across every executed block.
    pub(crate) gas_used_total: Counter,
    /// Total backstep recoveries performed.
    pub(crate) backsteps_total: Counter,
    /// Total hardfork activation boundaries crossed.
    pub(crate) hardfork_switches_total: Counter,
    /// Total blocks whose execution exceeded the configured slow-block threshold.
    pub(crate) slow_blocks_total: Counter,
}
