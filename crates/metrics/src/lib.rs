//! Shared metrics plumbing: re-exports of the `metrics` facade and its `#[derive(Metrics)]`
//! macro, plus a small helper for metering streams.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use metrics_derive::Metrics;

/// Re-export of the `metrics` facade crate's recording primitives, so downstream crates only
/// need to depend on `reth-metrics`.
pub mod metrics {
    pub use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Counter, Gauge, Histogram};
}

#[cfg(feature = "common")]
mod stream;

#[cfg(feature = "common")]
pub use stream::MeteredStreamExt;
