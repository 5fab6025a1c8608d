//! Types describing the inputs and outputs of a single block execution.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod execute;

pub use execute::{BlockExecutionInput, BlockExecutionOutput};
