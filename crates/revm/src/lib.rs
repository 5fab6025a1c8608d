//! Adapts [`reth_storage_api::StateProvider`] into the `revm::Database` trait the interpreter
//! expects, and re-exports the `revm` types the rest of the workspace builds against.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use revm;
pub use revm::db::{BundleState, CacheDB};

mod database;

pub use database::StateProviderDatabase;
