pub use alloy_eips::eip4895::Withdrawal;
use derive_more::{Deref, DerefMut, From, IntoIterator};
use serde::{Deserialize, Serialize};

/// A list of validator withdrawals included in a post-Shanghai block body.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, From, Deref, DerefMut, IntoIterator, Serialize, Deserialize,
)]
pub struct Withdrawals(Vec<Withdrawal>);

impl Withdrawals {
    /// Wraps a vec of withdrawals.
    pub const fn new(withdrawals: Vec<Withdrawal>) -> Self {
        Self(withdrawals)
    }

    /// Returns the inner vec.
    pub fn into_inner(self) -> Vec<Withdrawal> {
        self.0
    }
}
