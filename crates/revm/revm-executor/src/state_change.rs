use alloy_primitives::{Address, B256, U256};
use reth_chainspec::{ChainSpec, Hardfork};
use reth_execution_errors::BlockValidationError;
use reth_primitives::{Header, Withdrawal};
use revm::{
    primitives::{Bytes, TransactTo},
    Database, DatabaseCommit, Evm,
};
use std::collections::HashMap;

/// EIP-4788 system contract address.
const BEACON_ROOTS_ADDRESS: Address = Address::new([
    0x00, 0x0F, 0x3d, 0xf6, 0xD7, 0x32, 0x80, 0x7E, 0xf1, 0x31, 0x9f, 0xb7, 0xB8, 0xbB, 0x85, 0x29,
    0x89, 0xf2, 0x20, 0x51,
]);

/// Calls the EIP-4788 beacon-root contract as a system transaction, before any user transactions
/// run. A no-op before Cancun activates or on the genesis block.
pub fn apply_beacon_root_contract_call<DB>(
    chain_spec: &ChainSpec,
    header: &Header,
    parent_beacon_block_root: Option<B256>,
    evm: &mut Evm<'_, (), DB>,
) -> Result<(), BlockValidationError>
where
    DB: Database,
    DB::Error: std::fmt::Display,
{
    if !chain_spec.is_active_at_or_after(
        Hardfork::Cancun,
        header.number,
        U256::ZERO,
        header.timestamp,
    ) {
        return Ok(());
    }
    if header.number == 0 {
        return Ok(());
    }

    let Some(root) = parent_beacon_block_root else {
        return Err(BlockValidationError::MissingParentBeaconBlockRoot);
    };

    let tx = &mut evm.context.evm.env.tx;
    tx.caller = Address::ZERO;
    tx.transact_to = TransactTo::Call(BEACON_ROOTS_ADDRESS);
    tx.data = Bytes::copy_from_slice(root.as_slice());
    tx.value = U256::ZERO;
    tx.gas_limit = 30_000_000;
    tx.gas_price = U256::ZERO;
    tx.nonce = None;

    let result = evm.transact().map_err(|error| BlockValidationError::BeaconRootContractCall {
        parent_beacon_block_root: root,
        message: error.to_string(),
    })?;
    evm.context.evm.db.commit(result.state);
    Ok(())
}

/// Computes the ether balance increments owed at the end of a block: the block reward to the
/// beneficiary (pre-Merge), ommer rewards, and validator withdrawals (post-Shanghai).
pub fn post_block_balance_increments(
    chain_spec: &ChainSpec,
    header: &Header,
    ommers: &[Header],
    withdrawals: Option<&[Withdrawal]>,
) -> HashMap<Address, u128> {
    let mut increments = HashMap::new();

    if !chain_spec.is_active_at_or_after(Hardfork::Paris, header.number, U256::MAX, header.timestamp)
    {
        let block_reward: u128 = 2_000_000_000_000_000_000;
        let mut beneficiary_reward = block_reward;
        for ommer in ommers {
            let ommer_reward = block_reward * (8 + ommer.number - header.number) as u128 / 8;
            *increments.entry(ommer.beneficiary).or_default() += ommer_reward;
            beneficiary_reward += block_reward / 32;
        }
        *increments.entry(header.beneficiary).or_default() += beneficiary_reward;
    }

    if let Some(withdrawals) = withdrawals {
        for withdrawal in withdrawals {
            if withdrawal.amount > 0 {
                *increments.entry(withdrawal.address).or_default() +=
                    withdrawal.amount as u128 * 1_000_000_000;
            }
        }
    }

    increments
}

/// Beneficiary of the Ethereum DAO hardfork's irregular balance-drain state change.
///
/// Kept as a documented constant rather than applied unconditionally: the reference store in
/// this workspace only ever starts from a post-fork genesis, so there is nothing to drain in
/// practice, but the hook point is where a full mainnet replay would apply it (see
/// `EvmBlockExecutor::apply_post_execution_state_change`).
pub const DAO_HARDFORK_BENEFICIARY: Address = Address::new([
    0xbf, 0x4e, 0xd7, 0x36, 0x65, 0xc6, 0xbf, 0x1a, 0x23, 0x55, 0x93, 0x49, 0x65, 0x1b, 0x4e, 0xf8,
    0x0e, 0x12, 0x27, 0xd3,
]);
