//! Audit events appended to the gateway's log for off-chain indexers.

use alloy_primitives::{Address, U256};
use serde::Serialize;

/// One state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    /// A merchant record was created.
    MerchantRegistered {
        owner: Address,
        wallet: Address,
        settlement_token: Address,
        min_payment: U256,
        max_payment: U256,
    },
    /// A merchant record was overwritten.
    MerchantUpdated {
        owner: Address,
        wallet: Address,
        settlement_token: Address,
        swap_enabled: bool,
        min_payment: U256,
        max_payment: U256,
    },
    /// Whitelist toggle, emitted even when it changed nothing.
    TokenAllowed {
        owner: Address,
        token: Address,
        allowed: bool,
    },
    /// Merchant swap participation changed.
    SwapConfigUpdated {
        owner: Address,
        adapter: Address,
        enabled: bool,
        slippage_bps: u16,
    },
    /// A payment settled.
    PaymentProcessed {
        payer: Address,
        merchant: Address,
        amount: U256,
        fee: U256,
        token: Address,
        swapped: bool,
    },
    /// Protocol fee changed.
    FeeUpdated { old_fee_bps: u16, new_fee_bps: u16 },
    /// Adapter approval changed.
    AdapterStatusUpdated { adapter: Address, approved: bool },
    /// Payments suspended.
    Paused { admin: Address },
    /// Payments resumed.
    Unpaused { admin: Address },
    /// Admin handover started.
    AdminTransferProposed { admin: Address, pending_admin: Address },
    /// Admin handover completed.
    AdminUpdated { old_admin: Address, new_admin: Address },
    /// Break-glass withdrawal from the gateway's own balance.
    EmergencyWithdrawal {
        admin: Address,
        asset: Address,
        amount: U256,
    },
}
