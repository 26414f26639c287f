use anchor_lang::prelude::*;

#[event]
pub struct PaymentProcessed {
    pub payer: Pubkey,
    pub merchant: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub token: Pubkey,
    pub swapped: bool,
    pub payment_id: u64,
    pub timestamp: i64,
}

#[event]
pub struct MerchantRegistered {
    pub owner: Pubkey,
    pub merchant: Pubkey,
    pub settlement_wallet: Pubkey,
    pub settlement_token: Pubkey,
    pub min_payment: u64,
    pub max_payment: u64,
    pub name: String,
    pub timestamp: i64,
}

#[event]
pub struct MerchantUpdated {
    pub owner: Pubkey,
    pub merchant: Pubkey,
    pub settlement_wallet: Pubkey,
    pub settlement_token: Pubkey,
    pub swap_enabled: bool,
    pub min_payment: u64,
    pub max_payment: u64,
    pub timestamp: i64,
}

#[event]
pub struct TokenAllowed {
    pub merchant: Pubkey,
    pub token: Pubkey,
    pub allowed: bool,
}

#[event]
pub struct SwapConfigUpdated {
    pub merchant: Pubkey,
    pub adapter: Pubkey,
    pub enabled: bool,
    pub slippage_bps: u16,
}

#[event]
pub struct FeeUpdated {
    pub admin: Pubkey,
    pub old_fee_bps: u16,
    pub new_fee_bps: u16,
    pub timestamp: i64,
}

#[event]
pub struct FeeWalletUpdated {
    pub admin: Pubkey,
    pub old_fee_wallet: Pubkey,
    pub new_fee_wallet: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct AdapterStatusUpdated {
    pub adapter: Pubkey,
    pub approved: bool,
}

#[event]
pub struct PausedStatusUpdated {
    pub admin: Pubkey,
    pub paused: bool,
    pub timestamp: i64,
}

#[event]
pub struct AdminTransferProposed {
    pub admin: Pubkey,
    pub pending_admin: Pubkey,
}

#[event]
pub struct AdminUpdated {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct EmergencyWithdrawal {
    pub admin: Pubkey,
    pub token: Pubkey,
    pub amount: u64,
}

#[event]
pub struct GlobalStateInitialized {
    pub admin: Pubkey,
    pub fee_bps: u16,
    pub fee_wallet: Pubkey,
    pub timestamp: i64,
}
