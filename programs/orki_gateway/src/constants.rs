use anchor_lang::prelude::*;

pub const GLOBAL_STATE_SEED: &[u8] = b"global_state";
pub const MERCHANT_SEED: &[u8] = b"merchant";
pub const SWAP_CONFIG_SEED: &[u8] = b"swap_config";
pub const ADAPTER_SEED: &[u8] = b"adapter";
pub const PAYMENT_SEED: &[u8] = b"payment";

/// Settlement/payment asset value meaning "native SOL".
pub const NATIVE_MINT: Pubkey = Pubkey::new_from_array([0u8; 32]);

pub const BPS_DENOMINATOR: u128 = 10_000;

/// Hard ceiling on the protocol fee (5%).
pub const MAX_FEE_BPS: u16 = 500;

/// Hard ceiling on a merchant's swap slippage tolerance (10%).
pub const MAX_SLIPPAGE_BPS: u16 = 1_000;

/// Upper bound on a merchant's accepted-token list. Keeps every scan over the
/// list inside the compute budget.
pub const MAX_ACCEPTED_TOKENS: usize = 16;

pub const MAX_NAME_LEN: usize = 32;
