//! Protocol constants.

use alloy_primitives::Address;

/// Asset sentinel for the chain's native currency.
pub const NATIVE: Address = Address::ZERO;

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Protocol fee ceiling (5%).
pub const MAX_FEE_BPS: u16 = 500;

/// Merchant slippage tolerance ceiling (10%).
pub const MAX_SLIPPAGE_BPS: u16 = 1_000;

/// Bound on a merchant's accepted-token list, so nothing iterating it can
/// be pushed past the execution budget.
pub const MAX_ACCEPTED_TOKENS: usize = 32;
