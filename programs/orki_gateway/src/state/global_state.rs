use anchor_lang::prelude::*;
use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS};
use crate::errors::ErrorCode;

#[account]
#[derive(InitSpace, Debug)]
pub struct GlobalState {
    pub admin: Pubkey,
    /// Successor proposed by the admin; control moves only once it signs `accept_admin`.
    pub pending_admin: Option<Pubkey>,
    pub fee_bps: u16,
    pub fee_wallet: Pubkey,
    pub paused: bool,
    pub bump: u8,
}

/// A payment amount divided between the fee wallet and the merchant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: u64,
    pub merchant_amount: u64,
}

impl GlobalState {
    pub fn fee_split(&self, amount: u64) -> Result<FeeSplit> {
        split_fee(amount, self.fee_bps)
    }

    /// The wallet a SOL fee is paid into must be the configured one.
    pub fn check_fee_wallet(&self, supplied: &Pubkey) -> Result<()> {
        require_keys_eq!(*supplied, self.fee_wallet, ErrorCode::InvalidFeeWallet);
        Ok(())
    }
}

pub fn validate_fee_bps(fee_bps: u16) -> Result<()> {
    require!(fee_bps <= MAX_FEE_BPS, ErrorCode::InvalidAmount);
    Ok(())
}

/// `fee = floor(amount * fee_bps / 10_000)`, computed in u128 so large
/// amounts cannot overflow.
pub fn split_fee(amount: u64, fee_bps: u16) -> Result<FeeSplit> {
    let fee = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(ErrorCode::CalculationError)?
        .checked_div(BPS_DENOMINATOR)
        .ok_or(ErrorCode::CalculationError)?;
    let fee = u64::try_from(fee).map_err(|_| ErrorCode::CalculationError)?;

    let merchant_amount = amount
        .checked_sub(fee)
        .ok_or(ErrorCode::CalculationError)?;

    Ok(FeeSplit { fee, merchant_amount })
}
