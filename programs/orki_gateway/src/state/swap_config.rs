use anchor_lang::prelude::*;
use crate::constants::MAX_SLIPPAGE_BPS;
use crate::errors::ErrorCode;
use crate::state::AdapterApproval;

/// Per-merchant swap participation, kept apart from `Merchant` so the
/// adapter choice survives toggling `enabled`.
#[account]
#[derive(InitSpace)]
pub struct SwapConfig {
    pub merchant: Pubkey,
    pub adapter: Pubkey,
    pub enabled: bool,
    pub slippage_bps: u16,
    pub bump: u8,
}

impl SwapConfig {
    pub fn validate_slippage(slippage_bps: u16) -> Result<()> {
        require!(slippage_bps <= MAX_SLIPPAGE_BPS, ErrorCode::InvalidSlippage);
        Ok(())
    }

    /// Returns the adapter to route through. Approval is read from the
    /// approval account supplied with the payment, so a revocation applies
    /// to the very next payment.
    pub fn usable_adapter(&self, approval: Option<&AdapterApproval>) -> Result<Pubkey> {
        require!(self.enabled, ErrorCode::SwapNotAllowed);
        require!(self.adapter != Pubkey::default(), ErrorCode::AdapterNotApproved);

        let approval = approval.ok_or(ErrorCode::AdapterNotApproved)?;
        require!(
            approval.adapter == self.adapter && approval.approved,
            ErrorCode::AdapterNotApproved
        );
        Ok(self.adapter)
    }
}
