use anchor_lang::prelude::*;

/// Admin-controlled approval flag for one swap adapter program.
#[account]
#[derive(InitSpace)]
pub struct AdapterApproval {
    pub adapter: Pubkey,
    pub approved: bool,
    pub bump: u8,
}
