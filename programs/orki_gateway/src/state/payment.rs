use anchor_lang::prelude::*;

/// Receipt for one processed payment. The PDA is seeded by
/// `(payer, payment_id)`, so its existence doubles as the replay guard.
#[account]
#[derive(InitSpace)]
pub struct Payment {
    pub payer: Pubkey,
    pub merchant: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub token: Pubkey,
    pub swapped: bool,
    pub payment_id: u64,
    pub timestamp: i64,
    pub bump: u8,
}
