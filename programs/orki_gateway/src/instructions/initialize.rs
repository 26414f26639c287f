use anchor_lang::prelude::*;
use crate::constants::GLOBAL_STATE_SEED;
use crate::errors::ErrorCode;
use crate::events::GlobalStateInitialized;
use crate::state::{validate_fee_bps, GlobalState};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + GlobalState::INIT_SPACE,
        seeds = [GLOBAL_STATE_SEED],
        bump
    )]
    pub global_state: Account<'info, GlobalState>,
    #[account(mut)]
    pub admin: Signer<'info>,
    pub system_program: Program<'info, System>,
}

pub fn initialize(
    ctx: Context<Initialize>,
    fee_bps: u16,
    fee_wallet: Pubkey
) -> Result<()> {
    validate_fee_bps(fee_bps)?;
    require!(fee_wallet != Pubkey::default(), ErrorCode::InvalidFeeWallet);

    let state = &mut ctx.accounts.global_state;
    state.admin = ctx.accounts.admin.key();
    state.pending_admin = None;
    state.fee_bps = fee_bps;
    state.fee_wallet = fee_wallet;
    state.paused = false;
    state.bump = ctx.bumps.global_state;

    emit!(GlobalStateInitialized {
        admin: ctx.accounts.admin.key(),
        fee_bps,
        fee_wallet,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
