use anchor_lang::prelude::*;
use crate::constants::MERCHANT_SEED;
use crate::events::TokenAllowed;
use crate::instructions::UpdateMerchant;
use crate::state::Merchant;

#[derive(Accounts)]
#[instruction(owner: Pubkey, name: String)]
pub struct ViewMerchant<'info> {
    #[account(
        seeds = [MERCHANT_SEED, owner.as_ref(), name.as_bytes()],
        bump = merchant.bump
    )]
    pub merchant: Account<'info, Merchant>,
}

pub fn set_allowed_token(
    ctx: Context<UpdateMerchant>,
    _name: String,
    token: Pubkey,
    allowed: bool,
) -> Result<()> {
    let mut merchant = ctx.accounts.load()?;
    merchant.set_token_allowed(token, allowed)?;
    ctx.accounts.store(&merchant)?;

    emit!(TokenAllowed {
        merchant: ctx.accounts.merchant.key(),
        token,
        allowed,
    });

    Ok(())
}

/// Snapshot of the accepted-token list; order shifts after removals.
pub fn get_supported_tokens(
    ctx: Context<ViewMerchant>,
    _owner: Pubkey,
    _name: String,
) -> Result<Vec<Pubkey>> {
    Ok(ctx.accounts.merchant.accepted_tokens.clone())
}
