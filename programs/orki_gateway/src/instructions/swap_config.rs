use anchor_lang::prelude::*;
use crate::constants::{MERCHANT_SEED, SWAP_CONFIG_SEED};
use crate::events::SwapConfigUpdated;
use crate::state::{Merchant, SwapConfig};

#[derive(Accounts)]
#[instruction(name: String)]
pub struct SetSwapConfig<'info> {
    /// CHECK: Deserialized in the handler so an unregistered merchant
    /// reports `MerchantNotRegistered`.
    #[account(
        seeds = [MERCHANT_SEED, owner.key().as_ref(), name.as_bytes()],
        bump
    )]
    pub merchant: UncheckedAccount<'info>,
    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + SwapConfig::INIT_SPACE,
        seeds = [SWAP_CONFIG_SEED, merchant.key().as_ref()],
        bump
    )]
    pub swap_config: Account<'info, SwapConfig>,
    #[account(mut)]
    pub owner: Signer<'info>,
    pub system_program: Program<'info, System>,
}

pub fn set_swap_config(
    ctx: Context<SetSwapConfig>,
    _name: String,
    adapter: Pubkey,
    enabled: bool,
    slippage_bps: u16,
) -> Result<()> {
    Merchant::owned_by(
        Merchant::try_load(&ctx.accounts.merchant.to_account_info())?,
        &ctx.accounts.owner.key(),
    )?;
    SwapConfig::validate_slippage(slippage_bps)?;

    let config = &mut ctx.accounts.swap_config;
    config.merchant = ctx.accounts.merchant.key();
    config.adapter = adapter;
    config.enabled = enabled;
    config.slippage_bps = slippage_bps;
    config.bump = ctx.bumps.swap_config;

    emit!(SwapConfigUpdated {
        merchant: config.merchant,
        adapter,
        enabled,
        slippage_bps,
    });

    Ok(())
}
