use anchor_lang::prelude::*;
use crate::constants::{MAX_NAME_LEN, MERCHANT_SEED};
use crate::errors::ErrorCode;
use crate::events::MerchantRegistered;
use crate::state::Merchant;

#[derive(Accounts)]
#[instruction(name: String)]
pub struct RegisterMerchant<'info> {
    // A second registration under the same (owner, name) fails here: the
    // PDA is already allocated.
    #[account(
        init,
        payer = owner,
        space = 8 + Merchant::INIT_SPACE,
        seeds = [MERCHANT_SEED, owner.key().as_ref(), name.as_bytes()],
        bump
    )]
    pub merchant: Account<'info, Merchant>,
    #[account(mut)]
    pub owner: Signer<'info>,
    pub system_program: Program<'info, System>,
}

pub fn register_merchant(
    ctx: Context<RegisterMerchant>,
    name: String,
    settlement_wallet: Pubkey,
    settlement_token: Pubkey,
    min_payment: u64,
    max_payment: u64,
) -> Result<()> {
    require!(name.len() <= MAX_NAME_LEN, ErrorCode::NameTooLong);
    Merchant::validate_config(&settlement_wallet, min_payment, max_payment)?;

    let merchant = &mut ctx.accounts.merchant;
    merchant.owner = ctx.accounts.owner.key();
    merchant.settlement_wallet = settlement_wallet;
    merchant.settlement_token = settlement_token;
    merchant.swap_enabled = false;
    merchant.min_payment = min_payment;
    merchant.max_payment = max_payment;
    merchant.accepted_tokens = Vec::new();
    merchant.name = name.clone();
    merchant.bump = ctx.bumps.merchant;

    emit!(MerchantRegistered {
        owner: ctx.accounts.owner.key(),
        merchant: merchant.key(),
        settlement_wallet,
        settlement_token,
        min_payment,
        max_payment,
        name,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
