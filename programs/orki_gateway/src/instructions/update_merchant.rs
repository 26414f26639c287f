use anchor_lang::prelude::*;
use crate::constants::MERCHANT_SEED;
use crate::events::MerchantUpdated;
use crate::state::Merchant;

#[derive(Accounts)]
#[instruction(name: String)]
pub struct UpdateMerchant<'info> {
    /// CHECK: Deserialized in the handler so an unregistered merchant
    /// reports `MerchantNotRegistered`.
    #[account(
        mut,
        seeds = [MERCHANT_SEED, owner.key().as_ref(), name.as_bytes()],
        bump
    )]
    pub merchant: UncheckedAccount<'info>,
    pub owner: Signer<'info>,
}

impl<'info> UpdateMerchant<'info> {
    pub fn load(&self) -> Result<Merchant> {
        Merchant::owned_by(
            Merchant::try_load(&self.merchant.to_account_info())?,
            &self.owner.key(),
        )
    }

    pub fn store(&self, merchant: &Merchant) -> Result<()> {
        merchant.store(&self.merchant.to_account_info())
    }
}

/// Overwrites every mutable field; the accepted-token list is left alone.
pub fn update_merchant(
    ctx: Context<UpdateMerchant>,
    _name: String,
    settlement_wallet: Pubkey,
    settlement_token: Pubkey,
    swap_enabled: bool,
    min_payment: u64,
    max_payment: u64,
) -> Result<()> {
    let mut merchant = ctx.accounts.load()?;
    Merchant::validate_config(&settlement_wallet, min_payment, max_payment)?;

    merchant.settlement_wallet = settlement_wallet;
    merchant.settlement_token = settlement_token;
    merchant.swap_enabled = swap_enabled;
    merchant.min_payment = min_payment;
    merchant.max_payment = max_payment;
    ctx.accounts.store(&merchant)?;

    emit!(MerchantUpdated {
        owner: ctx.accounts.owner.key(),
        merchant: ctx.accounts.merchant.key(),
        settlement_wallet,
        settlement_token,
        swap_enabled,
        min_payment,
        max_payment,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
