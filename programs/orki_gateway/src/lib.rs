use anchor_lang::prelude::*;

pub mod adapter;
pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

#[cfg(test)]
mod test_utils;

use instructions::*;

declare_id!("C9k2E4oE3SWB7wuCm5YwaLeYJg5DCqxBXFUDoDpzdDp9");

#[program]
pub mod orki_gateway {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        fee_bps: u16,
        fee_wallet: Pubkey
    ) -> Result<()> {
        instructions::initialize(ctx, fee_bps, fee_wallet)
    }

    pub fn register_merchant(
        ctx: Context<RegisterMerchant>,
        name: String,
        settlement_wallet: Pubkey,
        settlement_token: Pubkey,
        min_payment: u64,
        max_payment: u64,
    ) -> Result<()> {
        instructions::register_merchant(
            ctx,
            name,
            settlement_wallet,
            settlement_token,
            min_payment,
            max_payment,
        )
    }

    pub fn update_merchant(
        ctx: Context<UpdateMerchant>,
        name: String,
        settlement_wallet: Pubkey,
        settlement_token: Pubkey,
        swap_enabled: bool,
        min_payment: u64,
        max_payment: u64,
    ) -> Result<()> {
        instructions::update_merchant(
            ctx,
            name,
            settlement_wallet,
            settlement_token,
            swap_enabled,
            min_payment,
            max_payment,
        )
    }

    pub fn set_allowed_token(
        ctx: Context<UpdateMerchant>,
        name: String,
        token: Pubkey,
        allowed: bool,
    ) -> Result<()> {
        instructions::set_allowed_token(ctx, name, token, allowed)
    }

    pub fn get_supported_tokens(
        ctx: Context<ViewMerchant>,
        owner: Pubkey,
        name: String,
    ) -> Result<Vec<Pubkey>> {
        instructions::get_supported_tokens(ctx, owner, name)
    }

    pub fn set_swap_config(
        ctx: Context<SetSwapConfig>,
        name: String,
        adapter: Pubkey,
        enabled: bool,
        slippage_bps: u16,
    ) -> Result<()> {
        instructions::set_swap_config(ctx, name, adapter, enabled, slippage_bps)
    }

    pub fn set_fee(ctx: Context<AdminAuth>, new_fee_bps: u16) -> Result<()> {
        instructions::set_fee(ctx, new_fee_bps)
    }

    pub fn set_fee_wallet(ctx: Context<AdminAuth>, new_fee_wallet: Pubkey) -> Result<()> {
        instructions::set_fee_wallet(ctx, new_fee_wallet)
    }

    pub fn set_approved_adapter(
        ctx: Context<SetApprovedAdapter>,
        adapter: Pubkey,
        approved: bool,
    ) -> Result<()> {
        instructions::set_approved_adapter(ctx, adapter, approved)
    }

    pub fn pause(ctx: Context<AdminAuth>) -> Result<()> {
        instructions::set_paused(ctx, true)
    }

    pub fn unpause(ctx: Context<AdminAuth>) -> Result<()> {
        instructions::set_paused(ctx, false)
    }

    pub fn propose_admin(ctx: Context<AdminAuth>, new_admin: Pubkey) -> Result<()> {
        instructions::propose_admin(ctx, new_admin)
    }

    pub fn accept_admin(ctx: Context<AcceptAdmin>) -> Result<()> {
        instructions::accept_admin(ctx)
    }

    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
        instructions::emergency_withdraw(ctx, amount)
    }

    pub fn process_payment<'info>(
        ctx: Context<'_, '_, 'info, 'info, ProcessPayment<'info>>,
        merchant_owner: Pubkey,
        name: String,
        token: Pubkey,
        amount: u64,
        payment_id: u64,
    ) -> Result<()> {
        instructions::process_payment(ctx, merchant_owner, name, token, amount, payment_id)
    }
}
