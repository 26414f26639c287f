use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use crate::constants::{ADAPTER_SEED, GLOBAL_STATE_SEED, NATIVE_MINT};
use crate::errors::ErrorCode;
use crate::events::*;
use crate::state::{validate_fee_bps, AdapterApproval, GlobalState};

#[derive(Accounts)]
pub struct AdminAuth<'info> {
    #[account(
        mut,
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump,
        constraint = global_state.admin == admin.key() @ ErrorCode::Unauthorized
    )]
    pub global_state: Account<'info, GlobalState>,
    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct AcceptAdmin<'info> {
    #[account(
        mut,
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump,
        constraint = global_state.pending_admin == Some(new_admin.key()) @ ErrorCode::NotPendingAdmin
    )]
    pub global_state: Account<'info, GlobalState>,
    pub new_admin: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(adapter: Pubkey)]
pub struct SetApprovedAdapter<'info> {
    #[account(
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump,
        constraint = global_state.admin == admin.key() @ ErrorCode::Unauthorized
    )]
    pub global_state: Account<'info, GlobalState>,
    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + AdapterApproval::INIT_SPACE,
        seeds = [ADAPTER_SEED, adapter.as_ref()],
        bump
    )]
    pub adapter_approval: Account<'info, AdapterApproval>,
    #[account(mut)]
    pub admin: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    #[account(
        mut,
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump,
        constraint = global_state.admin == admin.key() @ ErrorCode::Unauthorized
    )]
    pub global_state: Account<'info, GlobalState>,
    #[account(mut)]
    pub admin: Signer<'info>,

    // --- Optional Accounts for SPL ---
    pub token_program: Option<Program<'info, Token>>,
    #[account(mut)]
    pub vault_token_account: Option<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub admin_token_account: Option<Account<'info, TokenAccount>>,
}

pub fn set_fee(ctx: Context<AdminAuth>, new_fee_bps: u16) -> Result<()> {
    validate_fee_bps(new_fee_bps)?;
    let state = &mut ctx.accounts.global_state;

    let old_fee_bps = state.fee_bps;
    state.fee_bps = new_fee_bps;

    emit!(FeeUpdated {
        admin: ctx.accounts.admin.key(),
        old_fee_bps,
        new_fee_bps,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn set_fee_wallet(ctx: Context<AdminAuth>, new_fee_wallet: Pubkey) -> Result<()> {
    require!(new_fee_wallet != Pubkey::default(), ErrorCode::InvalidFeeWallet);
    let state = &mut ctx.accounts.global_state;

    let old_fee_wallet = state.fee_wallet;
    state.fee_wallet = new_fee_wallet;

    emit!(FeeWalletUpdated {
        admin: ctx.accounts.admin.key(),
        old_fee_wallet,
        new_fee_wallet,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn set_paused(ctx: Context<AdminAuth>, paused: bool) -> Result<()> {
    let state = &mut ctx.accounts.global_state;
    state.paused = paused;

    emit!(PausedStatusUpdated {
        admin: ctx.accounts.admin.key(),
        paused,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

pub fn set_approved_adapter(
    ctx: Context<SetApprovedAdapter>,
    adapter: Pubkey,
    approved: bool,
) -> Result<()> {
    // The gateway may not route swaps through itself.
    require!(
        adapter != Pubkey::default() && adapter != crate::ID,
        ErrorCode::InvalidAdapter
    );

    let approval = &mut ctx.accounts.adapter_approval;
    approval.adapter = adapter;
    approval.approved = approved;
    approval.bump = ctx.bumps.adapter_approval;

    emit!(AdapterStatusUpdated { adapter, approved });

    Ok(())
}

/// First half of the admin handover. Proposing again replaces the
/// previous candidate.
pub fn propose_admin(ctx: Context<AdminAuth>, new_admin: Pubkey) -> Result<()> {
    require!(new_admin != Pubkey::default(), ErrorCode::InvalidAdmin);
    let state = &mut ctx.accounts.global_state;
    state.pending_admin = Some(new_admin);

    emit!(AdminTransferProposed {
        admin: ctx.accounts.admin.key(),
        pending_admin: new_admin,
    });

    Ok(())
}

pub fn accept_admin(ctx: Context<AcceptAdmin>) -> Result<()> {
    let state = &mut ctx.accounts.global_state;

    let old_admin = state.admin;
    state.admin = ctx.accounts.new_admin.key();
    state.pending_admin = None;

    emit!(AdminUpdated {
        old_admin,
        new_admin: state.admin,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}

/// Break-glass recovery of SOL or SPL tokens stranded on the global state
/// PDA. Lamports below the rent-exempt floor stay put.
pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::ZeroAmount);

    let token = if let Some(token_program) = ctx.accounts.token_program.as_ref() {
        let vault_ta = ctx.accounts.vault_token_account.as_ref().ok_or(ErrorCode::MissingAccount)?;
        let admin_ta = ctx.accounts.admin_token_account.as_ref().ok_or(ErrorCode::MissingAccount)?;

        require_keys_eq!(vault_ta.owner, ctx.accounts.global_state.key(), ErrorCode::InvalidTokenAccount);
        require_keys_eq!(admin_ta.mint, vault_ta.mint, ErrorCode::InvalidTokenAccount);
        require!(vault_ta.amount >= amount, ErrorCode::InsufficientBalance);

        let bump = [ctx.accounts.global_state.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[GLOBAL_STATE_SEED, &bump]];
        token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                Transfer {
                    from: vault_ta.to_account_info(),
                    to: admin_ta.to_account_info(),
                    authority: ctx.accounts.global_state.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )?;
        vault_ta.mint
    } else {
        let state_info = ctx.accounts.global_state.to_account_info();
        let admin_info = ctx.accounts.admin.to_account_info();

        let rent_floor = Rent::get()?.minimum_balance(state_info.data_len());
        let available = state_info.lamports().saturating_sub(rent_floor);
        require!(amount <= available, ErrorCode::InsufficientBalance);

        let state_lamports = state_info
            .lamports()
            .checked_sub(amount)
            .ok_or(ErrorCode::CalculationError)?;
        let admin_lamports = admin_info
            .lamports()
            .checked_add(amount)
            .ok_or(ErrorCode::CalculationError)?;
        **state_info.try_borrow_mut_lamports()? = state_lamports;
        **admin_info.try_borrow_mut_lamports()? = admin_lamports;
        NATIVE_MINT
    };

    msg!("Emergency withdrawal of {} ({})", amount, token);
    emit!(EmergencyWithdrawal {
        admin: ctx.accounts.admin.key(),
        token,
        amount,
    });

    Ok(())
}
