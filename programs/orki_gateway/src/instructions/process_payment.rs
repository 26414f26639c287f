use anchor_lang::prelude::*;
use anchor_spl::token::{self, Approve, Mint, Revoke, Token, TokenAccount, Transfer};
use crate::adapter::{invoke_swap, SwapAccounts, SwapArgs, SwapKind};
use crate::constants::{GLOBAL_STATE_SEED, MERCHANT_SEED, NATIVE_MINT, PAYMENT_SEED};
use crate::errors::ErrorCode;
use crate::events::PaymentProcessed;
use crate::state::{AdapterApproval, FeeSplit, GlobalState, Merchant, Payment, SwapConfig};

#[derive(Accounts)]
#[instruction(merchant_owner: Pubkey, name: String, token: Pubkey, amount: u64, payment_id: u64)]
pub struct ProcessPayment<'info> {
    #[account(
        seeds = [GLOBAL_STATE_SEED],
        bump = global_state.bump
    )]
    pub global_state: Box<Account<'info, GlobalState>>,

    /// CHECK: Deserialized in the handler so a missing merchant reports
    /// `MerchantNotRegistered` after the pause check.
    #[account(
        seeds = [MERCHANT_SEED, merchant_owner.as_ref(), name.as_bytes()],
        bump
    )]
    pub merchant: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: Merchant wallet to receive funds (For SOL payment)
    #[account(mut)]
    pub merchant_wallet: UncheckedAccount<'info>,

    /// CHECK: Fee wallet to receive fees (For SOL payment). Compared with
    /// `global_state.fee_wallet` at settlement, after the pause check.
    #[account(mut)]
    pub fee_wallet: UncheckedAccount<'info>,

    // Allocated before the handler runs: a reused payment id fails here,
    // ahead of any fund movement.
    #[account(
        init,
        payer = payer,
        space = 8 + Payment::INIT_SPACE,
        seeds = [PAYMENT_SEED, payer.key().as_ref(), &payment_id.to_le_bytes()],
        bump
    )]
    pub payment_history: Box<Account<'info, Payment>>,

    pub system_program: Program<'info, System>,

    // --- Optional Accounts for SPL ---
    pub token_program: Option<Program<'info, Token>>,
    pub mint: Option<Box<Account<'info, Mint>>>,

    #[account(mut)]
    pub payer_token_account: Option<Box<Account<'info, TokenAccount>>>,

    #[account(mut)]
    pub merchant_token_account: Option<Box<Account<'info, TokenAccount>>>,

    #[account(mut)]
    pub fee_token_account: Option<Box<Account<'info, TokenAccount>>>,

    // --- Optional Accounts for swap settlement ---
    pub swap_config: Option<Box<Account<'info, SwapConfig>>>,
    pub adapter_approval: Option<Box<Account<'info, AdapterApproval>>>,

    /// CHECK: Must equal the merchant's configured, approved adapter
    pub adapter_program: Option<UncheckedAccount<'info>>,

    /// CHECK: Adapter-owned authority; receives SOL input or a token delegation
    #[account(mut)]
    pub adapter_authority: Option<UncheckedAccount<'info>>,

    /// Merchant's token account for the settlement asset (swap output)
    #[account(mut)]
    pub settlement_token_account: Option<Box<Account<'info, TokenAccount>>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Fee and remainder move in the paid asset.
    Direct,
    /// Fee moves in the paid asset; the remainder goes through the adapter.
    Swap,
}

#[derive(Clone, Debug)]
pub struct PaymentPlan {
    pub merchant: Merchant,
    pub split: FeeSplit,
    pub route: Route,
}

/// Runs every check that needs no account access, in the order that
/// decides which error a caller sees: pause, registration, bounds,
/// whitelist, then agreement between the declared asset and the mint
/// account actually supplied.
pub fn plan_payment(
    state: &GlobalState,
    merchant: Option<Merchant>,
    token: &Pubkey,
    amount: u64,
    supplied_mint: Option<Pubkey>,
) -> Result<PaymentPlan> {
    require!(!state.paused, ErrorCode::Paused);
    let merchant = merchant.ok_or(ErrorCode::MerchantNotRegistered)?;
    merchant.validate_payment(token, amount)?;

    let declared_matches = if *token == NATIVE_MINT {
        supplied_mint.is_none()
    } else {
        supplied_mint == Some(*token)
    };
    require!(declared_matches, ErrorCode::InvalidAmount);

    let route = if merchant.needs_swap(token) {
        Route::Swap
    } else {
        Route::Direct
    };
    let split = state.fee_split(amount)?;

    Ok(PaymentPlan { merchant, split, route })
}

pub fn process_payment<'info>(
    ctx: Context<'_, '_, 'info, 'info, ProcessPayment<'info>>,
    _merchant_owner: Pubkey,
    _name: String,
    token: Pubkey,
    amount: u64,
    payment_id: u64,
) -> Result<()> {
    let plan = plan_payment(
        &ctx.accounts.global_state,
        Merchant::try_load(&ctx.accounts.merchant.to_account_info())?,
        &token,
        amount,
        ctx.accounts.mint.as_ref().map(|m| m.key()),
    )?;
    let PaymentPlan { merchant, split, route } = plan;

    let swapped = match route {
        Route::Direct => {
            ctx.accounts.settle_direct(&merchant, &token, amount, split)?;
            false
        }
        Route::Swap => {
            ctx.accounts
                .settle_swap(&merchant, &token, amount, split, ctx.remaining_accounts)?;
            true
        }
    };

    let timestamp = Clock::get()?.unix_timestamp;

    // Mark payment as processed
    let payment = &mut ctx.accounts.payment_history;
    payment.payer = ctx.accounts.payer.key();
    payment.merchant = ctx.accounts.merchant.key();
    payment.amount = amount;
    payment.fee = split.fee;
    payment.token = token;
    payment.swapped = swapped;
    payment.payment_id = payment_id;
    payment.timestamp = timestamp;
    payment.bump = ctx.bumps.payment_history;

    emit!(PaymentProcessed {
        payer: ctx.accounts.payer.key(),
        merchant: ctx.accounts.merchant.key(),
        amount,
        fee: split.fee,
        token,
        swapped,
        payment_id,
        timestamp,
    });

    Ok(())
}

/// The SPL accounts a token payment moves funds through, already checked
/// against the paid mint and the payer.
struct PayerTokenAccounts<'a, 'info> {
    token_program: &'a Program<'info, Token>,
    payer_ta: &'a Account<'info, TokenAccount>,
    fee_ta: &'a Account<'info, TokenAccount>,
}

impl<'info> ProcessPayment<'info> {
    fn settle_direct(
        &self,
        merchant: &Merchant,
        token: &Pubkey,
        amount: u64,
        split: FeeSplit,
    ) -> Result<()> {
        if *token == NATIVE_MINT {
            // --- NATIVE SOL PAYMENT ---
            require_keys_eq!(
                self.merchant_wallet.key(),
                merchant.settlement_wallet,
                ErrorCode::InvalidMerchantWallet
            );
            self.global_state.check_fee_wallet(&self.fee_wallet.key())?;
            require!(self.payer.lamports() >= amount, ErrorCode::InsufficientBalance);

            self.transfer_sol(&self.fee_wallet.to_account_info(), split.fee)?;
            self.transfer_sol(&self.merchant_wallet.to_account_info(), split.merchant_amount)?;
        } else {
            // --- SPL TOKEN PAYMENT ---
            let spl = self.payer_token_accounts(token, amount)?;
            let merchant_ta = self
                .merchant_token_account
                .as_ref()
                .ok_or(ErrorCode::MissingAccount)?;
            require_keys_eq!(merchant_ta.mint, *token, ErrorCode::InvalidTokenAccount);
            require_keys_eq!(
                merchant_ta.owner,
                merchant.settlement_wallet,
                ErrorCode::InvalidMerchantWallet
            );

            self.transfer_spl(&spl, &spl.fee_ta.to_account_info(), split.fee)?;
            self.transfer_spl(&spl, &merchant_ta.to_account_info(), split.merchant_amount)?;
        }

        msg!("Direct settlement: {} to merchant, {} fee", split.merchant_amount, split.fee);
        Ok(())
    }

    fn settle_swap(
        &self,
        merchant: &Merchant,
        token: &Pubkey,
        amount: u64,
        split: FeeSplit,
        venue_accounts: &[AccountInfo<'info>],
    ) -> Result<u64> {
        let config = self.swap_config.as_ref().ok_or(ErrorCode::SwapNotAllowed)?;
        require_keys_eq!(config.merchant, self.merchant.key(), ErrorCode::SwapNotAllowed);
        let adapter = config.usable_adapter(self.adapter_approval.as_deref().map(|a| &**a))?;

        let adapter_program = self.adapter_program.as_ref().ok_or(ErrorCode::InvalidAdapter)?;
        require_keys_eq!(adapter_program.key(), adapter, ErrorCode::InvalidAdapter);
        require!(
            adapter_program.executable && adapter != crate::ID,
            ErrorCode::InvalidAdapter
        );
        let adapter_authority = self
            .adapter_authority
            .as_ref()
            .ok_or(ErrorCode::MissingAccount)?
            .to_account_info();

        // Output goes straight to the merchant, never back through the gateway.
        let recipient = if merchant.settles_native() {
            require_keys_eq!(
                self.merchant_wallet.key(),
                merchant.settlement_wallet,
                ErrorCode::InvalidMerchantWallet
            );
            self.merchant_wallet.to_account_info()
        } else {
            let settlement_ta = self
                .settlement_token_account
                .as_ref()
                .ok_or(ErrorCode::MissingAccount)?;
            require_keys_eq!(
                settlement_ta.mint,
                merchant.settlement_token,
                ErrorCode::InvalidTokenAccount
            );
            require_keys_eq!(
                settlement_ta.owner,
                merchant.settlement_wallet,
                ErrorCode::InvalidMerchantWallet
            );
            settlement_ta.to_account_info()
        };

        let kind = SwapKind::for_route(token, &merchant.settlement_token)
            .ok_or(ErrorCode::SwapNotAllowed)?;
        let args = SwapArgs {
            input_mint: *token,
            output_mint: merchant.settlement_token,
            amount_in: split.merchant_amount,
            // TODO: derive the floor from `config.slippage_bps` once a price
            // quote source is wired in.
            min_amount_out: 0,
        };

        let amount_out = if *token == NATIVE_MINT {
            self.global_state.check_fee_wallet(&self.fee_wallet.key())?;
            require!(self.payer.lamports() >= amount, ErrorCode::InsufficientBalance);

            // The fee is skimmed in the paid asset before conversion.
            self.transfer_sol(&self.fee_wallet.to_account_info(), split.fee)?;
            self.transfer_sol(&adapter_authority, args.amount_in)?;

            invoke_swap(
                SwapAccounts {
                    adapter_program: &adapter_program.to_account_info(),
                    authority: &adapter_authority,
                    source: &adapter_authority,
                    recipient: &recipient,
                    venue_accounts,
                },
                kind,
                &args,
            )?
        } else {
            let spl = self.payer_token_accounts(token, amount)?;
            self.transfer_spl(&spl, &spl.fee_ta.to_account_info(), split.fee)?;

            token::approve(
                CpiContext::new(
                    spl.token_program.to_account_info(),
                    Approve {
                        to: spl.payer_ta.to_account_info(),
                        delegate: adapter_authority.clone(),
                        authority: self.payer.to_account_info(),
                    },
                ),
                args.amount_in,
            )?;

            let swapped = invoke_swap(
                SwapAccounts {
                    adapter_program: &adapter_program.to_account_info(),
                    authority: &adapter_authority,
                    source: &spl.payer_ta.to_account_info(),
                    recipient: &recipient,
                    venue_accounts,
                },
                kind,
                &args,
            );

            // No standing delegation survives the payment.
            token::revoke(CpiContext::new(
                spl.token_program.to_account_info(),
                Revoke {
                    source: spl.payer_ta.to_account_info(),
                    authority: self.payer.to_account_info(),
                },
            ))?;

            swapped?
        };

        msg!(
            "Swap settlement via {}: {} in, {} out, {} fee",
            adapter,
            args.amount_in,
            amount_out,
            split.fee
        );
        Ok(amount_out)
    }

    fn payer_token_accounts(&self, token: &Pubkey, amount: u64) -> Result<PayerTokenAccounts<'_, 'info>> {
        let token_program = self.token_program.as_ref().ok_or(ErrorCode::MissingAccount)?;
        let payer_ta = self.payer_token_account.as_ref().ok_or(ErrorCode::MissingAccount)?;
        let fee_ta = self.fee_token_account.as_ref().ok_or(ErrorCode::MissingAccount)?;

        require_keys_eq!(payer_ta.mint, *token, ErrorCode::InvalidTokenAccount);
        require_keys_eq!(payer_ta.owner, self.payer.key(), ErrorCode::InvalidTokenAccount);
        require_keys_eq!(fee_ta.mint, *token, ErrorCode::InvalidTokenAccount);
        require_keys_eq!(
            fee_ta.owner,
            self.global_state.fee_wallet,
            ErrorCode::InvalidFeeWallet
        );

        // Check payer has enough balance
        require!(payer_ta.amount >= amount, ErrorCode::InsufficientBalance);

        Ok(PayerTokenAccounts {
            token_program,
            payer_ta,
            fee_ta,
        })
    }

    fn transfer_sol(&self, to: &AccountInfo<'info>, lamports: u64) -> Result<()> {
        if lamports == 0 {
            return Ok(());
        }
        anchor_lang::system_program::transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                anchor_lang::system_program::Transfer {
                    from: self.payer.to_account_info(),
                    to: to.clone(),
                },
            ),
            lamports,
        )
    }

    fn transfer_spl(
        &self,
        spl: &PayerTokenAccounts<'_, 'info>,
        to: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        token::transfer(
            CpiContext::new(
                spl.token_program.to_account_info(),
                Transfer {
                    from: spl.payer_ta.to_account_info(),
                    to: to.clone(),
                    authority: self.payer.to_account_info(),
                },
            ),
            amount,
        )
    }
}
