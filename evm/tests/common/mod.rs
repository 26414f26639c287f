#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use orki_gateway_evm::{Chain, GatewayConfig, GatewayError, GatewayResult, SwapAdapter, SwapContext, NATIVE};

pub const GATEWAY: Address = Address::with_last_byte(0xee);
pub const VAULT: Address = Address::with_last_byte(0xfe);
pub const ADMIN: Address = Address::with_last_byte(0x01);
pub const MERCHANT: Address = Address::with_last_byte(0x02);
pub const MERCHANT_WALLET: Address = Address::with_last_byte(0x12);
pub const PAYER: Address = Address::with_last_byte(0x03);
pub const STRANGER: Address = Address::with_last_byte(0x04);
pub const USDC: Address = Address::with_last_byte(0xa0);
pub const WETH: Address = Address::with_last_byte(0xa1);
pub const ADAPTER: Address = Address::with_last_byte(0xad);

pub fn units(n: u64) -> U256 {
    U256::from(n)
}

pub fn chain_with_fee(fee_bps: u16) -> Chain {
    Chain::new(
        GATEWAY,
        GatewayConfig {
            admin: ADMIN,
            fee_vault: VAULT,
            fee_bps,
        },
    )
    .unwrap()
}

/// Gateway at 100 bps with `MERCHANT` settling in `settlement`, bounds
/// `1..=1_000_000`.
pub fn chain_with_merchant(settlement: Address) -> Chain {
    let mut chain = chain_with_fee(100);
    chain
        .register_merchant(MERCHANT, MERCHANT_WALLET, settlement, units(1), units(1_000_000))
        .unwrap();
    chain
}

/// Registers `adapter` code, approves it and points `MERCHANT`'s swap
/// config at it.
pub fn enable_swaps(chain: &mut Chain, adapter: impl SwapAdapter + 'static) {
    let merchant = chain.gateway().merchant(&MERCHANT).unwrap().clone();
    chain.deploy_adapter(ADAPTER, adapter);
    chain.set_approved_adapter(ADMIN, ADAPTER, true).unwrap();
    chain.set_swap_config(MERCHANT, ADAPTER, true, 50).unwrap();
    chain
        .update_merchant(
            MERCHANT,
            merchant.wallet,
            merchant.settlement_token,
            true,
            merchant.min_payment,
            merchant.max_payment,
        )
        .unwrap();
}

fn pay_out(ctx: &mut SwapContext<'_>, asset: Address, recipient: Address, amount: U256) -> GatewayResult<()> {
    let moved = if asset == NATIVE {
        ctx.ledger.transfer_native(ctx.adapter, recipient, amount)
    } else {
        ctx.ledger.transfer(asset, ctx.adapter, recipient, amount)
    };
    if moved {
        Ok(())
    } else {
        Err(GatewayError::SwapFailed("insufficient liquidity".into()))
    }
}

fn pull(ctx: &mut SwapContext<'_>, token: Address, amount: U256) -> GatewayResult<()> {
    if ctx
        .ledger
        .transfer_from(token, ctx.adapter, ctx.caller, ctx.adapter, amount)
    {
        Ok(())
    } else {
        Err(GatewayError::SwapFailed("transferFrom failed".into()))
    }
}

/// Converts at `numerator / denominator`, paying out of its own balance.
#[derive(Debug, Clone, Copy)]
pub struct FixedRateAdapter {
    pub numerator: u64,
    pub denominator: u64,
}

impl FixedRateAdapter {
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    fn quote(&self, amount_in: U256) -> U256 {
        amount_in * U256::from(self.numerator) / U256::from(self.denominator)
    }

    fn finish(
        &self,
        ctx: &mut SwapContext<'_>,
        amount_in: U256,
        asset_out: Address,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256> {
        let amount_out = self.quote(amount_in);
        if amount_out < min_amount_out {
            return Err(GatewayError::SlippageExceeded {
                amount_out,
                min_amount_out,
            });
        }
        pay_out(ctx, asset_out, recipient, amount_out)?;
        Ok(amount_out)
    }
}

impl SwapAdapter for FixedRateAdapter {
    fn swap_native_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        token_out: Address,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256> {
        let amount_in = ctx.value;
        self.finish(ctx, amount_in, token_out, min_amount_out, recipient)
    }

    fn swap_tokens_for_native(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256> {
        pull(ctx, token_in, amount_in)?;
        self.finish(ctx, amount_in, NATIVE, min_amount_out, recipient)
    }

    fn swap_tokens_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256> {
        pull(ctx, token_in, amount_in)?;
        self.finish(ctx, amount_in, token_out, min_amount_out, recipient)
    }
}

/// Pulls only half of what it was approved for, pays one-for-one on that
/// half.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfPullAdapter;

impl SwapAdapter for HalfPullAdapter {
    fn swap_native_for_tokens(
        &self,
        _ctx: &mut SwapContext<'_>,
        _token_out: Address,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        Err(GatewayError::SwapFailed("unsupported".into()))
    }

    fn swap_tokens_for_native(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        amount_in: U256,
        _min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256> {
        let half = amount_in / U256::from(2);
        pull(ctx, token_in, half)?;
        pay_out(ctx, NATIVE, recipient, half)?;
        Ok(half)
    }

    fn swap_tokens_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        _min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256> {
        let half = amount_in / U256::from(2);
        pull(ctx, token_in, half)?;
        pay_out(ctx, token_out, recipient, half)?;
        Ok(half)
    }
}

/// Takes the input, then fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingAdapter;

impl SwapAdapter for FailingAdapter {
    fn swap_native_for_tokens(
        &self,
        _ctx: &mut SwapContext<'_>,
        _token_out: Address,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        Err(GatewayError::SwapFailed("pool drained".into()))
    }

    fn swap_tokens_for_native(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        amount_in: U256,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        pull(ctx, token_in, amount_in)?;
        Err(GatewayError::SwapFailed("pool drained".into()))
    }

    fn swap_tokens_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        _token_out: Address,
        amount_in: U256,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        pull(ctx, token_in, amount_in)?;
        Err(GatewayError::SwapFailed("pool drained".into()))
    }
}

/// Which gateway entry point a [`ReentrantAdapter`] calls back into.
#[derive(Debug, Clone, Copy)]
pub enum Reentry {
    RegisterMerchant,
    SetAllowedToken,
    ProcessPayment,
    SetFee,
    SetApprovedAdapter,
    Pause,
    EmergencyWithdraw,
    ProposeAdmin,
    AcceptAdmin,
}

/// Calls back into the gateway mid-swap and surfaces whatever it returns.
#[derive(Debug, Clone, Copy)]
pub struct ReentrantAdapter(pub Reentry);

impl ReentrantAdapter {
    fn reenter(&self, ctx: &mut SwapContext<'_>) -> GatewayResult<U256> {
        let adapter = ctx.adapter;
        match self.0 {
            Reentry::RegisterMerchant => {
                ctx.gateway
                    .register_merchant(adapter, NATIVE, units(1), units(10))?;
            }
            Reentry::SetAllowedToken => {
                ctx.gateway.set_allowed_token(WETH, true)?;
            }
            Reentry::ProcessPayment => {
                let mut adapters = orki_gateway_evm::AdapterRegistry::new();
                let mut env = orki_gateway_evm::Env {
                    ledger: &mut *ctx.ledger,
                    adapters: &mut adapters,
                };
                ctx.gateway
                    .process_payment(&mut env, U256::ZERO, MERCHANT, USDC, units(10))?;
            }
            Reentry::SetFee => ctx.gateway.set_fee(500)?,
            Reentry::SetApprovedAdapter => ctx.gateway.set_approved_adapter(STRANGER, true)?,
            Reentry::Pause => ctx.gateway.pause()?,
            Reentry::EmergencyWithdraw => {
                let amount = ctx.ledger.native_balance(GATEWAY);
                ctx.gateway.emergency_withdraw(ctx.ledger, NATIVE, amount)?;
            }
            Reentry::ProposeAdmin => ctx.gateway.propose_admin(adapter)?,
            Reentry::AcceptAdmin => ctx.gateway.accept_admin()?,
        }
        Ok(U256::ZERO)
    }
}

/// Writes a marker into the ledger, then fails.
#[derive(Debug, Clone, Copy)]
pub struct ScribblingAdapter {
    pub marker: Address,
}

impl ScribblingAdapter {
    fn scribble(&self, ctx: &mut SwapContext<'_>) -> GatewayResult<U256> {
        ctx.ledger.mint(self.marker, ctx.adapter, units(1));
        ctx.ledger.fund_native(ctx.adapter, units(1));
        Err(GatewayError::SwapFailed("after scribbling".into()))
    }
}

impl SwapAdapter for ScribblingAdapter {
    fn swap_native_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        _token_out: Address,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        self.scribble(ctx)
    }

    fn swap_tokens_for_native(
        &self,
        ctx: &mut SwapContext<'_>,
        _token_in: Address,
        _amount_in: U256,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        self.scribble(ctx)
    }

    fn swap_tokens_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        _token_in: Address,
        _token_out: Address,
        _amount_in: U256,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        self.scribble(ctx)
    }
}

impl SwapAdapter for ReentrantAdapter {
    fn swap_native_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        _token_out: Address,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        self.reenter(ctx)
    }

    fn swap_tokens_for_native(
        &self,
        ctx: &mut SwapContext<'_>,
        _token_in: Address,
        _amount_in: U256,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        self.reenter(ctx)
    }

    fn swap_tokens_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        _token_in: Address,
        _token_out: Address,
        _amount_in: U256,
        _min_amount_out: U256,
        _recipient: Address,
    ) -> GatewayResult<U256> {
        self.reenter(ctx)
    }
}
