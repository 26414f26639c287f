//! Swap adapter capability.
//!
//! Adapters are untrusted external code. The gateway calls them with its
//! reentrancy lock held, hands them a [`GatewayHandle`] bound to their own
//! address, and checks adapter approval on every payment, so a revocation
//! applies to the very next call.

use std::collections::HashMap;
use std::fmt;

use alloy_primitives::{Address, U256};

use crate::error::GatewayResult;
use crate::gateway::{Call, Env, Gateway, PaymentReceipt};
use crate::ledger::Ledger;

/// The calling gateway as seen from inside an adapter.
///
/// Every call goes out with the adapter's own address as the caller, the
/// way `msg.sender` works on chain; an adapter cannot act as anyone else.
pub struct GatewayHandle<'a> {
    gateway: &'a mut Gateway,
    caller: Address,
}

impl<'a> GatewayHandle<'a> {
    pub(crate) fn new(gateway: &'a mut Gateway, caller: Address) -> Self {
        Self { gateway, caller }
    }

    /// Address calls from this handle are attributed to.
    #[must_use]
    pub const fn caller(&self) -> Address {
        self.caller
    }

    /// Read access to gateway state.
    #[must_use]
    pub fn view(&self) -> &Gateway {
        &*self.gateway
    }

    /// See [`Gateway::register_merchant`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn register_merchant(
        &mut self,
        wallet: Address,
        settlement_token: Address,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        self.gateway
            .register_merchant(self.caller, wallet, settlement_token, min_payment, max_payment)
    }

    /// See [`Gateway::update_merchant`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn update_merchant(
        &mut self,
        wallet: Address,
        settlement_token: Address,
        swap_enabled: bool,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        self.gateway.update_merchant(
            self.caller,
            wallet,
            settlement_token,
            swap_enabled,
            min_payment,
            max_payment,
        )
    }

    /// See [`Gateway::set_allowed_token`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn set_allowed_token(&mut self, token: Address, allowed: bool) -> GatewayResult<()> {
        self.gateway.set_allowed_token(self.caller, token, allowed)
    }

    /// See [`Gateway::set_swap_config`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn set_swap_config(&mut self, adapter: Address, enabled: bool, slippage_bps: u16) -> GatewayResult<()> {
        self.gateway
            .set_swap_config(self.caller, adapter, enabled, slippage_bps)
    }

    /// See [`Gateway::process_payment`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn process_payment(
        &mut self,
        env: &mut Env<'_>,
        value: U256,
        merchant_owner: Address,
        asset: Address,
        amount: U256,
    ) -> GatewayResult<PaymentReceipt> {
        let call = Call {
            caller: self.caller,
            value,
        };
        self.gateway
            .process_payment(env, call, merchant_owner, asset, amount)
    }

    /// See [`Gateway::set_fee`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn set_fee(&mut self, new_fee_bps: u16) -> GatewayResult<()> {
        self.gateway.set_fee(self.caller, new_fee_bps)
    }

    /// See [`Gateway::set_approved_adapter`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn set_approved_adapter(&mut self, adapter: Address, approved: bool) -> GatewayResult<()> {
        self.gateway
            .set_approved_adapter(self.caller, adapter, approved)
    }

    /// See [`Gateway::pause`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn pause(&mut self) -> GatewayResult<()> {
        self.gateway.pause(self.caller)
    }

    /// See [`Gateway::unpause`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn unpause(&mut self) -> GatewayResult<()> {
        self.gateway.unpause(self.caller)
    }

    /// See [`Gateway::emergency_withdraw`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn emergency_withdraw(&mut self, ledger: &mut Ledger, asset: Address, amount: U256) -> GatewayResult<()> {
        self.gateway
            .emergency_withdraw(ledger, self.caller, asset, amount)
    }

    /// See [`Gateway::propose_admin`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn propose_admin(&mut self, new_admin: Address) -> GatewayResult<()> {
        self.gateway.propose_admin(self.caller, new_admin)
    }

    /// See [`Gateway::accept_admin`].
    ///
    /// # Errors
    ///
    /// As the gateway entry point.
    pub fn accept_admin(&mut self) -> GatewayResult<()> {
        self.gateway.accept_admin(self.caller)
    }
}

impl fmt::Debug for GatewayHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayHandle")
            .field("gateway", &self.gateway.address())
            .field("caller", &self.caller)
            .finish()
    }
}

/// Execution context handed to an adapter for one call.
pub struct SwapContext<'a> {
    /// Shared ledger.
    pub ledger: &'a mut Ledger,
    /// The calling gateway, bound to `adapter` as caller. Every guarded
    /// entry point refuses while the outer payment is in flight.
    pub gateway: GatewayHandle<'a>,
    /// The adapter's own ledger address.
    pub adapter: Address,
    /// Immediate caller (the gateway's address).
    pub caller: Address,
    /// Native value forwarded with the call, already credited to `adapter`.
    pub value: U256,
}

impl fmt::Debug for SwapContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapContext")
            .field("gateway", &self.gateway)
            .field("adapter", &self.adapter)
            .field("caller", &self.caller)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Converts one asset into another and delivers the output to `recipient`.
///
/// Each method returns the amount delivered and must fail rather than
/// deliver less than `min_amount_out`. Methods take `&self`: anything an
/// adapter persists lives on the ledger, which reverts with the transaction.
pub trait SwapAdapter {
    /// Native in (`ctx.value`), `token_out` out.
    ///
    /// # Errors
    ///
    /// Any failure reverts the whole payment.
    fn swap_native_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        token_out: Address,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256>;

    /// `amount_in` of `token_in`, pulled from `ctx.caller` via allowance,
    /// native out.
    ///
    /// # Errors
    ///
    /// Any failure reverts the whole payment.
    fn swap_tokens_for_native(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256>;

    /// `amount_in` of `token_in`, pulled from `ctx.caller` via allowance,
    /// `token_out` out.
    ///
    /// # Errors
    ///
    /// Any failure reverts the whole payment.
    fn swap_tokens_for_tokens(
        &self,
        ctx: &mut SwapContext<'_>,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
        min_amount_out: U256,
        recipient: Address,
    ) -> GatewayResult<U256>;
}

/// Adapter code deployed at ledger addresses.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Address, Box<dyn SwapAdapter>>,
}

impl AdapterRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `adapter` at `address`, replacing whatever was there.
    pub fn deploy(&mut self, address: Address, adapter: impl SwapAdapter + 'static) {
        self.adapters.insert(address, Box::new(adapter));
    }

    pub(crate) fn get(&self, address: &Address) -> Option<&dyn SwapAdapter> {
        self.adapters.get(address).map(|a| &**a)
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("deployed", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}
