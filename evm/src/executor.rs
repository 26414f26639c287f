//! Transaction executor: one [`Chain`] call is one atomic transaction.
//!
//! Attached native value is debited from the caller and credited to the
//! gateway before the entry point runs. On any error the ledger and the
//! gateway are restored to their pre-call state, the way a reverted EVM
//! transaction leaves no trace. Adapters keep no state outside the ledger,
//! so the snapshot covers everything a call can write.

use alloy_primitives::{Address, U256};
use tracing::{debug, warn};

use crate::adapter::{AdapterRegistry, SwapAdapter};
use crate::error::{GatewayError, GatewayResult};
use crate::fee_vault::FeeVault;
use crate::gateway::{Call, Env, Gateway, GatewayConfig, PaymentReceipt};
use crate::ledger::Ledger;

/// A ledger with one gateway, its fee vault and any deployed adapters.
#[derive(Debug)]
pub struct Chain {
    /// Balances and allowances.
    pub ledger: Ledger,
    gateway: Gateway,
    adapters: AdapterRegistry,
    fee_vault: FeeVault,
}

impl Chain {
    /// Deploys the vault (owned by `config.admin`) and the gateway.
    ///
    /// # Errors
    ///
    /// Propagates [`Gateway::deploy`] validation.
    pub fn new(gateway_address: Address, config: GatewayConfig) -> GatewayResult<Self> {
        let gateway = Gateway::deploy(gateway_address, config)?;
        Ok(Self {
            ledger: Ledger::new(),
            gateway,
            adapters: AdapterRegistry::new(),
            fee_vault: FeeVault::new(config.fee_vault, config.admin),
        })
    }

    /// Read access to the gateway.
    #[must_use]
    pub const fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// The fee vault.
    #[must_use]
    pub const fn fee_vault(&self) -> &FeeVault {
        &self.fee_vault
    }

    /// Places adapter code at `address`.
    pub fn deploy_adapter(&mut self, address: Address, adapter: impl SwapAdapter + 'static) {
        self.adapters.deploy(address, adapter);
    }

    /// Runs `f` as one transaction from `call.caller` carrying `call.value`.
    fn transact<T>(
        &mut self,
        call: Call,
        f: impl FnOnce(&mut Gateway, &mut Env<'_>) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let ledger_snapshot = self.ledger.clone();
        let gateway_snapshot = self.gateway.clone();

        let result = self.run(call, f);
        if let Err(err) = &result {
            warn!(caller = %call.caller, %err, "transaction reverted");
            self.ledger = ledger_snapshot;
            self.gateway = gateway_snapshot;
        }
        result
    }

    fn run<T>(
        &mut self,
        call: Call,
        f: impl FnOnce(&mut Gateway, &mut Env<'_>) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        if !call.value.is_zero() {
            let to = self.gateway.address();
            if !self.ledger.transfer_native(call.caller, to, call.value) {
                return Err(GatewayError::InsufficientFunds);
            }
            debug!(from = %call.caller, %to, value = %call.value, "value attached");
        }
        let mut env = Env {
            ledger: &mut self.ledger,
            adapters: &mut self.adapters,
        };
        f(&mut self.gateway, &mut env)
    }

    /// See [`Gateway::register_merchant`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn register_merchant(
        &mut self,
        caller: Address,
        wallet: Address,
        settlement_token: Address,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| {
            gw.register_merchant(caller, wallet, settlement_token, min_payment, max_payment)
        })
    }

    /// See [`Gateway::update_merchant`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn update_merchant(
        &mut self,
        caller: Address,
        wallet: Address,
        settlement_token: Address,
        swap_enabled: bool,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| {
            gw.update_merchant(
                caller,
                wallet,
                settlement_token,
                swap_enabled,
                min_payment,
                max_payment,
            )
        })
    }

    /// See [`Gateway::set_allowed_token`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn set_allowed_token(&mut self, caller: Address, token: Address, allowed: bool) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| gw.set_allowed_token(caller, token, allowed))
    }

    /// See [`Gateway::set_swap_config`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn set_swap_config(
        &mut self,
        caller: Address,
        adapter: Address,
        enabled: bool,
        slippage_bps: u16,
    ) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| {
            gw.set_swap_config(caller, adapter, enabled, slippage_bps)
        })
    }

    /// See [`Gateway::process_payment`]. `value` is the native amount sent
    /// with the transaction.
    ///
    /// # Errors
    ///
    /// `InsufficientFunds` if the payer cannot cover `value`, otherwise the
    /// gateway's error.
    pub fn process_payment(
        &mut self,
        payer: Address,
        value: U256,
        merchant: Address,
        asset: Address,
        amount: U256,
    ) -> GatewayResult<PaymentReceipt> {
        let call = Call {
            caller: payer,
            value,
        };
        self.transact(call, |gw, env| gw.process_payment(env, call, merchant, asset, amount))
    }

    /// See [`Gateway::set_fee`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn set_fee(&mut self, caller: Address, fee_bps: u16) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| gw.set_fee(caller, fee_bps))
    }

    /// See [`Gateway::set_approved_adapter`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn set_approved_adapter(&mut self, caller: Address, adapter: Address, approved: bool) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| {
            gw.set_approved_adapter(caller, adapter, approved)
        })
    }

    /// See [`Gateway::pause`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn pause(&mut self, caller: Address) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| gw.pause(caller))
    }

    /// See [`Gateway::unpause`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn unpause(&mut self, caller: Address) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| gw.unpause(caller))
    }

    /// See [`Gateway::emergency_withdraw`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn emergency_withdraw(&mut self, caller: Address, asset: Address, amount: U256) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, env| {
            gw.emergency_withdraw(env.ledger, caller, asset, amount)
        })
    }

    /// See [`Gateway::propose_admin`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn propose_admin(&mut self, caller: Address, new_admin: Address) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| gw.propose_admin(caller, new_admin))
    }

    /// See [`Gateway::accept_admin`].
    ///
    /// # Errors
    ///
    /// Reverts with the gateway's error.
    pub fn accept_admin(&mut self, caller: Address) -> GatewayResult<()> {
        self.transact(Call::new(caller), |gw, _| gw.accept_admin(caller))
    }

    /// Hands the fee vault to `new_owner`.
    ///
    /// # Errors
    ///
    /// See [`FeeVault::transfer_ownership`].
    pub fn transfer_vault_ownership(&mut self, caller: Address, new_owner: Address) -> GatewayResult<()> {
        self.fee_vault.transfer_ownership(caller, new_owner)
    }

    /// Withdraws accumulated fees from the vault.
    ///
    /// # Errors
    ///
    /// See [`FeeVault::withdraw`].
    pub fn withdraw_fees(&mut self, caller: Address, asset: Address, to: Address, amount: U256) -> GatewayResult<()> {
        self.fee_vault
            .withdraw(&mut self.ledger, caller, asset, to, amount)
    }
}
