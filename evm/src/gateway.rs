//! The gateway contract: merchant-facing entry points, payment processing
//! and the owner-gated admin surface.
//!
//! A payment passes through validate, classify, settle (direct or swap) and
//! emit within one call. Nothing here persists partial progress: the
//! surrounding [`crate::Chain`] rolls the ledger and gateway back on any
//! error.

use std::collections::HashSet;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::adapter::{AdapterRegistry, GatewayHandle, SwapContext};
use crate::constants::{BPS_DENOMINATOR, MAX_FEE_BPS, NATIVE};
use crate::error::{GatewayError, GatewayResult};
use crate::events::Event;
use crate::ledger::Ledger;
use crate::merchant::{Merchant, MerchantRegistry, SwapConfig};

/// Deployment parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Initial admin.
    pub admin: Address,
    /// Destination for protocol fees.
    pub fee_vault: Address,
    /// Protocol fee in basis points, at most [`MAX_FEE_BPS`].
    pub fee_bps: u16,
}

/// Process-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalState {
    /// Current admin.
    pub admin: Address,
    /// Proposed successor awaiting acceptance.
    pub pending_admin: Option<Address>,
    /// Protocol fee in basis points.
    pub fee_bps: u16,
    /// Fee destination.
    pub fee_vault: Address,
    /// Payment switch.
    pub paused: bool,
    approved_adapters: HashSet<Address>,
}

/// Transaction envelope: who is calling and how much native value is
/// attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Call {
    /// `msg.sender`.
    pub caller: Address,
    /// `msg.value`, already credited to the gateway.
    pub value: U256,
}

impl Call {
    /// A call with no value attached.
    #[must_use]
    pub const fn new(caller: Address) -> Self {
        Self {
            caller,
            value: U256::ZERO,
        }
    }
}

/// What [`Gateway::process_payment`] needs from the outside world.
#[derive(Debug)]
pub struct Env<'a> {
    /// Shared ledger.
    pub ledger: &'a mut Ledger,
    /// Deployed adapter code.
    pub adapters: &'a mut AdapterRegistry,
}

/// Outcome of a settled payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Skimmed to the fee vault, in the paid asset.
    pub fee: U256,
    /// Paid asset amount left after the fee.
    pub merchant_amount: U256,
    /// Whether the remainder went through an adapter.
    pub swapped: bool,
    /// Delivered to the merchant, in the asset it received.
    pub amount_out: U256,
}

/// `fee = floor(amount * fee_bps / 10_000)`; returns `(fee, amount - fee)`.
///
/// # Errors
///
/// `CalculationError` when `amount * fee_bps` does not fit in 256 bits.
pub fn split_fee(amount: U256, fee_bps: u16) -> GatewayResult<(U256, U256)> {
    let fee = amount
        .checked_mul(U256::from(fee_bps))
        .ok_or(GatewayError::CalculationError)?
        / U256::from(BPS_DENOMINATOR);
    Ok((fee, amount - fee))
}

/// Gateway contract state.
#[derive(Clone, Debug)]
pub struct Gateway {
    address: Address,
    state: GlobalState,
    merchants: MerchantRegistry,
    entered: bool,
    events: Vec<Event>,
}

impl Gateway {
    /// Deploys a gateway at `address`.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a fee above [`MAX_FEE_BPS`], `InvalidFeeVault` for
    /// a zero vault.
    pub fn deploy(address: Address, config: GatewayConfig) -> GatewayResult<Self> {
        if config.fee_bps > MAX_FEE_BPS {
            return Err(GatewayError::InvalidAmount);
        }
        if config.fee_vault == Address::ZERO {
            return Err(GatewayError::InvalidFeeVault);
        }
        info!(%address, admin = %config.admin, fee_bps = config.fee_bps, "gateway deployed");
        Ok(Self {
            address,
            state: GlobalState {
                admin: config.admin,
                pending_admin: None,
                fee_bps: config.fee_bps,
                fee_vault: config.fee_vault,
                paused: false,
                approved_adapters: HashSet::new(),
            },
            merchants: MerchantRegistry::default(),
            entered: false,
            events: Vec::new(),
        })
    }

    /// The gateway's own ledger address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Global configuration.
    #[must_use]
    pub const fn state(&self) -> &GlobalState {
        &self.state
    }

    /// Registered merchant owned by `owner`.
    #[must_use]
    pub fn merchant(&self, owner: &Address) -> Option<&Merchant> {
        self.merchants.get(owner)
    }

    /// Accepted-token snapshot for `owner`; order is not stable across
    /// removals.
    #[must_use]
    pub fn supported_tokens(&self, owner: &Address) -> Vec<Address> {
        self.merchants.supported_tokens(owner)
    }

    /// Swap config for `owner`.
    #[must_use]
    pub fn swap_config(&self, owner: &Address) -> Option<&SwapConfig> {
        self.merchants.swap_config(owner)
    }

    /// Whether the admin currently approves `adapter`.
    #[must_use]
    pub fn is_adapter_approved(&self, adapter: &Address) -> bool {
        self.state.approved_adapters.contains(adapter)
    }

    /// Event log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    fn emit(&mut self, event: Event) {
        debug!(?event, "event");
        self.events.push(event);
    }

    fn only_admin(&self, caller: Address) -> GatewayResult<()> {
        if caller != self.state.admin {
            return Err(GatewayError::Unauthorized);
        }
        Ok(())
    }

    /// Runs `f` with the reentrancy lock held.
    fn non_reentrant<T>(&mut self, f: impl FnOnce(&mut Self) -> GatewayResult<T>) -> GatewayResult<T> {
        if self.entered {
            warn!(gateway = %self.address, "reentrant call rejected");
            return Err(GatewayError::ReentrantCall);
        }
        self.entered = true;
        let result = f(self);
        self.entered = false;
        result
    }

    // ------------------------------------------------------------------
    // Merchant registry
    // ------------------------------------------------------------------

    /// Registers `caller` as a merchant.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `InvalidWallet`, `AlreadyRegistered`, `ZeroAmount`,
    /// `AmountRangeInvalid`.
    pub fn register_merchant(
        &mut self,
        caller: Address,
        wallet: Address,
        settlement_token: Address,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.merchants
                .register(caller, wallet, settlement_token, min_payment, max_payment)?;
            info!(owner = %caller, %wallet, %settlement_token, "merchant registered");
            gw.emit(Event::MerchantRegistered {
                owner: caller,
                wallet,
                settlement_token,
                min_payment,
                max_payment,
            });
            Ok(())
        })
    }

    /// Overwrites the caller's merchant configuration.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `MerchantNotRegistered`, then the registration
    /// checks.
    pub fn update_merchant(
        &mut self,
        caller: Address,
        wallet: Address,
        settlement_token: Address,
        swap_enabled: bool,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.merchants.update(
                caller,
                wallet,
                settlement_token,
                swap_enabled,
                min_payment,
                max_payment,
            )?;
            info!(owner = %caller, swap_enabled, "merchant updated");
            gw.emit(Event::MerchantUpdated {
                owner: caller,
                wallet,
                settlement_token,
                swap_enabled,
                min_payment,
                max_payment,
            });
            Ok(())
        })
    }

    /// Toggles `token` in the caller's whitelist.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `MerchantNotRegistered`, `TooManyTokens`.
    pub fn set_allowed_token(&mut self, caller: Address, token: Address, allowed: bool) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.merchants.set_allowed_token(caller, token, allowed)?;
            gw.emit(Event::TokenAllowed {
                owner: caller,
                token,
                allowed,
            });
            Ok(())
        })
    }

    /// Sets the caller's swap participation.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `MerchantNotRegistered`, `InvalidSlippage`.
    pub fn set_swap_config(
        &mut self,
        caller: Address,
        adapter: Address,
        enabled: bool,
        slippage_bps: u16,
    ) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.merchants
                .set_swap_config(caller, adapter, enabled, slippage_bps)?;
            gw.emit(Event::SwapConfigUpdated {
                owner: caller,
                adapter,
                enabled,
                slippage_bps,
            });
            Ok(())
        })
    }

    // ------------------------------------------------------------------
    // Payment processing
    // ------------------------------------------------------------------

    /// Settles a payment of `amount` in `asset` to the merchant owned by
    /// `merchant_owner`.
    ///
    /// Checks run in a fixed order: reentrancy, pause, registration, bounds,
    /// whitelist, attached value. The attached value must equal `amount`
    /// for a native payment and be zero otherwise.
    ///
    /// # Errors
    ///
    /// Any of the validation errors above, then `SwapNotAllowed`,
    /// `AdapterNotApproved`, `SwapFailed`, `SlippageExceeded` or
    /// `TransferFailed` during settlement.
    pub fn process_payment(
        &mut self,
        env: &mut Env<'_>,
        call: Call,
        merchant_owner: Address,
        asset: Address,
        amount: U256,
    ) -> GatewayResult<PaymentReceipt> {
        self.non_reentrant(|gw| {
            if gw.state.paused {
                return Err(GatewayError::Paused);
            }
            let merchant = gw
                .merchants
                .get(&merchant_owner)
                .ok_or(GatewayError::MerchantNotRegistered)?
                .clone();
            merchant.check_payment(&asset, amount)?;

            let value_matches = if asset == NATIVE {
                call.value == amount
            } else {
                call.value.is_zero()
            };
            if !value_matches {
                debug!(%asset, %amount, value = %call.value, "attached value mismatch");
                return Err(GatewayError::InvalidAmount);
            }

            let (fee, merchant_amount) = split_fee(amount, gw.state.fee_bps)?;
            let swapped = merchant.needs_swap(&asset);
            let amount_out = if swapped {
                gw.settle_swap(env, call.caller, &merchant, asset, fee, merchant_amount)?
            } else {
                gw.settle_direct(env.ledger, call.caller, &merchant, asset, fee, merchant_amount)?;
                merchant_amount
            };

            info!(
                payer = %call.caller,
                merchant = %merchant_owner,
                %asset,
                %amount,
                %fee,
                swapped,
                "payment processed"
            );
            gw.emit(Event::PaymentProcessed {
                payer: call.caller,
                merchant: merchant_owner,
                amount,
                fee,
                token: asset,
                swapped,
            });

            Ok(PaymentReceipt {
                fee,
                merchant_amount,
                swapped,
                amount_out,
            })
        })
    }

    /// Moves `amount` of `asset` from the payer (or, for native, from the
    /// value already held by the gateway) to `to`.
    fn collect(&self, ledger: &mut Ledger, payer: Address, asset: Address, to: Address, amount: U256) -> GatewayResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let moved = if asset == NATIVE {
            ledger.transfer_native(self.address, to, amount)
        } else {
            ledger.transfer_from(asset, self.address, payer, to, amount)
        };
        if !moved {
            return Err(GatewayError::TransferFailed);
        }
        Ok(())
    }

    fn settle_direct(
        &self,
        ledger: &mut Ledger,
        payer: Address,
        merchant: &Merchant,
        asset: Address,
        fee: U256,
        merchant_amount: U256,
    ) -> GatewayResult<()> {
        self.collect(ledger, payer, asset, self.state.fee_vault, fee)?;
        self.collect(ledger, payer, asset, merchant.wallet, merchant_amount)
    }

    fn settle_swap(
        &mut self,
        env: &mut Env<'_>,
        payer: Address,
        merchant: &Merchant,
        asset: Address,
        fee: U256,
        swap_amount: U256,
    ) -> GatewayResult<U256> {
        let config = self
            .merchants
            .swap_config(&merchant.owner)
            .filter(|c| c.enabled)
            .copied()
            .ok_or(GatewayError::SwapNotAllowed)?;
        // Approval is read now, not when the merchant configured the adapter.
        if config.adapter == Address::ZERO || !self.is_adapter_approved(&config.adapter) {
            return Err(GatewayError::AdapterNotApproved);
        }
        let adapter_address = config.adapter;
        let gateway_address = self.address;

        // The protocol's cut is taken in the paid asset, before conversion.
        self.collect(env.ledger, payer, asset, self.state.fee_vault, fee)?;

        // TODO: derive the floor from `config.slippage_bps` once a price
        // quote source is available.
        let min_amount_out = U256::ZERO;
        let token_out = merchant.settlement_token;
        let recipient = merchant.wallet;

        let adapter = env.adapters.get(&adapter_address).ok_or_else(|| {
            GatewayError::SwapFailed(format!("no adapter deployed at {adapter_address}"))
        })?;

        let amount_out = if asset == NATIVE {
            if !env
                .ledger
                .transfer_native(gateway_address, adapter_address, swap_amount)
            {
                return Err(GatewayError::TransferFailed);
            }
            let mut ctx = SwapContext {
                ledger: &mut *env.ledger,
                gateway: GatewayHandle::new(&mut *self, adapter_address),
                adapter: adapter_address,
                caller: gateway_address,
                value: swap_amount,
            };
            adapter.swap_native_for_tokens(&mut ctx, token_out, min_amount_out, recipient)?
        } else {
            if !env
                .ledger
                .transfer_from(asset, gateway_address, payer, gateway_address, swap_amount)
            {
                return Err(GatewayError::TransferFailed);
            }
            env.ledger
                .approve(asset, gateway_address, adapter_address, swap_amount);

            let mut ctx = SwapContext {
                ledger: &mut *env.ledger,
                gateway: GatewayHandle::new(&mut *self, adapter_address),
                adapter: adapter_address,
                caller: gateway_address,
                value: U256::ZERO,
            };
            let result = if token_out == NATIVE {
                adapter.swap_tokens_for_native(&mut ctx, asset, swap_amount, min_amount_out, recipient)
            } else {
                adapter.swap_tokens_for_tokens(
                    &mut ctx,
                    asset,
                    token_out,
                    swap_amount,
                    min_amount_out,
                    recipient,
                )
            };

            // No standing approval survives the call, whatever it returned.
            env.ledger
                .approve(asset, gateway_address, adapter_address, U256::ZERO);
            result?
        };

        if amount_out < min_amount_out {
            return Err(GatewayError::SlippageExceeded {
                amount_out,
                min_amount_out,
            });
        }
        debug!(adapter = %adapter_address, %swap_amount, %amount_out, "swap settled");
        Ok(amount_out)
    }

    // ------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------

    /// Sets the protocol fee.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `Unauthorized`; `InvalidAmount` above
    /// [`MAX_FEE_BPS`].
    pub fn set_fee(&mut self, caller: Address, new_fee_bps: u16) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.only_admin(caller)?;
            if new_fee_bps > MAX_FEE_BPS {
                return Err(GatewayError::InvalidAmount);
            }
            let old_fee_bps = gw.state.fee_bps;
            gw.state.fee_bps = new_fee_bps;
            info!(old_fee_bps, new_fee_bps, "fee updated");
            gw.emit(Event::FeeUpdated {
                old_fee_bps,
                new_fee_bps,
            });
            Ok(())
        })
    }

    /// Approves or revokes a swap adapter.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `Unauthorized`; `InvalidAdapter` for the zero
    /// address.
    pub fn set_approved_adapter(&mut self, caller: Address, adapter: Address, approved: bool) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.only_admin(caller)?;
            if adapter == Address::ZERO {
                return Err(GatewayError::InvalidAdapter);
            }
            if approved {
                gw.state.approved_adapters.insert(adapter);
            } else {
                gw.state.approved_adapters.remove(&adapter);
            }
            info!(%adapter, approved, "adapter status updated");
            gw.emit(Event::AdapterStatusUpdated { adapter, approved });
            Ok(())
        })
    }

    /// Suspends payments.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `Unauthorized`.
    pub fn pause(&mut self, caller: Address) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.only_admin(caller)?;
            gw.state.paused = true;
            warn!(admin = %caller, "gateway paused");
            gw.emit(Event::Paused { admin: caller });
            Ok(())
        })
    }

    /// Resumes payments.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `Unauthorized`.
    pub fn unpause(&mut self, caller: Address) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.only_admin(caller)?;
            gw.state.paused = false;
            info!(admin = %caller, "gateway unpaused");
            gw.emit(Event::Unpaused { admin: caller });
            Ok(())
        })
    }

    /// Sends `amount` of `asset` held by the gateway to the admin, bypassing
    /// all merchant and fee routing.
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `Unauthorized`; `TransferFailed` if the gateway
    /// cannot cover it.
    pub fn emergency_withdraw(
        &mut self,
        ledger: &mut Ledger,
        caller: Address,
        asset: Address,
        amount: U256,
    ) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.only_admin(caller)?;
            let moved = if asset == NATIVE {
                ledger.transfer_native(gw.address, caller, amount)
            } else {
                ledger.transfer(asset, gw.address, caller, amount)
            };
            if !moved {
                return Err(GatewayError::TransferFailed);
            }
            warn!(admin = %caller, %asset, %amount, "emergency withdrawal");
            gw.emit(Event::EmergencyWithdrawal {
                admin: caller,
                asset,
                amount,
            });
            Ok(())
        })
    }

    /// Nominates `new_admin`; control moves once it calls
    /// [`Self::accept_admin`].
    ///
    /// # Errors
    ///
    /// `ReentrantCall`, `Unauthorized`.
    pub fn propose_admin(&mut self, caller: Address, new_admin: Address) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            gw.only_admin(caller)?;
            gw.state.pending_admin = Some(new_admin);
            info!(admin = %caller, pending_admin = %new_admin, "admin transfer proposed");
            gw.emit(Event::AdminTransferProposed {
                admin: caller,
                pending_admin: new_admin,
            });
            Ok(())
        })
    }

    /// Completes the handover started by [`Self::propose_admin`].
    ///
    /// # Errors
    ///
    /// `ReentrantCall`; `NotPendingAdmin` unless `caller` is the nominee.
    pub fn accept_admin(&mut self, caller: Address) -> GatewayResult<()> {
        self.non_reentrant(|gw| {
            if gw.state.pending_admin != Some(caller) {
                return Err(GatewayError::NotPendingAdmin(caller));
            }
            let old_admin = gw.state.admin;
            gw.state.admin = caller;
            gw.state.pending_admin = None;
            info!(%old_admin, new_admin = %caller, "admin updated");
            gw.emit(Event::AdminUpdated {
                old_admin,
                new_admin: caller,
            });
            Ok(())
        })
    }
}
