//! Merchant registry: per-owner settlement configuration and swap
//! participation.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::constants::{MAX_ACCEPTED_TOKENS, MAX_SLIPPAGE_BPS};
use crate::error::{GatewayError, GatewayResult};

/// Order-unstable token set with O(1) membership and removal.
///
/// Removal swaps the last entry into the freed slot, so enumeration order
/// changes after a removal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcceptedTokens {
    members: HashSet<Address>,
    list: Vec<Address>,
}

impl AcceptedTokens {
    /// Whether `token` is in the set.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        self.members.contains(token)
    }

    /// Adds `token`; returns `false` if it was already present.
    pub fn insert(&mut self, token: Address) -> bool {
        if !self.members.insert(token) {
            return false;
        }
        self.list.push(token);
        true
    }

    /// Removes `token`; returns `false` if it was absent.
    pub fn remove(&mut self, token: &Address) -> bool {
        if !self.members.remove(token) {
            return false;
        }
        if let Some(index) = self.list.iter().position(|t| t == token) {
            self.list.swap_remove(index);
        }
        true
    }

    /// Enumeration snapshot.
    #[must_use]
    pub fn as_slice(&self) -> &[Address] {
        &self.list
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// A merchant's settlement configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Merchant {
    /// Controlling account.
    pub owner: Address,
    /// Receives settled funds.
    pub wallet: Address,
    /// Asset the merchant wants to hold; [`crate::NATIVE`] for native.
    pub settlement_token: Address,
    /// Convert non-settlement assets through the swap adapter.
    pub swap_enabled: bool,
    /// Existence flag.
    pub registered: bool,
    /// Inclusive lower bound, in paid-asset units.
    pub min_payment: U256,
    /// Inclusive upper bound, in paid-asset units.
    pub max_payment: U256,
    /// Assets accepted besides `settlement_token`.
    pub accepted_tokens: AcceptedTokens,
}

impl Merchant {
    /// Checks the fields shared by registration and update.
    ///
    /// # Errors
    ///
    /// `InvalidWallet`, `ZeroAmount` or `AmountRangeInvalid`, in that order.
    pub fn validate_config(wallet: Address, min_payment: U256, max_payment: U256) -> GatewayResult<()> {
        if wallet == Address::ZERO {
            return Err(GatewayError::InvalidWallet);
        }
        if min_payment.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }
        if min_payment > max_payment {
            return Err(GatewayError::AmountRangeInvalid);
        }
        Ok(())
    }

    /// Whether a payment in `token` is accepted.
    #[must_use]
    pub fn accepts(&self, token: &Address) -> bool {
        *token == self.settlement_token || self.accepted_tokens.contains(token)
    }

    /// Bounds, then whitelist.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` outside `[min_payment, max_payment]`, `InvalidToken`
    /// for an asset that is not accepted.
    pub fn check_payment(&self, token: &Address, amount: U256) -> GatewayResult<()> {
        if amount < self.min_payment || amount > self.max_payment {
            return Err(GatewayError::InvalidAmount);
        }
        if !self.accepts(token) {
            return Err(GatewayError::InvalidToken);
        }
        Ok(())
    }

    /// Whitelisting means "I accept this asset"; swap-enable adds "and
    /// convert it for me". Without the latter the asset settles as paid.
    #[must_use]
    pub fn needs_swap(&self, token: &Address) -> bool {
        *token != self.settlement_token && self.swap_enabled
    }
}

/// Per-merchant swap participation. Kept beside, not inside, [`Merchant`]
/// so disabling swaps does not forget the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapConfig {
    /// Adapter to route conversions through.
    pub adapter: Address,
    /// Merchant-side switch.
    pub enabled: bool,
    /// Slippage tolerance, at most [`MAX_SLIPPAGE_BPS`].
    pub slippage_bps: u16,
}

/// Merchant records keyed by owner.
#[derive(Clone, Debug, Default)]
pub struct MerchantRegistry {
    merchants: HashMap<Address, Merchant>,
    swap_configs: HashMap<Address, SwapConfig>,
}

impl MerchantRegistry {
    /// Registered merchant for `owner`. A record with `registered == false`
    /// is treated as absent.
    #[must_use]
    pub fn get(&self, owner: &Address) -> Option<&Merchant> {
        self.merchants.get(owner).filter(|m| m.registered)
    }

    fn get_mut(&mut self, owner: &Address) -> GatewayResult<&mut Merchant> {
        self.merchants
            .get_mut(owner)
            .filter(|m| m.registered)
            .ok_or(GatewayError::MerchantNotRegistered)
    }

    /// Creates the caller's merchant record.
    ///
    /// # Errors
    ///
    /// `InvalidWallet`, `AlreadyRegistered`, `ZeroAmount`,
    /// `AmountRangeInvalid`.
    pub fn register(
        &mut self,
        caller: Address,
        wallet: Address,
        settlement_token: Address,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<()> {
        if wallet == Address::ZERO {
            return Err(GatewayError::InvalidWallet);
        }
        if self.get(&caller).is_some() {
            return Err(GatewayError::AlreadyRegistered);
        }
        Merchant::validate_config(wallet, min_payment, max_payment)?;

        let merchant = Merchant {
            owner: caller,
            wallet,
            settlement_token,
            swap_enabled: false,
            registered: true,
            min_payment,
            max_payment,
            accepted_tokens: AcceptedTokens::default(),
        };
        self.merchants.insert(caller, merchant);
        Ok(())
    }

    /// Overwrites the caller's mutable fields. The accepted-token set is
    /// kept.
    ///
    /// # Errors
    ///
    /// Same validation as [`Self::register`], plus `MerchantNotRegistered`.
    pub fn update(
        &mut self,
        caller: Address,
        wallet: Address,
        settlement_token: Address,
        swap_enabled: bool,
        min_payment: U256,
        max_payment: U256,
    ) -> GatewayResult<&Merchant> {
        let merchant = self.get_mut(&caller)?;
        Merchant::validate_config(wallet, min_payment, max_payment)?;

        merchant.wallet = wallet;
        merchant.settlement_token = settlement_token;
        merchant.swap_enabled = swap_enabled;
        merchant.min_payment = min_payment;
        merchant.max_payment = max_payment;
        Ok(merchant)
    }

    /// Adds or removes `token` from the caller's accepted set. Repeating an
    /// add or a remove is a no-op.
    ///
    /// # Errors
    ///
    /// `MerchantNotRegistered`; `TooManyTokens` when adding to a full set.
    pub fn set_allowed_token(&mut self, caller: Address, token: Address, allowed: bool) -> GatewayResult<()> {
        let tokens = &mut self.get_mut(&caller)?.accepted_tokens;
        if allowed {
            if !tokens.contains(&token) && tokens.len() >= MAX_ACCEPTED_TOKENS {
                return Err(GatewayError::TooManyTokens);
            }
            tokens.insert(token);
        } else {
            tokens.remove(&token);
        }
        Ok(())
    }

    /// Sets the caller's swap participation.
    ///
    /// # Errors
    ///
    /// `MerchantNotRegistered`, `InvalidSlippage`.
    pub fn set_swap_config(
        &mut self,
        caller: Address,
        adapter: Address,
        enabled: bool,
        slippage_bps: u16,
    ) -> GatewayResult<SwapConfig> {
        self.get_mut(&caller)?;
        if slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(GatewayError::InvalidSlippage);
        }
        let config = SwapConfig {
            adapter,
            enabled,
            slippage_bps,
        };
        self.swap_configs.insert(caller, config);
        Ok(config)
    }

    /// Swap config for `owner`, if one was ever set.
    #[must_use]
    pub fn swap_config(&self, owner: &Address) -> Option<&SwapConfig> {
        self.swap_configs.get(owner)
    }

    /// Enumeration snapshot of `owner`'s accepted tokens; empty when not
    /// registered.
    #[must_use]
    pub fn supported_tokens(&self, owner: &Address) -> Vec<Address> {
        self.get(owner)
            .map(|m| m.accepted_tokens.as_slice().to_vec())
            .unwrap_or_default()
    }
}
