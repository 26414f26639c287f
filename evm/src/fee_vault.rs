//! Passive custody for protocol fees.
//!
//! The vault is just an address on the ledger: anyone can deposit by
//! transferring to it, and only its owner can move funds out.

use alloy_primitives::{Address, U256};
use tracing::info;

use crate::constants::NATIVE;
use crate::error::{GatewayError, GatewayResult};
use crate::ledger::Ledger;

/// Fee vault bound to a ledger address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeVault {
    address: Address,
    owner: Address,
}

impl FeeVault {
    /// Creates a vault at `address` controlled by `owner`.
    #[must_use]
    pub const fn new(address: Address, owner: Address) -> Self {
        Self { address, owner }
    }

    /// Ledger address fees are sent to.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Account allowed to withdraw.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Vault holdings in `asset`.
    #[must_use]
    pub fn balance(&self, ledger: &Ledger, asset: Address) -> U256 {
        ledger.balance_of(asset, self.address)
    }

    /// Moves `amount` of `asset` from the vault to `to`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the owner; `TransferFailed` if the
    /// vault cannot cover `amount`.
    pub fn withdraw(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        asset: Address,
        to: Address,
        amount: U256,
    ) -> GatewayResult<()> {
        if caller != self.owner {
            return Err(GatewayError::Unauthorized);
        }
        let moved = if asset == NATIVE {
            ledger.transfer_native(self.address, to, amount)
        } else {
            ledger.transfer(asset, self.address, to, amount)
        };
        if !moved {
            return Err(GatewayError::TransferFailed);
        }
        info!(vault = %self.address, %asset, %to, %amount, "fee vault withdrawal");
        Ok(())
    }

    /// Hands control of the vault to `new_owner`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless `caller` is the owner.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> GatewayResult<()> {
        if caller != self.owner {
            return Err(GatewayError::Unauthorized);
        }
        self.owner = new_owner;
        Ok(())
    }
}
