//! Account-balance ledger: native balances plus ERC-20 style token
//! balances and allowances.
//!
//! Transfer primitives report success as `bool`, mirroring ERC-20. Callers
//! in this crate check every one of them.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::constants::NATIVE;

/// In-memory balance ledger.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    native: HashMap<Address, U256>,
    tokens: HashMap<(Address, Address), U256>,
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl Ledger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits native currency out of thin air (genesis allocation).
    pub fn fund_native(&mut self, to: Address, amount: U256) {
        let balance = self.native.entry(to).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Mints `amount` of `token` to `to`.
    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        let balance = self.tokens.entry((token, to)).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Native balance of `who`.
    #[must_use]
    pub fn native_balance(&self, who: Address) -> U256 {
        self.native.get(&who).copied().unwrap_or_default()
    }

    /// Token balance of `who`.
    #[must_use]
    pub fn token_balance(&self, token: Address, who: Address) -> U256 {
        self.tokens.get(&(token, who)).copied().unwrap_or_default()
    }

    /// Balance of `who` in `asset`, where [`NATIVE`] selects the native
    /// currency.
    #[must_use]
    pub fn balance_of(&self, asset: Address, who: Address) -> U256 {
        if asset == NATIVE {
            self.native_balance(who)
        } else {
            self.token_balance(asset, who)
        }
    }

    /// Remaining amount `spender` may pull from `owner`.
    #[must_use]
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Moves native currency. Fails on insufficient balance.
    pub fn transfer_native(&mut self, from: Address, to: Address, amount: U256) -> bool {
        let Some(remaining) = self.native_balance(from).checked_sub(amount) else {
            return false;
        };
        self.native.insert(from, remaining);
        self.fund_native(to, amount);
        true
    }

    /// ERC-20 `transfer` executed by `from`.
    pub fn transfer(&mut self, token: Address, from: Address, to: Address, amount: U256) -> bool {
        let Some(remaining) = self.token_balance(token, from).checked_sub(amount) else {
            return false;
        };
        self.tokens.insert((token, from), remaining);
        self.mint(token, to, amount);
        true
    }

    /// ERC-20 `transferFrom` executed by `spender`. Consumes allowance
    /// unless `spender == from`.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> bool {
        if spender != from {
            let Some(left) = self.allowance(token, from, spender).checked_sub(amount) else {
                return false;
            };
            if self.token_balance(token, from) < amount {
                return false;
            }
            self.allowances.insert((token, from, spender), left);
        }
        self.transfer(token, from, to, amount)
    }

    /// ERC-20 `approve` executed by `owner`; overwrites any prior allowance.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) -> bool {
        if amount.is_zero() {
            self.allowances.remove(&(token, owner, spender));
        } else {
            self.allowances.insert((token, owner, spender), amount);
        }
        true
    }
}
