use anchor_lang::prelude::*;
use crate::constants::{MAX_ACCEPTED_TOKENS, NATIVE_MINT};
use crate::errors::ErrorCode;

#[account]
#[derive(InitSpace, Debug)]
pub struct Merchant {
    pub owner: Pubkey,
    pub settlement_wallet: Pubkey,
    /// `NATIVE_MINT` settles in SOL.
    pub settlement_token: Pubkey,
    pub swap_enabled: bool,
    /// Inclusive bounds, in units of the paid asset.
    pub min_payment: u64,
    pub max_payment: u64,
    /// Assets accepted in addition to `settlement_token`. Order is not
    /// meaningful: removal swaps the last entry into the freed slot.
    #[max_len(16)]
    pub accepted_tokens: Vec<Pubkey>,
    #[max_len(32)]
    pub name: String,
    pub bump: u8,
}

impl Merchant {
    pub fn validate_config(settlement_wallet: &Pubkey, min_payment: u64, max_payment: u64) -> Result<()> {
        require!(
            *settlement_wallet != Pubkey::default(),
            ErrorCode::InvalidMerchantWallet
        );
        require!(min_payment > 0, ErrorCode::ZeroAmount);
        require!(min_payment <= max_payment, ErrorCode::AmountRangeInvalid);
        Ok(())
    }

    /// Reads a merchant record from an account that may not exist yet.
    /// An unallocated account is "not registered", not an error.
    pub fn try_load(info: &AccountInfo) -> Result<Option<Merchant>> {
        if info.owner != &crate::ID || info.data_is_empty() {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        Merchant::try_deserialize(&mut &data[..]).map(Some)
    }

    /// A loaded record that `signer` may modify.
    pub fn owned_by(merchant: Option<Merchant>, signer: &Pubkey) -> Result<Merchant> {
        let merchant = merchant.ok_or(ErrorCode::MerchantNotRegistered)?;
        require_keys_eq!(merchant.owner, *signer, ErrorCode::Unauthorized);
        Ok(merchant)
    }

    /// Writes the record back over an account `try_load` returned it from.
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        require_keys_eq!(*info.owner, crate::ID, ErrorCode::MerchantNotRegistered);
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }

    pub fn accepts(&self, token: &Pubkey) -> bool {
        *token == self.settlement_token || self.accepted_tokens.contains(token)
    }

    /// Adding a present token or removing an absent one is a no-op.
    pub fn set_token_allowed(&mut self, token: Pubkey, allowed: bool) -> Result<()> {
        let position = self.accepted_tokens.iter().position(|t| *t == token);
        match (allowed, position) {
            (true, None) => {
                require!(
                    self.accepted_tokens.len() < MAX_ACCEPTED_TOKENS,
                    ErrorCode::TooManyTokens
                );
                self.accepted_tokens.push(token);
            }
            (false, Some(index)) => {
                self.accepted_tokens.swap_remove(index);
            }
            _ => {}
        }
        Ok(())
    }

    /// Bounds first, then the whitelist.
    pub fn validate_payment(&self, token: &Pubkey, amount: u64) -> Result<()> {
        require!(
            amount >= self.min_payment && amount <= self.max_payment,
            ErrorCode::InvalidAmount
        );
        require!(self.accepts(token), ErrorCode::InvalidToken);
        Ok(())
    }

    /// A whitelisted asset other than the settlement asset is converted only
    /// when the merchant opted into swaps; otherwise it settles as paid.
    pub fn needs_swap(&self, token: &Pubkey) -> bool {
        *token != self.settlement_token && self.swap_enabled
    }

    pub fn settles_native(&self) -> bool {
        self.settlement_token == NATIVE_MINT
    }
}
