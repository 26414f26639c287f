//! Orki payment gateway for account-balance chains.
//!
//! This crate models the gateway contract deployed on EVM networks as a
//! deterministic state machine over an in-memory [`Ledger`] of native and
//! ERC-20 balances. A payer sends native currency or a token to a registered
//! merchant; the gateway skims the protocol fee into the [`FeeVault`] and
//! either forwards the remainder in the paid asset or converts it through
//! an admin-approved [`SwapAdapter`] into the merchant's settlement asset.
//!
//! [`Chain`] executes every entry point as an atomic transaction: any error
//! rolls the ledger and gateway back to their pre-call state.
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use orki_gateway_evm::{Chain, GatewayConfig, NATIVE};
//!
//! let admin = Address::with_last_byte(1);
//! let merchant = Address::with_last_byte(2);
//! let payer = Address::with_last_byte(3);
//! let vault = Address::with_last_byte(0xfe);
//!
//! let mut chain = Chain::new(
//!     Address::with_last_byte(0xee),
//!     GatewayConfig { admin, fee_vault: vault, fee_bps: 100 },
//! )
//! .unwrap();
//! chain
//!     .register_merchant(merchant, merchant, NATIVE, U256::from(1), U256::from(1_000_000))
//!     .unwrap();
//!
//! chain.ledger.fund_native(payer, U256::from(10_000));
//! let receipt = chain
//!     .process_payment(payer, U256::from(10_000), merchant, NATIVE, U256::from(10_000))
//!     .unwrap();
//!
//! assert_eq!(receipt.fee, U256::from(100));
//! assert_eq!(chain.ledger.native_balance(merchant), U256::from(9_900));
//! assert_eq!(chain.ledger.native_balance(vault), U256::from(100));
//! ```

pub mod adapter;
pub mod constants;
pub mod error;
pub mod events;
pub mod executor;
pub mod fee_vault;
pub mod gateway;
pub mod ledger;
pub mod merchant;

pub use adapter::{AdapterRegistry, GatewayHandle, SwapAdapter, SwapContext};
pub use constants::NATIVE;
pub use error::{ErrorKind, GatewayError, GatewayResult};
pub use events::Event;
pub use executor::Chain;
pub use fee_vault::FeeVault;
pub use gateway::{split_fee, Call, Env, Gateway, GatewayConfig, GlobalState, PaymentReceipt};
pub use ledger::Ledger;
pub use merchant::{Merchant, MerchantRegistry, SwapConfig};
