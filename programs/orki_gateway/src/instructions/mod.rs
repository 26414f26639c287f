pub mod initialize;
pub mod register_merchant;
pub mod update_merchant;
pub mod merchant_tokens;
pub mod swap_config;
pub mod admin;
pub mod process_payment;

pub use initialize::*;
pub use register_merchant::*;
pub use update_merchant::*;
pub use merchant_tokens::*;
pub use swap_config::*;
pub use admin::*;
pub use process_payment::*;
