pub mod adapter_approval;
pub mod global_state;
pub mod merchant;
pub mod payment;
pub mod swap_config;

pub use adapter_approval::*;
pub use global_state::*;
pub use merchant::*;
pub use payment::*;
pub use swap_config::*;
