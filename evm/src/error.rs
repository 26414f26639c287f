//! Error types for the ledger gateway.
//!
//! Every failure aborts the whole transaction; [`crate::Chain`] restores the
//! pre-call snapshot before handing the error back. [`GatewayError::kind`]
//! groups the variants into the coarse categories off-chain clients act on.

use alloy_primitives::Address;

/// Reason a gateway call reverted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Payments are suspended by the admin.
    #[error("gateway is paused")]
    Paused,
    /// Caller failed an admin or merchant-owner check.
    #[error("caller is not authorized")]
    Unauthorized,
    /// No registered merchant for the given owner.
    #[error("merchant is not registered")]
    MerchantNotRegistered,
    /// The caller already owns a merchant record.
    #[error("merchant is already registered")]
    AlreadyRegistered,
    /// Settlement wallet is the zero address.
    #[error("invalid settlement wallet")]
    InvalidWallet,
    /// Fee vault is the zero address.
    #[error("invalid fee vault")]
    InvalidFeeVault,
    /// Minimum payment is zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,
    /// Minimum payment exceeds maximum payment.
    #[error("minimum payment exceeds maximum payment")]
    AmountRangeInvalid,
    /// Amount outside the merchant's bounds, attached value mismatch, or fee
    /// above the ceiling.
    #[error("invalid amount")]
    InvalidAmount,
    /// Asset is neither the settlement asset nor whitelisted.
    #[error("token not accepted by merchant")]
    InvalidToken,
    /// Merchant's accepted-token list is full.
    #[error("accepted token list is full")]
    TooManyTokens,
    /// Swap settlement was required but the merchant's swap config is
    /// missing or disabled.
    #[error("swap is not enabled for this merchant")]
    SwapNotAllowed,
    /// Configured adapter is unset or not approved by the admin.
    #[error("swap adapter is not approved")]
    AdapterNotApproved,
    /// Zero address passed as an adapter.
    #[error("invalid swap adapter")]
    InvalidAdapter,
    /// Slippage tolerance above the ceiling.
    #[error("slippage tolerance too high")]
    InvalidSlippage,
    /// Adapter delivered less than the requested minimum.
    #[error("swap output {amount_out} below minimum {min_amount_out}")]
    SlippageExceeded {
        /// Reported output.
        amount_out: alloy_primitives::U256,
        /// Requested floor.
        min_amount_out: alloy_primitives::U256,
    },
    /// Adapter call failed.
    #[error("swap failed: {0}")]
    SwapFailed(String),
    /// Fee arithmetic overflowed.
    #[error("fee calculation overflowed")]
    CalculationError,
    /// A ledger transfer primitive reported failure.
    #[error("transfer failed")]
    TransferFailed,
    /// Caller cannot cover the value attached to the transaction.
    #[error("insufficient funds for attached value")]
    InsufficientFunds,
    /// A guarded entry point was re-entered during an outer call.
    #[error("reentrant call")]
    ReentrantCall,
    /// Caller is not the proposed admin.
    #[error("{0} is not the pending admin")]
    NotPendingAdmin(Address),
}

/// Coarse error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Merchant absent.
    NotFound,
    /// Identity or ownership check failed.
    Unauthorized,
    /// Zero addresses, inverted ranges, zero amounts, ceilings exceeded.
    InvalidConfiguration,
    /// Amount below min or above max.
    OutOfRange,
    /// Asset not whitelisted for the merchant.
    AssetNotAccepted,
    /// Swap disabled, no adapter, or adapter not approved.
    SwapUnavailable,
    /// Adapter output below the floor or adapter failure.
    SwapFailure,
    /// Underlying asset move failed.
    TransferFailure,
    /// Duplicate registration.
    AlreadyExists,
    /// Gateway paused.
    SystemPaused,
    /// Nested entry during an outer call.
    Reentrancy,
}

impl GatewayError {
    /// Category of this error.
    ///
    /// `InvalidAmount` is shared by bounds violations, attached-value
    /// mismatches and the fee ceiling; all report [`ErrorKind::OutOfRange`].
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Paused => ErrorKind::SystemPaused,
            Self::Unauthorized | Self::NotPendingAdmin(_) => ErrorKind::Unauthorized,
            Self::MerchantNotRegistered => ErrorKind::NotFound,
            Self::AlreadyRegistered => ErrorKind::AlreadyExists,
            Self::InvalidWallet
            | Self::InvalidFeeVault
            | Self::ZeroAmount
            | Self::AmountRangeInvalid
            | Self::InvalidAdapter
            | Self::InvalidSlippage
            | Self::TooManyTokens => ErrorKind::InvalidConfiguration,
            Self::InvalidAmount | Self::CalculationError => ErrorKind::OutOfRange,
            Self::InvalidToken => ErrorKind::AssetNotAccepted,
            Self::SwapNotAllowed | Self::AdapterNotApproved => ErrorKind::SwapUnavailable,
            Self::SlippageExceeded { .. } | Self::SwapFailed(_) => ErrorKind::SwapFailure,
            Self::TransferFailed | Self::InsufficientFunds => ErrorKind::TransferFailure,
            Self::ReentrantCall => ErrorKind::Reentrancy,
        }
    }
}

/// Result alias used throughout the crate.
pub type GatewayResult<T> = Result<T, GatewayError>;
