use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Contract is paused")]
    Paused,
    #[msg("Unauthorized access")]
    Unauthorized,
    #[msg("Merchant is not registered")]
    MerchantNotRegistered,
    #[msg("Invalid token for this merchant")]
    InvalidToken,
    #[msg("Missing necessary account")]
    MissingAccount,
    #[msg("Invalid merchant wallet provided")]
    InvalidMerchantWallet,
    #[msg("Invalid fee wallet provided")]
    InvalidFeeWallet,
    #[msg("Invalid token account")]
    InvalidTokenAccount,
    #[msg("Insufficient balance")]
    InsufficientBalance,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("Amount must be greater than zero")]
    ZeroAmount,
    #[msg("Minimum payment exceeds maximum payment")]
    AmountRangeInvalid,
    #[msg("Calculation error")]
    CalculationError,
    #[msg("Merchant name too long")]
    NameTooLong,
    #[msg("Accepted token list is full")]
    TooManyTokens,
    #[msg("Swap is not enabled for this merchant")]
    SwapNotAllowed,
    #[msg("Swap adapter is not approved")]
    AdapterNotApproved,
    #[msg("Invalid swap adapter")]
    InvalidAdapter,
    #[msg("Slippage tolerance too high (must be 0-1000)")]
    InvalidSlippage,
    #[msg("Swap output below minimum")]
    SlippageExceeded,
    #[msg("Swap adapter returned no output amount")]
    MissingSwapOutput,
    #[msg("Invalid admin")]
    InvalidAdmin,
    #[msg("Signer is not the pending admin")]
    NotPendingAdmin,
}
