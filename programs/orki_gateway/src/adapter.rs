//! Client side of the swap adapter interface.
//!
//! An adapter is any program exposing three instructions with Anchor-style
//! discriminators:
//!
//! | instruction           | input  | output |
//! |-----------------------|--------|--------|
//! | `swap_sol_to_token`   | SOL    | SPL    |
//! | `swap_token_to_sol`   | SPL    | SOL    |
//! | `swap_token_to_token` | SPL    | SPL    |
//!
//! Instruction data is the discriminator followed by borsh-encoded
//! [`SwapArgs`]. Accounts are `[authority (w), source (w), recipient (w)]`
//! followed by whatever venue accounts the adapter needs. The adapter must
//! deliver at least `min_amount_out` to `recipient` and report the delivered
//! amount as a little-endian `u64` through return data.
//!
//! The gateway never forwards the payer's signature. SOL input is moved to
//! the adapter authority before the call; SPL input is delegated to the
//! adapter authority for exactly `amount_in` and revoked afterwards.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::{get_return_data, invoke};
use crate::constants::NATIVE_MINT;
use crate::errors::ErrorCode;

// sha256("global:<instruction name>")[..8]
pub const SWAP_SOL_TO_TOKEN_DISCRIMINATOR: [u8; 8] = [252, 172, 143, 68, 115, 103, 158, 1];
pub const SWAP_TOKEN_TO_SOL_DISCRIMINATOR: [u8; 8] = [254, 7, 53, 81, 205, 228, 75, 82];
pub const SWAP_TOKEN_TO_TOKEN_DISCRIMINATOR: [u8; 8] = [56, 160, 13, 242, 193, 120, 57, 194];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapArgs {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub amount_in: u64,
    pub min_amount_out: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapKind {
    SolToToken,
    TokenToSol,
    TokenToToken,
}

impl SwapKind {
    /// `None` when input and output are the same asset.
    pub fn for_route(input_mint: &Pubkey, output_mint: &Pubkey) -> Option<Self> {
        if input_mint == output_mint {
            return None;
        }
        Some(match (*input_mint == NATIVE_MINT, *output_mint == NATIVE_MINT) {
            (true, _) => SwapKind::SolToToken,
            (_, true) => SwapKind::TokenToSol,
            _ => SwapKind::TokenToToken,
        })
    }

    pub fn discriminator(self) -> [u8; 8] {
        match self {
            SwapKind::SolToToken => SWAP_SOL_TO_TOKEN_DISCRIMINATOR,
            SwapKind::TokenToSol => SWAP_TOKEN_TO_SOL_DISCRIMINATOR,
            SwapKind::TokenToToken => SWAP_TOKEN_TO_TOKEN_DISCRIMINATOR,
        }
    }
}

/// Layout: [8 discriminator][32 input mint][32 output mint][8 amount in][8 min out]
pub fn swap_instruction_data(kind: SwapKind, args: &SwapArgs) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + 32 + 32 + 8 + 8);
    data.extend_from_slice(&kind.discriminator());
    data.extend_from_slice(args.input_mint.as_ref());
    data.extend_from_slice(args.output_mint.as_ref());
    data.extend_from_slice(&args.amount_in.to_le_bytes());
    data.extend_from_slice(&args.min_amount_out.to_le_bytes());
    data
}

pub struct SwapAccounts<'a, 'info> {
    pub adapter_program: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub source: &'a AccountInfo<'info>,
    pub recipient: &'a AccountInfo<'info>,
    pub venue_accounts: &'a [AccountInfo<'info>],
}

/// Invokes the adapter and returns the output amount it reports.
pub fn invoke_swap(accounts: SwapAccounts<'_, '_>, kind: SwapKind, args: &SwapArgs) -> Result<u64> {
    let adapter_id = *accounts.adapter_program.key;

    // Signer flags are dropped on purpose: the adapter only ever acts
    // through its own authority.
    let mut metas = vec![
        AccountMeta::new(*accounts.authority.key, false),
        AccountMeta::new(*accounts.source.key, false),
        AccountMeta::new(*accounts.recipient.key, false),
    ];
    metas.extend(accounts.venue_accounts.iter().map(|a| {
        if a.is_writable {
            AccountMeta::new(*a.key, false)
        } else {
            AccountMeta::new_readonly(*a.key, false)
        }
    }));

    let ix = Instruction {
        program_id: adapter_id,
        accounts: metas,
        data: swap_instruction_data(kind, args),
    };

    let mut infos = Vec::with_capacity(4 + accounts.venue_accounts.len());
    infos.push(accounts.authority.clone());
    infos.push(accounts.source.clone());
    infos.push(accounts.recipient.clone());
    infos.extend_from_slice(accounts.venue_accounts);
    infos.push(accounts.adapter_program.clone());

    invoke(&ix, &infos)?;

    let (program_id, return_data) = get_return_data().ok_or(ErrorCode::MissingSwapOutput)?;
    require_keys_eq!(program_id, adapter_id, ErrorCode::MissingSwapOutput);
    let amount_out = decode_amount_out(&return_data)?;

    require!(amount_out >= args.min_amount_out, ErrorCode::SlippageExceeded);
    Ok(amount_out)
}

/// Return data arrives with trailing zero bytes stripped.
fn decode_amount_out(return_data: &[u8]) -> Result<u64> {
    require!(return_data.len() <= 8, ErrorCode::MissingSwapOutput);
    let mut bytes = [0u8; 8];
    bytes[..return_data.len()].copy_from_slice(return_data);
    Ok(u64::from_le_bytes(bytes))
}
