#![allow(dead_code)]

use anchor_lang::solana_program::account_info::AccountInfo;
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::{invoke_signed, set_return_data};
use anchor_lang::solana_program::program_error::ProgramError;
use anchor_lang::{AccountDeserialize, AnchorDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::token::{spl_token, TokenAccount};
use orki_gateway::adapter::SwapArgs;
use orki_gateway::constants::{
    ADAPTER_SEED, GLOBAL_STATE_SEED, MERCHANT_SEED, NATIVE_MINT, PAYMENT_SEED, SWAP_CONFIG_SEED,
};
use orki_gateway::errors::ErrorCode;
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::instruction::InstructionError;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_instruction;
use solana_sdk::transaction::{Transaction, TransactionError};

pub const MERCHANT_NAME: &str = "coffee";
pub const FEE_BPS: u16 = 100;

const MINT_LEN: u64 = 82;
const TOKEN_ACCOUNT_LEN: u64 = 165;

pub const ADAPTER_ID: Pubkey = Pubkey::new_from_array([7; 32]);
const ADAPTER_AUTHORITY_SEED: &[u8] = b"authority";

fn gateway_entry(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    // Anchor's entry ties the slice lifetime to the account infos.
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    orki_gateway::entry(program_id, accounts, data)
}

pub fn adapter_authority() -> Pubkey {
    Pubkey::find_program_address(&[ADAPTER_AUTHORITY_SEED], &ADAPTER_ID).0
}

/// One-for-one token adapter. Pulls the input into a reserve and pays the
/// output from another, both owned by its authority PDA.
///
/// Venue accounts: `[input reserve (w), output reserve (w), token program]`.
fn one_for_one_adapter(_program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    let [authority, source, recipient, input_reserve, output_reserve, token_program, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };
    let args = data
        .get(8..)
        .and_then(|mut rest| SwapArgs::deserialize(&mut rest).ok())
        .ok_or(ProgramError::InvalidInstructionData)?;

    let (_, bump) = Pubkey::find_program_address(&[ADAPTER_AUTHORITY_SEED], &ADAPTER_ID);
    let seeds: &[&[u8]] = &[ADAPTER_AUTHORITY_SEED, &[bump]];

    let pull = spl_token::instruction::transfer(
        token_program.key,
        source.key,
        input_reserve.key,
        authority.key,
        &[],
        args.amount_in,
    )?;
    invoke_signed(
        &pull,
        &[source.clone(), input_reserve.clone(), authority.clone(), token_program.clone()],
        &[seeds],
    )?;

    let pay = spl_token::instruction::transfer(
        token_program.key,
        output_reserve.key,
        recipient.key,
        authority.key,
        &[],
        args.amount_in,
    )?;
    invoke_signed(
        &pay,
        &[output_reserve.clone(), recipient.clone(), authority.clone(), token_program.clone()],
        &[seeds],
    )?;

    set_return_data(&args.amount_in.to_le_bytes());
    Ok(())
}

/// A running bank with the gateway initialized at [`FEE_BPS`].
pub struct Harness {
    pub ctx: ProgramTestContext,
    pub admin: Keypair,
    pub fee_wallet: Pubkey,
}

impl Harness {
    pub async fn start() -> Self {
        let mut program_test = ProgramTest::new("orki_gateway", orki_gateway::ID, processor!(gateway_entry));
        program_test.add_program("one_for_one_adapter", ADAPTER_ID, processor!(one_for_one_adapter));
        program_test.prefer_bpf(false);

        let ctx = program_test.start_with_context().await;
        let mut harness = Self {
            ctx,
            admin: Keypair::new(),
            fee_wallet: Pubkey::new_unique(),
        };
        let admin = harness.admin.pubkey();
        harness.airdrop(&admin, 10 * LAMPORTS_PER_SOL).await;

        let ix = gateway_ix(
            orki_gateway::accounts::Initialize {
                global_state: global_state_pda(),
                admin,
                system_program: anchor_lang::system_program::ID,
            },
            orki_gateway::instruction::Initialize {
                fee_bps: FEE_BPS,
                fee_wallet: harness.fee_wallet,
            },
        );
        let signer = harness.admin.insecure_clone();
        harness.send(&[ix], &[&signer]).await.unwrap();
        harness
    }

    /// Signs with the context payer (fee payer) plus `signers`.
    pub async fn send(&mut self, ixs: &[Instruction], signers: &[&Keypair]) -> Result<(), BanksClientError> {
        let mut all: Vec<&Keypair> = vec![&self.ctx.payer];
        all.extend_from_slice(signers);
        let tx = Transaction::new_signed_with_payer(
            ixs,
            Some(&self.ctx.payer.pubkey()),
            &all,
            self.ctx.last_blockhash,
        );
        self.ctx.banks_client.process_transaction(tx).await
    }

    /// Moves to a fresh blockhash so an identical transaction is not
    /// deduplicated by the bank.
    pub async fn next_blockhash(&mut self) {
        self.ctx.get_new_latest_blockhash().await.unwrap();
    }

    pub async fn airdrop(&mut self, to: &Pubkey, lamports: u64) {
        let ix = system_instruction::transfer(&self.ctx.payer.pubkey(), to, lamports);
        self.send(&[ix], &[]).await.unwrap();
    }

    pub async fn lamports(&mut self, key: &Pubkey) -> u64 {
        self.ctx.banks_client.get_balance(*key).await.unwrap()
    }

    pub async fn fetch<T: AccountDeserialize>(&mut self, key: &Pubkey) -> T {
        let account = self
            .ctx
            .banks_client
            .get_account(*key)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("no account at {key}"));
        T::try_deserialize(&mut account.data.as_slice()).unwrap()
    }

    pub async fn exists(&mut self, key: &Pubkey) -> bool {
        self.ctx.banks_client.get_account(*key).await.unwrap().is_some()
    }

    pub async fn token_account(&mut self, key: &Pubkey) -> TokenAccount {
        self.fetch(key).await
    }

    /// A mint whose authority is the context payer.
    pub async fn create_mint(&mut self) -> Pubkey {
        let mint = Keypair::new();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let payer = self.ctx.payer.pubkey();
        let ixs = [
            system_instruction::create_account(
                &payer,
                &mint.pubkey(),
                rent.minimum_balance(MINT_LEN as usize),
                MINT_LEN,
                &spl_token::ID,
            ),
            spl_token::instruction::initialize_mint2(&spl_token::ID, &mint.pubkey(), &payer, None, 6).unwrap(),
        ];
        self.send(&ixs, &[&mint]).await.unwrap();
        mint.pubkey()
    }

    pub async fn create_token_account(&mut self, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
        let account = Keypair::new();
        let rent = self.ctx.banks_client.get_rent().await.unwrap();
        let payer = self.ctx.payer.pubkey();
        let ixs = [
            system_instruction::create_account(
                &payer,
                &account.pubkey(),
                rent.minimum_balance(TOKEN_ACCOUNT_LEN as usize),
                TOKEN_ACCOUNT_LEN,
                &spl_token::ID,
            ),
            spl_token::instruction::initialize_account3(&spl_token::ID, &account.pubkey(), mint, owner).unwrap(),
        ];
        self.send(&ixs, &[&account]).await.unwrap();
        account.pubkey()
    }

    pub async fn mint_to(&mut self, mint: &Pubkey, to: &Pubkey, amount: u64) {
        let payer = self.ctx.payer.pubkey();
        let ix = spl_token::instruction::mint_to(&spl_token::ID, mint, to, &payer, &[], amount).unwrap();
        self.send(&[ix], &[]).await.unwrap();
    }

    /// Registers `owner`'s [`MERCHANT_NAME`] merchant with bounds
    /// `1..=u64::MAX / 2`.
    pub async fn register_merchant(&mut self, owner: &Keypair, wallet: Pubkey, settlement_token: Pubkey) {
        let ix = gateway_ix(
            orki_gateway::accounts::RegisterMerchant {
                merchant: merchant_pda(&owner.pubkey()),
                owner: owner.pubkey(),
                system_program: anchor_lang::system_program::ID,
            },
            orki_gateway::instruction::RegisterMerchant {
                name: MERCHANT_NAME.to_string(),
                settlement_wallet: wallet,
                settlement_token,
                min_payment: 1,
                max_payment: u64::MAX / 2,
            },
        );
        self.send(&[ix], &[owner]).await.unwrap();
    }

    pub async fn set_paused(&mut self, paused: bool) -> Result<(), BanksClientError> {
        let accounts = orki_gateway::accounts::AdminAuth {
            global_state: global_state_pda(),
            admin: self.admin.pubkey(),
        };
        let ix = if paused {
            gateway_ix(accounts, orki_gateway::instruction::Pause {})
        } else {
            gateway_ix(accounts, orki_gateway::instruction::Unpause {})
        };
        let admin = self.admin.insecure_clone();
        self.send(&[ix], &[&admin]).await
    }

    /// Approves [`ADAPTER_ID`] and turns swaps on for `owner`'s merchant.
    pub async fn enable_swaps(&mut self, owner: &Keypair, wallet: Pubkey, settlement_token: Pubkey, accepted: Pubkey) {
        let admin = self.admin.insecure_clone();
        let merchant = merchant_pda(&owner.pubkey());
        let approve = gateway_ix(
            orki_gateway::accounts::SetApprovedAdapter {
                global_state: global_state_pda(),
                adapter_approval: adapter_approval_pda(&ADAPTER_ID),
                admin: admin.pubkey(),
                system_program: anchor_lang::system_program::ID,
            },
            orki_gateway::instruction::SetApprovedAdapter {
                adapter: ADAPTER_ID,
                approved: true,
            },
        );
        self.send(&[approve], &[&admin]).await.unwrap();

        let merchant_ixs = [
            set_allowed_token_ix(&owner.pubkey(), accepted, true),
            gateway_ix(
                orki_gateway::accounts::SetSwapConfig {
                    merchant,
                    swap_config: swap_config_pda(&merchant),
                    owner: owner.pubkey(),
                    system_program: anchor_lang::system_program::ID,
                },
                orki_gateway::instruction::SetSwapConfig {
                    name: MERCHANT_NAME.to_string(),
                    adapter: ADAPTER_ID,
                    enabled: true,
                    slippage_bps: 50,
                },
            ),
            update_merchant_ix(&owner.pubkey(), wallet, settlement_token, true),
        ];
        self.send(&merchant_ixs, &[owner]).await.unwrap();
    }
}

pub fn gateway_ix(accounts: impl ToAccountMetas, data: impl InstructionData) -> Instruction {
    Instruction {
        program_id: orki_gateway::ID,
        accounts: accounts.to_account_metas(None),
        data: data.data(),
    }
}

pub fn update_merchant_ix(owner: &Pubkey, wallet: Pubkey, settlement_token: Pubkey, swap_enabled: bool) -> Instruction {
    gateway_ix(
        orki_gateway::accounts::UpdateMerchant {
            merchant: merchant_pda(owner),
            owner: *owner,
        },
        orki_gateway::instruction::UpdateMerchant {
            name: MERCHANT_NAME.to_string(),
            settlement_wallet: wallet,
            settlement_token,
            swap_enabled,
            min_payment: 1,
            max_payment: u64::MAX / 2,
        },
    )
}

pub fn set_allowed_token_ix(owner: &Pubkey, token: Pubkey, allowed: bool) -> Instruction {
    gateway_ix(
        orki_gateway::accounts::UpdateMerchant {
            merchant: merchant_pda(owner),
            owner: *owner,
        },
        orki_gateway::instruction::SetAllowedToken {
            name: MERCHANT_NAME.to_string(),
            token,
            allowed,
        },
    )
}

pub fn global_state_pda() -> Pubkey {
    Pubkey::find_program_address(&[GLOBAL_STATE_SEED], &orki_gateway::ID).0
}

pub fn merchant_pda(owner: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[MERCHANT_SEED, owner.as_ref(), MERCHANT_NAME.as_bytes()],
        &orki_gateway::ID,
    )
    .0
}

pub fn payment_pda(payer: &Pubkey, payment_id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[PAYMENT_SEED, payer.as_ref(), &payment_id.to_le_bytes()],
        &orki_gateway::ID,
    )
    .0
}

pub fn swap_config_pda(merchant: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[SWAP_CONFIG_SEED, merchant.as_ref()], &orki_gateway::ID).0
}

pub fn adapter_approval_pda(adapter: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[ADAPTER_SEED, adapter.as_ref()], &orki_gateway::ID).0
}

/// Accounts for one `process_payment`; SPL and swap slots start empty.
pub struct PaymentRequest {
    pub payer: Pubkey,
    pub merchant_owner: Pubkey,
    pub merchant_wallet: Pubkey,
    pub fee_wallet: Pubkey,
    pub token: Pubkey,
    pub amount: u64,
    pub payment_id: u64,
    pub mint: Option<Pubkey>,
    pub payer_token_account: Option<Pubkey>,
    pub merchant_token_account: Option<Pubkey>,
    pub fee_token_account: Option<Pubkey>,
    pub swap: Option<SwapLeg>,
}

/// The swap half of a payment routed through [`ADAPTER_ID`].
pub struct SwapLeg {
    pub settlement_token_account: Pubkey,
    pub input_reserve: Pubkey,
    pub output_reserve: Pubkey,
}

impl PaymentRequest {
    pub fn native(payer: Pubkey, merchant_owner: Pubkey, merchant_wallet: Pubkey, fee_wallet: Pubkey, amount: u64, payment_id: u64) -> Self {
        Self {
            payer,
            merchant_owner,
            merchant_wallet,
            fee_wallet,
            token: NATIVE_MINT,
            amount,
            payment_id,
            mint: None,
            payer_token_account: None,
            merchant_token_account: None,
            fee_token_account: None,
            swap: None,
        }
    }

    pub fn instruction(&self) -> Instruction {
        let merchant = merchant_pda(&self.merchant_owner);
        let spl = self.mint.is_some();
        let accounts = orki_gateway::accounts::ProcessPayment {
            global_state: global_state_pda(),
            merchant,
            payer: self.payer,
            merchant_wallet: self.merchant_wallet,
            fee_wallet: self.fee_wallet,
            payment_history: payment_pda(&self.payer, self.payment_id),
            system_program: anchor_lang::system_program::ID,
            token_program: spl.then_some(spl_token::ID),
            mint: self.mint,
            payer_token_account: self.payer_token_account,
            merchant_token_account: self.merchant_token_account,
            fee_token_account: self.fee_token_account,
            swap_config: self.swap.as_ref().map(|_| swap_config_pda(&merchant)),
            adapter_approval: self.swap.as_ref().map(|_| adapter_approval_pda(&ADAPTER_ID)),
            adapter_program: self.swap.as_ref().map(|_| ADAPTER_ID),
            adapter_authority: self.swap.as_ref().map(|_| adapter_authority()),
            settlement_token_account: self.swap.as_ref().map(|s| s.settlement_token_account),
        };
        let mut ix = gateway_ix(
            accounts,
            orki_gateway::instruction::ProcessPayment {
                merchant_owner: self.merchant_owner,
                name: MERCHANT_NAME.to_string(),
                token: self.token,
                amount: self.amount,
                payment_id: self.payment_id,
            },
        );
        if let Some(swap) = &self.swap {
            ix.accounts.extend([
                AccountMeta::new(swap.input_reserve, false),
                AccountMeta::new(swap.output_reserve, false),
                AccountMeta::new_readonly(spl_token::ID, false),
            ]);
        }
        ix
    }
}

/// The program error code a failed transaction carries, if any.
pub fn custom_code(err: &BanksClientError) -> Option<u32> {
    match err.unwrap() {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(code),
        _ => None,
    }
}

pub fn assert_gateway_error(result: Result<(), BanksClientError>, expected: ErrorCode) {
    match result {
        Err(err) => assert_eq!(
            custom_code(&err),
            Some(u32::from(expected)),
            "expected {expected:?}, got {err:?}"
        ),
        Ok(()) => panic!("expected {expected:?}, transaction succeeded"),
    }
}
