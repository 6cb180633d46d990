//! A thin wrapper around the non-blocking RPC client for funding accounts, sending and confirming
//! transactions, and fetching accounts.

use std::{
    collections::HashSet,
    time::Duration,
};

use anyhow::Context;
use demo_interface::{
    error::DemoError,
    instructions::InstructionTag,
};
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    nonblocking::rpc_client::RpcClient,
    rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    },
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::CommitmentConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction::Instruction;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    account::Account,
    message::Message,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};
use solana_transaction_error::TransactionError;

use crate::{
    config::DEFAULT_RPC_URL,
    logs::{
        fmt_lamports,
        log_error,
        log_info,
        log_success,
        LogColor,
    },
};

/// How many times airdrop confirmation is polled before giving up.
const AIRDROP_CONFIRM_ATTEMPTS: usize = 30;
const AIRDROP_CONFIRM_INTERVAL: Duration = Duration::from_millis(500);

/// Compute unit limit and price instructions prepended when a compute budget is set.
const COMPUTE_BUDGET_IXN_COUNT: usize = 2;

pub struct SendTransactionConfig {
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
    /// Programs whose custom error codes are decoded as [`DemoError`]s on failure.
    pub program_id_filter: HashSet<Pubkey>,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            compute_budget: Default::default(),
            debug_logs: Some(true),
            program_id_filter: HashSet::from([crate::demo_program_id()]),
        }
    }
}

pub struct CustomRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl Default for CustomRpcClient {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl CustomRpcClient {
    /// Creates a client at `url` (devnet if `None`) using `confirmed` commitment.
    pub fn new(url: Option<String>, config: Option<SendTransactionConfig>) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                url.unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
                CommitmentConfig::confirmed(),
            ),
            config: config.unwrap_or_default(),
        }
    }

    /// Requests an airdrop of `lamports` to `pubkey` and waits for it to confirm.
    pub async fn fund_account(&self, pubkey: &Pubkey, lamports: u64) -> anyhow::Result<Signature> {
        let airdrop_signature = self
            .client
            .request_airdrop(pubkey, lamports)
            .await
            .context("Failed to request airdrop")?;

        for _ in 0..AIRDROP_CONFIRM_ATTEMPTS {
            if self
                .client
                .confirm_transaction(&airdrop_signature)
                .await
                .context("Couldn't confirm transaction")?
            {
                return Ok(airdrop_signature);
            }
            tokio::time::sleep(AIRDROP_CONFIRM_INTERVAL).await;
        }

        Err(anyhow::anyhow!(
            "Airdrop {airdrop_signature} of {} wasn't confirmed",
            fmt_lamports(lamports)
        ))
    }

    pub async fn get_balance(&self, pubkey: &Pubkey) -> anyhow::Result<u64> {
        self.client
            .get_balance(pubkey)
            .await
            .with_context(|| format!("Couldn't retrieve the balance of {pubkey}"))
    }

    pub async fn get_account(&self, pubkey: &Pubkey) -> anyhow::Result<Account> {
        self.client
            .get_account(pubkey)
            .await
            .with_context(|| format!("Couldn't fetch account {pubkey}"))
    }

    pub async fn send_single_signer(
        &self,
        signer: &Keypair,
        instructions: impl AsRef<[Instruction]>,
    ) -> anyhow::Result<Signature> {
        self.send_and_confirm_txn(signer, &[], instructions.as_ref())
            .await
    }

    /// Signs with `payer` and any extra `signers`, sends, and waits for confirmation.
    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        let bh = self
            .client
            .get_latest_blockhash()
            .await
            .context("Couldn't get the latest blockhash")?;

        let SendTransactionConfig {
            compute_budget,
            debug_logs,
            ref program_id_filter,
        } = self.config;

        let msg = Message::new(
            &[
                compute_budget.map_or(vec![], |budget| {
                    vec![
                        ComputeBudgetInstruction::set_compute_unit_limit(budget),
                        ComputeBudgetInstruction::set_compute_unit_price(1),
                    ]
                }),
                instructions.to_vec(),
            ]
            .concat(),
            Some(&payer.pubkey()),
        );

        // Dedup so the payer can also appear in `signers`.
        let mut all_signers: Vec<&Keypair> = vec![payer];
        for signer in signers {
            if !all_signers.iter().any(|s| s.pubkey() == signer.pubkey()) {
                all_signers.push(*signer);
            }
        }

        let mut tx = Transaction::new_unsigned(msg);
        tx.try_sign(&all_signers, bh)
            .context("Failed to sign transaction")?;

        match self.client.send_and_confirm_transaction(&tx).await {
            Ok(sig) => {
                if matches!(debug_logs, Some(true)) {
                    use colored::Colorize;
                    let sender_info =
                        format!("{}: {}", "sender".color(LogColor::Gray), payer.pubkey());
                    log_success("Signature", format!("{sig}\n{sender_info}"));
                }
                Ok(sig)
            }
            Err(error) => {
                log_instruction_error(
                    &error,
                    instructions,
                    compute_budget.is_some(),
                    program_id_filter,
                );
                log_info("Payer", payer.pubkey());

                Err(error).context("Failed transaction submission")
            }
        }
    }
}

/// What a failed send was rejected for, as far as it can be attributed to a sent instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendFailure {
    /// A demo program instruction returned a custom error code. `error` is `None` for codes that
    /// aren't a [`DemoError`].
    Demo {
        tag: InstructionTag,
        code: u32,
        error: Option<DemoError>,
    },
    Instruction(InstructionError),
    Transaction(TransactionError),
    /// Not a preflight failure, e.g. a connection error.
    Client,
}

/// Attributes a failed send to one of `instructions`.
///
/// `prefixed` must be true when compute budget instructions were prepended to `instructions`,
/// since the error's instruction index counts those too.
pub fn classify_send_failure(
    error: &ClientError,
    instructions: &[Instruction],
    prefixed: bool,
    program_id_filter: &HashSet<Pubkey>,
) -> SendFailure {
    let Some(preflight) = preflight_failure(error) else {
        return SendFailure::Client;
    };
    let Some(ui_err) = &preflight.err else {
        return SendFailure::Client;
    };

    let (ixn_idx, ixn_error) = match TransactionError::from(ui_err.clone()) {
        TransactionError::InstructionError(ixn_idx, ixn_error) => (ixn_idx, ixn_error),
        transaction_error => return SendFailure::Transaction(transaction_error),
    };

    let offset = if prefixed { COMPUTE_BUDGET_IXN_COUNT } else { 0 };
    let Some(instruction) = (ixn_idx as usize)
        .checked_sub(offset)
        .and_then(|idx| instructions.get(idx))
    else {
        return SendFailure::Instruction(ixn_error);
    };

    let tag = instruction
        .data
        .first()
        .and_then(|tag| InstructionTag::try_from(*tag).ok());

    match (ixn_error, tag) {
        (InstructionError::Custom(code), Some(tag))
            if program_id_filter.contains(&instruction.program_id) =>
        {
            SendFailure::Demo {
                tag,
                code,
                error: u8::try_from(code).ok().and_then(DemoError::from_repr),
            }
        }
        (ixn_error, _) => SendFailure::Instruction(ixn_error),
    }
}

fn preflight_failure(error: &ClientError) -> Option<&RpcSimulateTransactionResult> {
    match error.kind() {
        ClientErrorKind::RpcError(RpcResponseError {
            data: RpcResponseErrorData::SendTransactionPreflightFailure(result),
            ..
        }) => Some(result),
        _ => None,
    }
}

/// Logs the program logs and the failing instruction of a failed send, decoding demo program
/// custom errors.
pub fn log_instruction_error(
    error: &ClientError,
    instructions: &[Instruction],
    prefixed: bool,
    program_id_filter: &HashSet<Pubkey>,
) {
    if let Some(logs) = preflight_failure(error).and_then(|result| result.logs.as_ref()) {
        for line in logs {
            log_info("Program log", line);
        }
    }

    match classify_send_failure(error, instructions, prefixed, program_id_filter) {
        SendFailure::Demo {
            tag,
            error: Some(demo_error),
            ..
        } => log_error("Demo error", format!("({tag}, {demo_error})")),
        SendFailure::Demo { tag, code, .. } => {
            log_error("Demo error", format!("({tag}, custom error {code})"))
        }
        SendFailure::Instruction(ixn_error) => log_error("Instruction error", ixn_error),
        SendFailure::Transaction(txn_error) => log_error("Transaction error", txn_error),
        SendFailure::Client => log_error("Client error", error),
    }
}

#[cfg(test)]
mod tests {
    use solana_client::rpc_request::RpcError;
    use solana_sdk::pubkey::Pubkey;

    use super::*;
    use crate::instruction_builder::DemoInstructionBuilder;

    fn preflight_error(err: TransactionError) -> ClientError {
        ClientError::from(RpcResponseError {
            code: -32002,
            message: "Transaction simulation failed".to_string(),
            data: RpcResponseErrorData::SendTransactionPreflightFailure(
                RpcSimulateTransactionResult {
                    err: Some(err.into()),
                    logs: Some(vec!["Program log: failed".to_string()]),
                    accounts: None,
                    units_consumed: None,
                    loaded_accounts_data_size: None,
                    return_data: None,
                    inner_instructions: None,
                    replacement_blockhash: None,
                    fee: None,
                    pre_balances: None,
                    post_balances: None,
                    pre_token_balances: None,
                    post_token_balances: None,
                    loaded_addresses: None,
                },
            ),
        })
    }

    fn custom_error(ixn_idx: u8, code: u32) -> ClientError {
        preflight_error(TransactionError::InstructionError(
            ixn_idx,
            InstructionError::Custom(code),
        ))
    }

    fn demo_instructions() -> (Vec<Instruction>, HashSet<Pubkey>) {
        let builder = DemoInstructionBuilder::for_payer(Pubkey::new_unique());
        (
            vec![builder.echo("gm"), builder.donate(10)],
            HashSet::from([crate::demo_program_id()]),
        )
    }

    #[test]
    fn decodes_demo_error_codes() {
        let (instructions, filter) = demo_instructions();
        let code = DemoError::InvalidInstructionDataLength as u32;

        assert_eq!(
            classify_send_failure(&custom_error(1, code), &instructions, false, &filter),
            SendFailure::Demo {
                tag: InstructionTag::Donate,
                code,
                error: Some(DemoError::InvalidInstructionDataLength),
            }
        );
    }

    #[test]
    fn prefixed_index_skips_compute_budget_instructions() {
        let (instructions, filter) = demo_instructions();
        let code = DemoError::InvalidUtf8 as u32;

        assert_eq!(
            classify_send_failure(&custom_error(2, code), &instructions, true, &filter),
            SendFailure::Demo {
                tag: InstructionTag::Echo,
                code,
                error: Some(DemoError::InvalidUtf8),
            }
        );
        // Index 1 is a compute budget instruction.
        assert_eq!(
            classify_send_failure(&custom_error(1, code), &instructions, true, &filter),
            SendFailure::Instruction(InstructionError::Custom(code))
        );
    }

    #[test]
    fn unknown_codes_keep_the_raw_code() {
        let (instructions, filter) = demo_instructions();

        assert_eq!(
            classify_send_failure(&custom_error(0, 6_000), &instructions, false, &filter),
            SendFailure::Demo {
                tag: InstructionTag::Echo,
                code: 6_000,
                error: None,
            }
        );
    }

    #[test]
    fn out_of_range_index_and_unfiltered_programs_are_not_decoded() {
        let (instructions, filter) = demo_instructions();

        assert_eq!(
            classify_send_failure(&custom_error(5, 1), &instructions, false, &filter),
            SendFailure::Instruction(InstructionError::Custom(1))
        );
        assert_eq!(
            classify_send_failure(&custom_error(0, 1), &instructions, false, &HashSet::new()),
            SendFailure::Instruction(InstructionError::Custom(1))
        );
    }

    #[test]
    fn other_failures() {
        let (instructions, filter) = demo_instructions();

        assert_eq!(
            classify_send_failure(
                &preflight_error(TransactionError::BlockhashNotFound),
                &instructions,
                false,
                &filter
            ),
            SendFailure::Transaction(TransactionError::BlockhashNotFound)
        );
        assert_eq!(
            classify_send_failure(
                &ClientError::from(RpcError::ForUser("offline".to_string())),
                &instructions,
                false,
                &filter
            ),
            SendFailure::Client
        );
    }
}
