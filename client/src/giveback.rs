//! Returns leftover lamports from every funded test keypair to a fixed address at the end of a
//! run. Failure here never propagates: the keypairs are dumped to disk so the funds can be
//! returned by hand.

use std::{
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

use futures::future::try_join_all;
use solana_instruction::Instruction;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
};
use solana_system_interface::instruction::transfer;

use crate::{
    artifacts::dump_keypairs,
    logs::{
        fmt_lamports,
        log_error,
        log_info,
        log_success,
        log_warning,
    },
    transactions::CustomRpcClient,
};

/// The base fee charged per transaction signature.
pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GivebackPlan {
    /// Transfers to the recipient, one per keypair with something to give back.
    pub instructions: Vec<Instruction>,
    /// The signers the transaction needs. The first is the fee payer.
    pub signers: Vec<Pubkey>,
    /// The total lamports that will reach the recipient.
    pub total: u64,
}

/// Plans a single transaction draining each `(pubkey, balance)` into `recipient`.
///
/// Every funded entry signs. The first entry whose balance covers [`LAMPORTS_PER_SIGNATURE`] per
/// signer pays the fees and withholds them; every other entry is drained fully. Returns `None` if
/// there's nothing to give back or no entry can cover the fees.
pub fn plan_giveback(balances: &[(Pubkey, u64)], recipient: &Pubkey) -> Option<GivebackPlan> {
    let mut funded: Vec<(Pubkey, u64)> = Vec::with_capacity(balances.len());
    for (pubkey, balance) in balances {
        if *balance > 0 && !funded.iter().any(|(funded_key, _)| funded_key == pubkey) {
            funded.push((*pubkey, *balance));
        }
    }

    let fee = LAMPORTS_PER_SIGNATURE * funded.len() as u64;
    let payer_idx = funded.iter().position(|(_, balance)| *balance >= fee)?;
    funded[..=payer_idx].rotate_right(1);
    funded[0].1 -= fee;

    let signers: Vec<Pubkey> = funded.iter().map(|(pubkey, _)| *pubkey).collect();
    let transfers: Vec<(Pubkey, u64)> = funded
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .collect();

    if transfers.is_empty() {
        return None;
    }

    Some(GivebackPlan {
        instructions: transfers
            .iter()
            .map(|(from, amount)| transfer(from, recipient, *amount))
            .collect(),
        signers,
        total: transfers.iter().map(|(_, amount)| amount).sum(),
    })
}

#[derive(Debug)]
pub enum GivebackOutcome {
    Returned { signature: Signature, lamports: u64 },
    NothingToReturn,
    /// The giveback failed and the keypairs were written to `path`.
    Dumped { path: PathBuf, reason: String },
    /// The giveback failed and so did writing the dump.
    DumpFailed { reason: String },
}

/// Sends every keypair's balance back to `recipient` within `timeout`. On any failure the
/// keypairs are dumped to `dump_path` instead.
pub async fn give_back(
    rpc: &CustomRpcClient,
    keypairs: &[Keypair],
    recipient: &Pubkey,
    dump_path: &Path,
    timeout: Duration,
) -> GivebackOutcome {
    log_info("Giveback", "Attempting to give back lamports to the system...");

    let result = tokio::time::timeout(timeout, try_give_back(rpc, keypairs, recipient))
        .await
        .unwrap_or_else(|_| Err(anyhow::anyhow!("Timed out after {timeout:?}")));

    match result {
        Ok(Some((signature, lamports))) => {
            log_success("Gave back all lamports to the system 🚀", signature);
            GivebackOutcome::Returned {
                signature,
                lamports,
            }
        }
        Ok(None) => {
            log_info("Giveback", "Nothing to give back after fees");
            GivebackOutcome::NothingToReturn
        }
        Err(e) => {
            let reason = format!("{e:#}");
            log_error("Giveback", &reason);
            log_warning("Giveback", "Could not give back lamports to the system :(");
            if dump_keypairs(dump_path, keypairs) {
                log_warning(
                    "Giveback",
                    format!(
                        "Please manually give back lamports to the system, saved keys data to {}",
                        dump_path.display()
                    ),
                );
                GivebackOutcome::Dumped {
                    path: dump_path.to_path_buf(),
                    reason,
                }
            } else {
                GivebackOutcome::DumpFailed { reason }
            }
        }
    }
}

async fn try_give_back(
    rpc: &CustomRpcClient,
    keypairs: &[Keypair],
    recipient: &Pubkey,
) -> anyhow::Result<Option<(Signature, u64)>> {
    let balances = try_join_all(keypairs.iter().map(|kp| async move {
        rpc.get_balance(&kp.pubkey())
            .await
            .map(|balance| (kp.pubkey(), balance))
    }))
    .await?;

    let Some(plan) = plan_giveback(&balances, recipient) else {
        return Ok(None);
    };
    log_info(
        "Giveback",
        format!("Giving back {} 🙏...", fmt_lamports(plan.total)),
    );

    let signers: Vec<&Keypair> = plan
        .signers
        .iter()
        .filter_map(|pubkey| keypairs.iter().find(|kp| kp.pubkey() == *pubkey))
        .collect();
    let (payer, rest) = signers
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("Giveback has no fee payer"))?;

    let signature = rpc
        .send_and_confirm_txn(payer, rest, &plan.instructions)
        .await?;
    Ok(Some((signature, plan.total)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payer_withholds_fees_for_every_signer() {
        let payer = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let plan = plan_giveback(&[(payer, 1_000_000), (other, 300_000)], &recipient).unwrap();

        assert_eq!(plan.signers, vec![payer, other]);
        assert_eq!(
            plan.instructions,
            vec![
                transfer(&payer, &recipient, 1_000_000 - 2 * LAMPORTS_PER_SIGNATURE),
                transfer(&other, &recipient, 300_000),
            ]
        );
        assert_eq!(plan.total, 1_290_000);
    }

    #[test]
    fn skips_empty_accounts() {
        let payer = Pubkey::new_unique();
        let empty = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let plan = plan_giveback(&[(payer, 50_000), (empty, 0)], &recipient).unwrap();
        assert_eq!(plan.signers, vec![payer]);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.total, 45_000);
    }

    #[test]
    fn first_keypair_covering_fees_pays_them() {
        let wallet = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let plan = plan_giveback(&[(wallet, 1_000), (other, 300_000)], &recipient).unwrap();
        assert_eq!(plan.signers, vec![other, wallet]);
        assert_eq!(
            plan.instructions,
            vec![
                transfer(&other, &recipient, 300_000 - 2 * LAMPORTS_PER_SIGNATURE),
                transfer(&wallet, &recipient, 1_000),
            ]
        );
        assert_eq!(plan.total, 291_000);
    }

    #[test]
    fn payer_left_empty_still_signs() {
        let wallet = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let plan = plan_giveback(
            &[(wallet, 2 * LAMPORTS_PER_SIGNATURE), (other, 7)],
            &recipient,
        )
        .unwrap();
        assert_eq!(plan.signers, vec![wallet, other]);
        assert_eq!(plan.instructions, vec![transfer(&other, &recipient, 7)]);
    }

    #[test]
    fn nothing_to_give_back() {
        let recipient = Pubkey::new_unique();
        assert_eq!(plan_giveback(&[], &recipient), None);
        assert_eq!(
            plan_giveback(&[(Pubkey::new_unique(), LAMPORTS_PER_SIGNATURE)], &recipient),
            None
        );
        // Nobody can cover the 10_000 lamport fee for two signers.
        assert_eq!(
            plan_giveback(
                &[(Pubkey::new_unique(), 1_000), (Pubkey::new_unique(), 9_000)],
                &recipient
            ),
            None
        );
    }
}
