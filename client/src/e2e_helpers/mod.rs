//! The end-to-end scenario context: a freshly generated wallet funded by airdrop, the instruction
//! builder bound to it, and the list of keypairs that must give their funds back at the end.

use std::sync::{
    Mutex,
    PoisonError,
};

use solana_instruction::Instruction;
use solana_sdk::{
    account::Account,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
};

use crate::{
    artifacts::dump_account_data,
    config::DemoConfig,
    giveback::{
        give_back,
        GivebackOutcome,
    },
    instruction_builder::DemoInstructionBuilder,
    logs::{
        fmt_lamports,
        log_error,
        log_info,
        log_success,
        log_transaction,
    },
    print_kv,
    single_signer_instruction::SingleSignerInstruction,
    transactions::CustomRpcClient,
    views::JarAccountView,
};

pub struct DemoE2e {
    pub rpc: CustomRpcClient,
    pub config: DemoConfig,
    pub wallet: Keypair,
    pub builder: DemoInstructionBuilder,
    /// Every keypair holding funds that must be returned at teardown. The wallet is always first.
    giveback: Mutex<Vec<Keypair>>,
}

impl DemoE2e {
    /// Creates the scenario with a new random wallet. No network calls are made.
    pub fn new(config: DemoConfig) -> Self {
        let rpc = CustomRpcClient::new(Some(config.rpc_url.clone()), None);
        Self::with_rpc(rpc, config, Keypair::new())
    }

    /// Creates the scenario around an existing client. The configured program ID is added to the
    /// client's error-decoding filter and the configured compute budget, if any, replaces the
    /// client's.
    pub fn with_rpc(mut rpc: CustomRpcClient, config: DemoConfig, wallet: Keypair) -> Self {
        rpc.config.program_id_filter.insert(config.program_id);
        if config.compute_budget.is_some() {
            rpc.config.compute_budget = config.compute_budget;
        }

        let builder = DemoInstructionBuilder::new(wallet.pubkey(), config.program_id);
        print_kv!("Wallet PK", wallet.pubkey());
        print_kv!("Program ID", config.program_id);

        let giveback = Mutex::new(vec![wallet.insecure_clone()]);
        Self {
            rpc,
            config,
            wallet,
            builder,
            giveback,
        }
    }

    /// Requests an airdrop for the wallet. Failures are logged and otherwise ignored so the run
    /// proceeds against whatever balance the wallet already has. Returns whether it confirmed.
    pub async fn setup(&self) -> bool {
        log_info("Airdrop", "Getting you some free SOL 😎...");
        let airdrop = tokio::time::timeout(
            self.config.timeout,
            self.rpc
                .fund_account(&self.wallet.pubkey(), self.config.airdrop_lamports),
        )
        .await
        .unwrap_or_else(|_| Err(anyhow::anyhow!("Timed out after {:?}", self.config.timeout)));

        match airdrop {
            Ok(signature) => {
                log_success("Airdrop confirmed 🚀", signature);
                true
            }
            Err(e) => {
                log_error("Airdrop failed 💥", format!("{e:#}"));
                false
            }
        }
    }

    pub async fn wallet_balance(&self) -> anyhow::Result<u64> {
        self.rpc.get_balance(&self.wallet.pubkey()).await
    }

    async fn send_as_wallet(&self, instruction: Instruction) -> anyhow::Result<Signature> {
        SingleSignerInstruction::try_from(instruction)?
            .send_single_signer(&self.rpc, &self.wallet)
            .await
    }

    pub async fn send_echo(&self, message: &str) -> anyhow::Result<Signature> {
        let echo = self.builder.echo(message);
        let sig = self.send_as_wallet(echo).await?;
        log_transaction("ECHO", sig, self.wallet.pubkey());
        Ok(sig)
    }

    pub async fn send_add(&self, a: u64, b: u64) -> anyhow::Result<Signature> {
        let add = self.builder.add(a, b);
        let sig = self.send_as_wallet(add).await?;
        log_transaction("ADD", sig, self.wallet.pubkey());
        Ok(sig)
    }

    /// Transfers `lamports` to a new keypair, which joins the giveback list before sending so its
    /// funds are returned even if confirmation fails.
    pub async fn send_transfer(&self, lamports: u64) -> anyhow::Result<(Pubkey, Signature)> {
        let to = Keypair::new();
        let to_pubkey = to.pubkey();
        self.giveback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(to);

        let transfer = self.builder.transfer(&to_pubkey, lamports);
        let sig = self.send_as_wallet(transfer).await?;
        log_transaction("TRANSFER", sig, self.wallet.pubkey());
        Ok((to_pubkey, sig))
    }

    pub async fn send_donate(&self, lamports: u64) -> anyhow::Result<Signature> {
        let donate = self.builder.donate(lamports);
        let sig = self.send_as_wallet(donate).await?;
        log_transaction("DONATE", sig, self.wallet.pubkey());
        log_info("Donated", fmt_lamports(lamports));
        Ok(sig)
    }

    /// Fetches and decodes the wallet's jar account, dumping its raw bytes for inspection.
    pub async fn fetch_jar(&self) -> anyhow::Result<(Account, JarAccountView)> {
        let jar = self.builder.jar_address();
        let account = self.rpc.get_account(&jar).await?;
        print_kv!("Jar account", format!("{account:?}"));
        dump_account_data(&self.config.jar_dump_path(), &account.data);

        let view = crate::views::try_jar_view_from_owner_and_data(
            &self.config.program_id,
            &account.owner,
            &account.data,
        )?;
        Ok((account, view))
    }

    /// Public keys of every keypair currently on the giveback list.
    pub fn giveback_pubkeys(&self) -> Vec<Pubkey> {
        self.giveback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(Keypair::pubkey)
            .collect()
    }

    /// Gives back all lamports to the configured address. Never fails; see [`give_back`].
    pub async fn teardown(self) -> GivebackOutcome {
        let keypairs = self
            .giveback
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        give_back(
            &self.rpc,
            &keypairs,
            &self.config.giveback_key,
            &self.config.giveback_dump_path(),
            self.config.timeout,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo_program_id;

    #[test]
    fn configured_program_id_is_decoded_on_failure() {
        let program_id = Pubkey::new_unique();
        let e2e = DemoE2e::new(DemoConfig {
            program_id,
            ..DemoConfig::default()
        });

        let filter = &e2e.rpc.config.program_id_filter;
        assert!(filter.contains(&program_id));
        assert!(filter.contains(&demo_program_id()));
        assert_eq!(e2e.builder.echo("gm").program_id, program_id);
    }

    #[test]
    fn configured_compute_budget_is_applied() {
        let e2e = DemoE2e::new(DemoConfig {
            compute_budget: Some(300_000),
            ..DemoConfig::default()
        });
        assert_eq!(e2e.rpc.config.compute_budget, Some(300_000));

        let e2e = DemoE2e::new(DemoConfig::default());
        assert_eq!(e2e.rpc.config.compute_budget, None);
    }

    #[test]
    fn wallet_is_first_on_the_giveback_list() {
        let e2e = DemoE2e::new(DemoConfig::default());
        assert_eq!(e2e.giveback_pubkeys(), vec![e2e.wallet.pubkey()]);
    }
}
