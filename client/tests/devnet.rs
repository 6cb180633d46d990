//! The full demo scenario against a live cluster (devnet unless `DEMO_RPC_URL` says otherwise).
//!
//! Run with `cargo test -p demo-client --test devnet -- --ignored --nocapture`.

use demo_client::{
    config::DemoConfig,
    e2e_helpers::DemoE2e,
    giveback::GivebackOutcome,
    logs::{
        log_divider,
        log_warning,
    },
};
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    signer::Signer,
};

const DONATION: u64 = LAMPORTS_PER_SOL / 4;
const TRANSFER: u64 = LAMPORTS_PER_SOL / 10;

#[tokio::test]
#[ignore = "requires a funded devnet connection"]
async fn demo_instructions() -> anyhow::Result<()> {
    let e2e = DemoE2e::new(DemoConfig::from_env()?);
    e2e.setup().await;
    log_divider();

    let result = run_scenario(&e2e).await;

    // Give back all lamports whether or not the scenario passed.
    log_divider();
    if let GivebackOutcome::Dumped { .. } | GivebackOutcome::DumpFailed { .. } =
        e2e.teardown().await
    {
        log_warning("Giveback", "Leftover funds weren't returned");
    }

    result
}

async fn run_scenario(e2e: &DemoE2e) -> anyhow::Result<()> {
    assert!(e2e.wallet_balance().await? > 0);

    // These don't depend on each other and each awaits its own confirmation.
    let (echo, add, transfer, first_donation) = futures::join!(
        e2e.send_echo("Hello from the demo client 🚀"),
        e2e.send_add(13, 37),
        e2e.send_transfer(TRANSFER),
        e2e.send_donate(DONATION),
    );
    echo?;
    add?;
    transfer?;
    first_donation?;

    let (_, after_one) = e2e.fetch_jar().await?;
    assert_eq!(after_one.donation_count, 1);
    assert!(after_one.last_donation_time > 0);

    // Another donation from the same owner.
    e2e.send_donate(DONATION).await?;

    let (jar_account, jar) = e2e.fetch_jar().await?;
    assert_eq!(jar_account.lamports, 2 * DONATION);
    assert_eq!(jar_account.owner, e2e.config.program_id);
    assert!(!jar_account.executable);
    assert_eq!(jar.authority, e2e.wallet.pubkey());
    assert_eq!(jar.donation_count, 2);
    assert!(jar.last_donation_time >= after_one.last_donation_time);

    Ok(())
}
