//! Runs the echo, add, transfer and donate instructions against the configured cluster, prints the
//! resulting jar account, then gives the leftover lamports back.

use demo_client::{
    config::DemoConfig,
    e2e_helpers::DemoE2e,
    logs::log_divider,
    print_kv,
};
use solana_sdk::native_token::LAMPORTS_PER_SOL;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let e2e = DemoE2e::new(DemoConfig::from_env()?);
    e2e.setup().await;

    let result: anyhow::Result<_> = async {
        e2e.send_echo("gm").await?;
        e2e.send_add(13, 37).await?;
        e2e.send_donate(LAMPORTS_PER_SOL / 4).await?;
        e2e.fetch_jar().await
    }
    .await;

    log_divider();
    match &result {
        Ok((_, jar)) => {
            print_kv!("Authority", jar.authority);
            print_kv!("Donations", jar.donation_count);
            if let Some(at) = jar.last_donation_at() {
                print_kv!("Last donation", at.to_rfc3339());
            }
        }
        Err(e) => print_kv!("Scenario failed", format!("{e:#}")),
    }
    log_divider();

    e2e.teardown().await;
    result.map(|_| ())
}
