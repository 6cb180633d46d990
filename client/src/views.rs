//! Read-only view helpers for decoding demo program accounts into ergonomic Rust structs.

use chrono::{
    DateTime,
    Utc,
};
use demo_interface::{
    error::DemoError,
    state::jar_account::JarAccount,
};
use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarAccountView {
    pub authority: Pubkey,
    pub donation_count: u64,
    pub last_donation_time: i64,
}

impl JarAccountView {
    /// The last donation time as a UTC datetime, if it's a representable timestamp.
    pub fn last_donation_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_donation_time, 0)
    }
}

impl From<&JarAccount> for JarAccountView {
    fn from(jar: &JarAccount) -> Self {
        Self {
            authority: Pubkey::new_from_array(jar.authority().to_bytes()),
            donation_count: jar.donation_count(),
            last_donation_time: jar.last_donation_time(),
        }
    }
}

/// Attempts to parse a jar account from raw Solana account fields.
///
/// Validates that:
/// - `account_owner` matches `program_id`, and
/// - `account_data` is exactly [`demo_interface::state::jar_account::JAR_ACCOUNT_SIZE`] bytes.
///
/// # Errors
/// Returns an error if the account is not owned by the demo program or the data has the wrong
/// length.
pub fn try_jar_view_from_owner_and_data(
    program_id: &Pubkey,
    account_owner: &Pubkey,
    account_data: &[u8],
) -> anyhow::Result<JarAccountView> {
    if account_owner != program_id {
        return Err(anyhow::Error::from(DemoError::AccountNotOwnedByProgram)
            .context(format!("Owner is {account_owner}")));
    }

    let jar = JarAccount::load(account_data).map_err(|e| {
        anyhow::Error::from(e).context(format!(
            "Jar account data is {} bytes",
            account_data.len()
        ))
    })?;

    Ok(jar.into())
}
