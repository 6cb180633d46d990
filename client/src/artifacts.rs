//! Best-effort diagnostic files written on failure paths: raw jar account bytes and the keypairs
//! still holding funds after a failed giveback.

use std::{
    fs,
    path::Path,
};

use anyhow::Context;
use serde::{
    Deserialize,
    Serialize,
};
use solana_sdk::signature::{
    Keypair,
    Signer,
};

use crate::logs::{
    log_info,
    log_warning,
};

/// A keypair as written to the giveback dump. `secret_key` is the 64-byte keypair in the same
/// byte order the Solana CLI uses for keypair files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypairDump {
    pub pubkey: String,
    pub secret_key: Vec<u8>,
}

impl From<&Keypair> for KeypairDump {
    fn from(keypair: &Keypair) -> Self {
        Self {
            pubkey: keypair.pubkey().to_string(),
            secret_key: keypair.to_bytes().to_vec(),
        }
    }
}

impl TryFrom<&KeypairDump> for Keypair {
    type Error = anyhow::Error;

    fn try_from(dump: &KeypairDump) -> Result<Self, Self::Error> {
        let keypair = Keypair::try_from(dump.secret_key.as_slice())
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid secret key for {}", dump.pubkey))?;
        if keypair.pubkey().to_string() != dump.pubkey {
            return Err(anyhow::anyhow!(
                "Secret key doesn't match pubkey {}",
                dump.pubkey
            ));
        }
        Ok(keypair)
    }
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize dump")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes `value` to `path`, logging instead of failing. Returns whether the file was written.
pub fn dump_best_effort<T: Serialize + ?Sized>(label: &str, path: &Path, value: &T) -> bool {
    match write_json(path, value) {
        Ok(()) => {
            log_info(label, format!("saved to {}", path.display()));
            true
        }
        Err(e) => {
            log_warning(label, format!("{e:#}"));
            false
        }
    }
}

/// Dumps raw account data as a JSON array of byte values.
pub fn dump_account_data(path: &Path, data: &[u8]) -> bool {
    dump_best_effort("Account data", path, data)
}

pub fn dump_keypairs(path: &Path, keypairs: &[Keypair]) -> bool {
    let dumps: Vec<KeypairDump> = keypairs.iter().map(KeypairDump::from).collect();
    dump_best_effort("Giveback keys", path, &dumps)
}

/// Reads keypairs back from a giveback dump, e.g. to return funds manually.
pub fn read_keypair_dump(path: &Path) -> anyhow::Result<Vec<Keypair>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let dumps: Vec<KeypairDump> =
        serde_json::from_str(&raw).context("Giveback dump isn't valid JSON")?;
    dumps.iter().map(Keypair::try_from).collect()
}
