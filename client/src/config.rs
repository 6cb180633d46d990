//! Environment-driven configuration for the demo client and its integration scenario.

use std::{
    env,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use solana_sdk::{
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
};

use crate::demo_program_id;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Where leftover lamports are returned to at the end of a run.
pub const DEFAULT_GIVEBACK_KEY: Pubkey =
    Pubkey::from_str_const("6682BLJUxkBZnHXzhHT1m3F4hvxRpceyyLtZsQuLbdWt");

pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// The RPC endpoint; devnet unless overridden.
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub giveback_key: Pubkey,
    pub airdrop_lamports: u64,
    /// Deadline for the setup (airdrop) and teardown (giveback) steps.
    pub timeout: Duration,
    /// Directory the diagnostic `data.json` and `giveback.json` dumps are written to.
    pub dump_dir: PathBuf,
    /// Compute unit limit prepended to every scenario transaction, if any.
    pub compute_budget: Option<u32>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            program_id: demo_program_id(),
            giveback_key: DEFAULT_GIVEBACK_KEY,
            airdrop_lamports: LAMPORTS_PER_SOL,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dump_dir: PathBuf::from("."),
            compute_budget: None,
        }
    }
}

impl DemoConfig {
    /// Loads the configuration from `DEMO_*` environment variables, falling back to the defaults
    /// for any that are unset.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            rpc_url: lookup("DEMO_RPC_URL").unwrap_or(defaults.rpc_url),
            program_id: parse_or(&lookup, "DEMO_PROGRAM_ID", defaults.program_id)?,
            giveback_key: parse_or(&lookup, "DEMO_GIVEBACK_KEY", defaults.giveback_key)?,
            airdrop_lamports: parse_or(
                &lookup,
                "DEMO_AIRDROP_LAMPORTS",
                defaults.airdrop_lamports,
            )?,
            timeout: parse_or(&lookup, "DEMO_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
                .map(Duration::from_secs)?,
            dump_dir: lookup("DEMO_DUMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dump_dir),
            compute_budget: lookup("DEMO_COMPUTE_UNIT_LIMIT")
                .map(|raw| parse("DEMO_COMPUTE_UNIT_LIMIT", &raw))
                .transpose()?,
        })
    }

    pub fn jar_dump_path(&self) -> PathBuf {
        self.dump_dir.join("data.json")
    }

    pub fn giveback_dump_path(&self) -> PathBuf {
        self.dump_dir.join("giveback.json")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

fn parse<T>(key: &str, raw: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid value {raw:?} for {key}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DemoConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.jar_dump_path(), PathBuf::from("./data.json"));
    }

    #[test]
    fn overrides_from_lookup() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            ("DEMO_RPC_URL", "http://localhost:8899"),
            ("DEMO_GIVEBACK_KEY", "11111111111111111111111111111111"),
            ("DEMO_AIRDROP_LAMPORTS", " 2000000000 "),
            ("DEMO_TIMEOUT_SECS", "5"),
            ("DEMO_DUMP_DIR", "/tmp/demo"),
            ("DEMO_COMPUTE_UNIT_LIMIT", "200000"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.giveback_key, Pubkey::default());
        assert_eq!(config.airdrop_lamports, 2 * LAMPORTS_PER_SOL);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.compute_budget, Some(200_000));
        assert_eq!(
            config.giveback_dump_path(),
            PathBuf::from("/tmp/demo/giveback.json")
        );
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = DemoConfig::from_lookup(lookup_from(&[("DEMO_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("DEMO_TIMEOUT_SECS"));

        let err = DemoConfig::from_lookup(lookup_from(&[("DEMO_PROGRAM_ID", "not-a-key")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("DEMO_PROGRAM_ID"));

        let err = DemoConfig::from_lookup(lookup_from(&[("DEMO_COMPUTE_UNIT_LIMIT", "-1")]))
            .unwrap_err();
        assert!(format!("{err:#}").contains("DEMO_COMPUTE_UNIT_LIMIT"));
    }
}
