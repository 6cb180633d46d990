//! PDA helpers for deriving demo program addresses.

use demo_interface::seeds::JAR_SEED;
use solana_sdk::pubkey::Pubkey;

/// Derives the jar account address for `wallet`: seeds `[b"jar", wallet]` under `program_id`.
pub fn find_jar_address(wallet: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[JAR_SEED, wallet.as_ref()], program_id)
}
