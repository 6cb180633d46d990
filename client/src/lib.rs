//! Client-side utilities for interacting with the demo program.
//!
//! Includes the instruction builder, PDA derivations, an RPC wrapper for funding and sending
//! transactions, account views, the giveback teardown and pretty-logging utilities.

use solana_sdk::pubkey::Pubkey;

pub mod artifacts;
pub mod config;
pub mod e2e_helpers;
pub mod giveback;
pub mod instruction_builder;
pub mod logs;
pub mod mollusk_helpers;
pub mod pda;
pub mod single_signer_instruction;
pub mod transactions;
pub mod views;

pub use logs::LogColor;

/// The demo program ID as a [`Pubkey`].
pub const fn demo_program_id() -> Pubkey {
    Pubkey::new_from_array(demo_interface::program::ID_BYTES)
}
