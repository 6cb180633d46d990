//! Byte-level interface of the demo program: its address, PDA seeds, instruction data layouts and
//! the jar account layout.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod instructions;
pub mod pack;
pub mod state;

pub mod program {
    use solana_address::Address;

    /// The demo program ID as a base58 string.
    pub const ID_STR: &str = "EozPdGz7LVWKqkCBpByTP9YvzNeQ59EUaXRSquNx3fZh";

    /// The demo program ID as a `[u8; 32]`.
    pub const ID_BYTES: [u8; 32] = [
        205, 49, 137, 215, 152, 161, 59, 188, 90, 61, 186, 213, 60, 186, 62, 174, 191, 14, 235, 31,
        101, 141, 101, 43, 237, 94, 99, 86, 18, 171, 153, 160,
    ];

    pub const ID: Address = Address::new_from_array(ID_BYTES);
}

pub mod seeds {
    /// Seed prefix for a wallet's jar PDA: `[JAR_SEED, wallet]`.
    pub const JAR_SEED: &[u8] = b"jar";
}

/// The system program ID as a `[u8; 32]`.
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0; 32];
