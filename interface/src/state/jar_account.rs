//! The per-wallet jar account written by the demo program's `donate` instruction.
//!
//! Layout (48 bytes, no discriminant):
//!
//! | offset | size | field                          |
//! |--------|------|--------------------------------|
//! | 0      | 32   | authority public key           |
//! | 32     | 8    | donation count, u64 LE         |
//! | 40     | 8    | last donation time, i64 LE     |

use solana_address::Address;
use static_assertions::const_assert_eq;

use crate::{
    error::{
        DemoError,
        DemoResult,
    },
    state::{
        transmutable::{
            load,
            Transmutable,
        },
        LeI64,
        LeU64,
    },
};

pub const JAR_ACCOUNT_SIZE: usize = 48;

#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JarAccount {
    /// The wallet that owns the jar and made every donation to it.
    authority: [u8; 32],
    /// The u64 number of donations made so far as LE bytes.
    donation_count: LeU64,
    /// The i64 unix timestamp of the latest donation as LE bytes.
    last_donation_time: LeI64,
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for JarAccount {
    const LEN: usize = JAR_ACCOUNT_SIZE;

    #[inline(always)]
    fn validate_bit_patterns(_bytes: &[u8]) -> DemoResult {
        // All bit patterns are valid: no enums, bools, or other types with invalid states.
        Ok(())
    }
}

const_assert_eq!(JAR_ACCOUNT_SIZE, size_of::<JarAccount>());
const_assert_eq!(align_of::<JarAccount>(), 1);

impl JarAccount {
    pub fn new(authority: &Address, donation_count: u64, last_donation_time: i64) -> Self {
        Self {
            authority: authority.to_bytes(),
            donation_count: donation_count.to_le_bytes(),
            last_donation_time: last_donation_time.to_le_bytes(),
        }
    }

    /// Borrows a jar account from raw account data.
    ///
    /// Data that isn't exactly [`JarAccount::LEN`] bytes is rejected.
    #[inline(always)]
    pub fn load(bytes: &[u8]) -> Result<&Self, DemoError> {
        load::<Self>(bytes)
    }

    /// Decodes an owned copy of a jar account from raw account data.
    #[inline(always)]
    pub fn unpack(bytes: &[u8]) -> Result<Self, DemoError> {
        Self::load(bytes).cloned()
    }

    #[inline(always)]
    pub fn authority(&self) -> Address {
        Address::new_from_array(self.authority)
    }

    #[inline(always)]
    pub fn donation_count(&self) -> u64 {
        u64::from_le_bytes(self.donation_count)
    }

    #[inline(always)]
    pub fn last_donation_time(&self) -> i64 {
        i64::from_le_bytes(self.last_donation_time)
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[u8; JarAccount::LEN] {
        // Safety:
        // - `JarAccount` is always `LEN` bytes; size and alignment are checked with const asserts.
        // - All fields are byte-safe, `Copy`, non-pointer/reference u8 arrays.
        unsafe { &*(self as *const Self as *const [u8; JarAccount::LEN]) }
    }
}
