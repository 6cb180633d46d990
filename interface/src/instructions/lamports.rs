use core::mem::MaybeUninit;

use static_assertions::const_assert_eq;

use crate::{
    error::{
        DemoError,
        DemoResult,
    },
    pack::{
        write_bytes,
        Pack,
    },
    state::{
        transmutable::{
            load,
            Transmutable,
        },
        LeU64,
    },
};

/// Instruction data shared by `Transfer` and `Donate`.
#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LamportsInstructionData {
    /// The amount of lamports moved out of the signer's account.
    lamports: LeU64,
}

impl LamportsInstructionData {
    pub fn new(lamports: u64) -> Self {
        Self {
            lamports: lamports.to_le_bytes(),
        }
    }

    #[inline(always)]
    pub fn lamports(&self) -> u64 {
        u64::from_le_bytes(self.lamports)
    }

    pub fn unpack(data: &[u8]) -> Result<Self, DemoError> {
        load::<Self>(data)
            .cloned()
            .map_err(|_| DemoError::InvalidInstructionDataLength)
    }
}

unsafe impl Pack<8> for LamportsInstructionData {
    fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; 8]) {
        write_bytes(&mut dst[0..8], &self.lamports);
    }
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for LamportsInstructionData {
    const LEN: usize = 8;

    #[inline(always)]
    fn validate_bit_patterns(_bytes: &[u8]) -> DemoResult {
        Ok(())
    }
}

const_assert_eq!(LamportsInstructionData::LEN, size_of::<LamportsInstructionData>());
const_assert_eq!(align_of::<LamportsInstructionData>(), 1);
