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

#[repr(C)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddInstructionData {
    /// The left operand.
    a: LeU64,
    /// The right operand.
    b: LeU64,
}

impl AddInstructionData {
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            a: a.to_le_bytes(),
            b: b.to_le_bytes(),
        }
    }

    #[inline(always)]
    pub fn a(&self) -> u64 {
        u64::from_le_bytes(self.a)
    }

    #[inline(always)]
    pub fn b(&self) -> u64 {
        u64::from_le_bytes(self.b)
    }

    pub fn unpack(data: &[u8]) -> Result<Self, DemoError> {
        load::<Self>(data)
            .cloned()
            .map_err(|_| DemoError::InvalidInstructionDataLength)
    }
}

unsafe impl Pack<16> for AddInstructionData {
    fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; 16]) {
        write_bytes(&mut dst[0..8], &self.a);
        write_bytes(&mut dst[8..16], &self.b);
    }
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for AddInstructionData {
    const LEN: usize = 16;

    #[inline(always)]
    fn validate_bit_patterns(_bytes: &[u8]) -> DemoResult {
        Ok(())
    }
}

const_assert_eq!(AddInstructionData::LEN, size_of::<AddInstructionData>());
const_assert_eq!(align_of::<AddInstructionData>(), 1);
