use alloc::vec::Vec;

use crate::error::DemoError;

pub mod add;
pub mod echo;
pub mod lamports;

pub use add::AddInstructionData;
pub use echo::EchoInstructionData;
pub use lamports::LamportsInstructionData;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum InstructionTag {
    Echo,
    Add,
    Transfer,
    Donate,
}

impl TryFrom<u8> for InstructionTag {
    type Error = DemoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            // SAFETY: A valid enum variant is guaranteed with the match pattern.
            // All variants are checked in the exhaustive instruction tag test.
            0..4 => Ok(unsafe { core::mem::transmute::<u8, Self>(value) }),
            _ => Err(DemoError::InvalidInstructionTag),
        }
    }
}

/// Prefixes packed instruction data with its tag byte.
pub fn tagged(tag: InstructionTag, data: &[u8]) -> Vec<u8> {
    let mut res = Vec::with_capacity(1 + data.len());
    res.push(tag as u8);
    res.extend_from_slice(data);
    res
}

/// Splits raw instruction data into its tag and the remaining packed data.
pub fn split_tag(instruction_data: &[u8]) -> Result<(InstructionTag, &[u8]), DemoError> {
    let [tag, rest @ ..] = instruction_data else {
        return Err(DemoError::InvalidInstructionDataLength);
    };
    Ok((InstructionTag::try_from(*tag)?, rest))
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_instruction_tag_from_u8_exhaustive() {
        for variant in InstructionTag::iter() {
            let variant_u8 = variant as u8;
            assert_eq!(
                InstructionTag::from_repr(variant_u8).unwrap(),
                InstructionTag::try_from(variant_u8).unwrap(),
            );
            assert_eq!(InstructionTag::try_from(variant_u8).unwrap(), variant);
        }
        assert_eq!(
            InstructionTag::try_from(InstructionTag::iter().count() as u8),
            Err(DemoError::InvalidInstructionTag)
        );
    }

    #[test]
    fn split_tag_rejects_empty_data() {
        assert_eq!(split_tag(&[]), Err(DemoError::InvalidInstructionDataLength));
        assert_eq!(split_tag(&[3, 9]), Ok((InstructionTag::Donate, &[9u8][..])));
    }
}
