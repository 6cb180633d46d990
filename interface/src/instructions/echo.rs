use alloc::vec::Vec;

use crate::{
    error::DemoError,
    instructions::InstructionTag,
};

const LEN_PREFIX_SIZE: usize = core::mem::size_of::<u32>();

/// A message the demo program logs back. Packed as a u32 LE byte length followed by the UTF-8
/// bytes, the same layout borsh uses for a `String`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EchoInstructionData<'a> {
    message: &'a str,
}

impl<'a> EchoInstructionData<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &'a str {
        self.message
    }

    /// Packs the tag byte, the length prefix and the message bytes.
    pub fn pack_tagged(&self) -> Vec<u8> {
        let bytes = self.message.as_bytes();
        let mut res = Vec::with_capacity(1 + LEN_PREFIX_SIZE + bytes.len());
        res.push(InstructionTag::Echo as u8);
        res.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        res.extend_from_slice(bytes);
        res
    }

    /// Unpacks echo instruction data that has already had its tag byte stripped.
    pub fn unpack(data: &'a [u8]) -> Result<Self, DemoError> {
        if data.len() < LEN_PREFIX_SIZE {
            return Err(DemoError::InvalidInstructionDataLength);
        }
        let (prefix, bytes) = data.split_at(LEN_PREFIX_SIZE);
        let mut len = [0u8; LEN_PREFIX_SIZE];
        len.copy_from_slice(prefix);
        let len = u32::from_le_bytes(len) as usize;
        if bytes.len() != len {
            return Err(DemoError::InvalidInstructionDataLength);
        }
        let message = core::str::from_utf8(bytes).map_err(|_| DemoError::InvalidUtf8)?;
        Ok(Self { message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_tagged_layout() {
        let packed = EchoInstructionData::new("gm").pack_tagged();
        assert_eq!(packed, [0, 2, 0, 0, 0, b'g', b'm']);
    }

    #[test]
    fn unpack_rejects_bad_lengths_and_utf8() {
        assert_eq!(
            EchoInstructionData::unpack(&[2, 0, 0]),
            Err(DemoError::InvalidInstructionDataLength)
        );
        assert_eq!(
            EchoInstructionData::unpack(&[3, 0, 0, 0, b'a']),
            Err(DemoError::InvalidInstructionDataLength)
        );
        assert_eq!(
            EchoInstructionData::unpack(&[1, 0, 0, 0, 0xff]),
            Err(DemoError::InvalidUtf8)
        );
        assert_eq!(
            EchoInstructionData::unpack(&[0, 0, 0, 0]).map(|d| d.message()),
            Ok("")
        );
    }
}
