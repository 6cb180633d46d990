#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::FromRepr)]
#[repr(u8)]
pub enum DemoError {
    InvalidInstructionTag,
    InvalidInstructionDataLength,
    InvalidAccountDataLength,
    InvalidUtf8,
    AccountNotOwnedByProgram,
}

impl From<DemoError> for &'static str {
    fn from(value: DemoError) -> Self {
        match value {
            DemoError::InvalidInstructionTag => "Invalid instruction tag",
            DemoError::InvalidInstructionDataLength => "Instruction data has the wrong length",
            DemoError::InvalidAccountDataLength => "Account data has the wrong length",
            DemoError::InvalidUtf8 => "Echo message isn't valid UTF-8",
            DemoError::AccountNotOwnedByProgram => "Account isn't owned by the demo program",
        }
    }
}

impl core::fmt::Display for DemoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = (*self).into();
        write!(f, "{msg}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DemoError {}

pub type DemoResult<T = ()> = Result<T, DemoError>;
