pub mod jar_account;
pub mod transmutable;

pub const U64_SIZE: usize = core::mem::size_of::<u64>();
pub const I64_SIZE: usize = core::mem::size_of::<i64>();

pub type LeU64 = [u8; U64_SIZE];
pub type LeI64 = [u8; I64_SIZE];
