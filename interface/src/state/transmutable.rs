use crate::error::{
    DemoError,
    DemoResult,
};

/// Marker trait for a zero-copy view of bytes as `&Self` via an unchecked cast
/// (e.g., `&*(bytes.as_ptr() as *const Self)`).
///
/// # Safety
/// **Implementor guarantees:**
/// - Use a stable layout (`#[repr(C)]` or `#[repr(transparent)]`).
/// - Any `LEN` bytes that pass [`Transmutable::validate_bit_patterns`] form a valid `Self`.
/// - `size_of::<Self>() == LEN`
/// - `align_of::<Self>() == 1`
pub unsafe trait Transmutable: Sized {
    /// The cumulative size in bytes of all fields in the struct.
    const LEN: usize;

    /// Checks that `bytes` hold valid bit patterns for every field of `Self`.
    fn validate_bit_patterns(bytes: &[u8]) -> DemoResult;
}

/// Returns a reference to a `T: Transmutable` from the given bytes after checking the byte length
/// and bit patterns.
#[inline(always)]
pub fn load<T: Transmutable>(bytes: &[u8]) -> Result<&T, DemoError> {
    if bytes.len() != T::LEN {
        return Err(DemoError::InvalidAccountDataLength);
    }
    T::validate_bit_patterns(bytes)?;

    // Safety: the length was checked above, `T` has an alignment of 1 and the bit patterns were
    // validated.
    Ok(unsafe { &*(bytes.as_ptr() as *const T) })
}
