use core::mem::MaybeUninit;

pub const UNINIT_BYTE: MaybeUninit<u8> = MaybeUninit::uninit();

/// # Safety
///
/// Implementor must guarantee `pack_into_slice` writes all `LEN` bytes.
pub unsafe trait Pack<const LEN: usize>: Sized {
    /// Pack into a buffer of size LEN without zero initializing the buffer, then return the buffer.
    fn pack(&self) -> [u8; LEN] {
        let mut dst = [UNINIT_BYTE; LEN];
        self.pack_into_slice(&mut dst);

        // Safety: All LEN bytes were initialized in `pack_into_slice`.
        unsafe { *(dst.as_ptr() as *const [u8; LEN]) }
    }

    #[doc(hidden)]
    /// Pack into a destination slice of maybe uninitialized bytes of LEN length.
    fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; LEN]);
}

/// Writes bytes from `src` into the uninitialized `dst` buffer. `src` and `dst` must be the same
/// length.
#[inline(always)]
pub fn write_bytes(dst: &mut [MaybeUninit<u8>], src: &[u8]) {
    debug_assert_eq!(
        src.len(),
        dst.len(),
        "tried to `write_bytes` with mismatched src/dst lengths"
    );
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        d.write(*s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(u32, u8);

    unsafe impl Pack<5> for Pair {
        fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; 5]) {
            write_bytes(&mut dst[0..4], &self.0.to_le_bytes());
            write_bytes(&mut dst[4..5], &[self.1]);
        }
    }

    #[test]
    fn pack_writes_every_byte() {
        assert_eq!(Pair(1234, 3).pack(), [210, 4, 0, 0, 3]);
    }
}
