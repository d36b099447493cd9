//! 64-byte block staging shared by MD5 and SHA-1.
//!
//! [`BlockBuffer`] owns the partial block and the running byte counter. It never interprets the
//! bytes itself: each complete block is handed to a compression callback supplied by the caller,
//! so the same buffering and Merkle–Damgård padding serve both digests.

use core::sync::atomic::{compiler_fence, Ordering};

pub(crate) const BLOCK_LEN: usize = 64;

/// Offset of the 8-byte message length field inside the final block.
const LENGTH_OFFSET: usize = BLOCK_LEN - 8;

/// Byte order of the trailing bit-length field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LengthOrder {
    Little,
    Big,
}

#[derive(Clone)]
pub(crate) struct BlockBuffer {
    buffer: [u8; BLOCK_LEN],
    total_bytes: u64,
}

impl BlockBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            buffer: [0u8; BLOCK_LEN],
            total_bytes: 0,
        }
    }

    /// Bytes fed so far, modulo 2^64.
    #[inline]
    pub(crate) fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Number of unconsumed bytes currently staged.
    #[inline]
    pub(crate) fn fill(&self) -> usize {
        (self.total_bytes % BLOCK_LEN as u64) as usize
    }

    /// Append `data`, calling `compress` once per completed block, in order.
    pub(crate) fn feed(&mut self, data: &[u8], mut compress: impl FnMut(&[u8; BLOCK_LEN])) {
        let fill = self.fill();
        self.total_bytes = self.total_bytes.wrapping_add(data.len() as u64);

        if fill + data.len() < BLOCK_LEN {
            self.buffer[fill..fill + data.len()].copy_from_slice(data);
            return;
        }

        let (head, rest) = data.split_at(BLOCK_LEN - fill);
        self.buffer[fill..].copy_from_slice(head);
        compress(&self.buffer);

        // Whole blocks are compressed straight from the caller's slice.
        let (blocks, tail) = rest.as_chunks::<BLOCK_LEN>();
        for block in blocks {
            compress(block);
        }
        self.buffer[..tail.len()].copy_from_slice(tail);
    }

    /// Apply the final padding: `0x80`, zeros up to offset 56, then the pre-padding bit count.
    ///
    /// Drives one compression, or two when 56 or more bytes are already staged.
    pub(crate) fn finish(&mut self, order: LengthOrder, mut compress: impl FnMut(&[u8; BLOCK_LEN])) {
        let bit_len = self.total_bytes.wrapping_mul(8);
        let fill = self.fill();
        let pad_len = if fill < LENGTH_OFFSET {
            LENGTH_OFFSET - fill
        } else {
            LENGTH_OFFSET + BLOCK_LEN - fill
        };

        let mut padding = [0u8; BLOCK_LEN];
        padding[0] = 0x80;
        self.feed(&padding[..pad_len], &mut compress);

        let length = match order {
            LengthOrder::Little => bit_len.to_le_bytes(),
            LengthOrder::Big => bit_len.to_be_bytes(),
        };
        self.feed(&length, &mut compress);
        debug_assert_eq!(self.fill(), 0);
    }
}

impl Drop for BlockBuffer {
    fn drop(&mut self) {
        wipe(&mut self.buffer, 0);
        wipe(core::slice::from_mut(&mut self.total_bytes), 0);
    }
}

/// Overwrite every slot with `zero` in a way the optimizer may not elide.
pub(crate) fn wipe<T: Copy>(slots: &mut [T], zero: T) {
    for slot in slots.iter_mut() {
        // SAFETY: `slot` is a valid, aligned, exclusive reference for the duration of the write.
        unsafe { core::ptr::write_volatile(slot, zero) };
    }
    compiler_fence(Ordering::SeqCst);
}
