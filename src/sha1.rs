//! SHA-1 (FIPS 180-4).

use core::fmt;

use crate::block::{wipe, BlockBuffer, LengthOrder, BLOCK_LEN};
use crate::{Algorithm, Digest};

pub const OUTPUT_LEN: usize = 20;

pub const INITIAL_STATE: [u32; 5] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476, 0xc3d2e1f0];

/// One additive constant per group of 20 steps.
const ROUND_CONSTANTS: [u32; 4] = [0x5a827999, 0x6ed9eba1, 0x8f1bbcdc, 0xca62c1d6];

/// Mix one 64-byte block into `state`, returning the new chaining value.
///
/// The 80-word message schedule is kept in a 16-word ring: step `t` overwrites slot `t % 16`
/// with `rotl1(w[t-3] ^ w[t-8] ^ w[t-14] ^ w[t-16])`.
pub fn compress(state: [u32; 5], block: &[u8; BLOCK_LEN]) -> [u32; 5] {
    let mut schedule = [0u32; 16];
    let (chunks, _) = block.as_chunks::<4>();
    for (word, bytes) in schedule.iter_mut().zip(chunks) {
        *word = u32::from_be_bytes(*bytes);
    }

    let [mut a, mut b, mut c, mut d, mut e] = state;
    for step in 0..80 {
        let slot = step % 16;
        if step >= 16 {
            schedule[slot] = (schedule[(step + 13) % 16]
                ^ schedule[(step + 8) % 16]
                ^ schedule[(step + 2) % 16]
                ^ schedule[slot])
                .rotate_left(1);
        }

        let group = step / 20;
        let mix = match group {
            0 => (b & c) | (!b & d),
            2 => (b & c) | (b & d) | (c & d),
            _ => b ^ c ^ d,
        };
        let temp = a
            .rotate_left(5)
            .wrapping_add(mix)
            .wrapping_add(e)
            .wrapping_add(ROUND_CONSTANTS[group])
            .wrapping_add(schedule[slot]);
        (a, b, c, d, e) = (temp, a, b.rotate_left(30), c, d);
    }
    wipe(&mut schedule, 0);

    [
        state[0].wrapping_add(a),
        state[1].wrapping_add(b),
        state[2].wrapping_add(c),
        state[3].wrapping_add(d),
        state[4].wrapping_add(e),
    ]
}

/// Streaming SHA-1 hasher. State and staged input are wiped on drop.
#[derive(Clone)]
pub struct Sha1 {
    state: [u32; 5],
    buffer: BlockBuffer,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self {
            state: INITIAL_STATE,
            buffer: BlockBuffer::new(),
        }
    }
}

impl Sha1 {
    /// Total input bytes accepted so far, modulo 2^64.
    pub fn bytes_hashed(&self) -> u64 {
        self.buffer.total_bytes()
    }
}

impl Digest for Sha1 {
    const ALGORITHM: Algorithm = Algorithm::Sha1;
    type Output = [u8; OUTPUT_LEN];

    fn update(&mut self, data: &[u8]) {
        let state = &mut self.state;
        self.buffer.feed(data, |block| *state = compress(*state, block));
    }

    fn finalize(mut self) -> Self::Output {
        let state = &mut self.state;
        self.buffer
            .finish(LengthOrder::Big, |block| *state = compress(*state, block));

        let mut out = [0u8; OUTPUT_LEN];
        for (bytes, word) in out.chunks_exact_mut(4).zip(self.state) {
            bytes.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

impl Drop for Sha1 {
    fn drop(&mut self) {
        wipe(&mut self.state, 0);
    }
}

impl fmt::Debug for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha1")
            .field("bytes_hashed", &self.bytes_hashed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn fips_180_vectors() {
        assert_eq!(
            Sha1::digest(b"abc"),
            hex!("a9993e364706816aba3e25717850c26c9cd0d89d")
        );
        assert_eq!(
            Sha1::digest(b""),
            hex!("da39a3ee5e6b4b0d3255bfef95601890afd80709")
        );
        assert_eq!(
            Sha1::digest(b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"),
            hex!("84983e441c3bd26ebaae4aa1f95129e5e54670f1")
        );
        assert_eq!(
            Sha1::digest(
                b"abcdefghbcdefghicdefghijdefghijkefghijklfghijklmghijklmnhijklmnoijklmnopjklmnopqklmnopqrlmnopqrsmnopqrstnopqrstu"
            ),
            hex!("a49b2446a02c645bf419f995b67091253a04a259")
        );
    }

    #[test]
    fn million_a() {
        let mut h = Sha1::new();
        let chunk = [b'a'; 1000];
        for _ in 0..1000 {
            h.update(&chunk);
        }
        assert_eq!(h.bytes_hashed(), 1_000_000);
        assert_eq!(h.finalize(), hex!("34aa973cd4c4daa4f61eeb2bdbad27316534016f"));
    }

    #[test]
    fn quick_brown_fox() {
        assert_eq!(
            Sha1::digest(b"The quick brown fox jumps over the lazy dog"),
            hex!("2fd4e1c67a2d28fced849ee1bb76e7391b93eb12")
        );
    }

    #[test]
    fn compression_is_pure() {
        let block = [0xa5u8; BLOCK_LEN];
        let first = compress(INITIAL_STATE, &block);
        let second = compress(INITIAL_STATE, &block);
        assert_eq!(first, second);
        assert_ne!(first, INITIAL_STATE);
    }
}
