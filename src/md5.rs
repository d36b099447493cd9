//! MD5 (RFC 1321).

use core::fmt;

use crate::block::{wipe, BlockBuffer, LengthOrder, BLOCK_LEN};
use crate::sha1;
use crate::{Algorithm, Digest};

pub const OUTPUT_LEN: usize = 16;

/// Chaining value at the start of every message. Numerically the first four SHA-1 words.
pub const INITIAL_STATE: [u32; 4] = {
    let s = sha1::INITIAL_STATE;
    [s[0], s[1], s[2], s[3]]
};

/// T[i] = floor(2^32 * |sin(i + 1)|), as published in RFC 1321.
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Left-rotation amount per step.
const SHIFT: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Message word consumed by each step.
const MESSAGE_INDEX: [usize; 64] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, //
    1, 6, 11, 0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, //
    5, 8, 11, 14, 1, 4, 7, 10, 13, 0, 3, 6, 9, 12, 15, 2, //
    0, 7, 14, 5, 12, 3, 10, 1, 8, 15, 6, 13, 4, 11, 2, 9,
];

/// Mix one 64-byte block into `state`, returning the new chaining value.
pub fn compress(state: [u32; 4], block: &[u8; BLOCK_LEN]) -> [u32; 4] {
    let mut words = [0u32; 16];
    let (chunks, _) = block.as_chunks::<4>();
    for (word, bytes) in words.iter_mut().zip(chunks) {
        *word = u32::from_le_bytes(*bytes);
    }

    let [mut a, mut b, mut c, mut d] = state;
    for step in 0..64 {
        let mix = match step / 16 {
            0 => (b & c) | (!b & d),
            1 => (b & d) | (c & !d),
            2 => b ^ c ^ d,
            _ => c ^ (b | !d),
        };
        let sum = a
            .wrapping_add(mix)
            .wrapping_add(words[MESSAGE_INDEX[step]])
            .wrapping_add(K[step]);
        let rotated = b.wrapping_add(sum.rotate_left(SHIFT[step]));
        (a, b, c, d) = (d, rotated, b, c);
    }
    wipe(&mut words, 0);

    [
        state[0].wrapping_add(a),
        state[1].wrapping_add(b),
        state[2].wrapping_add(c),
        state[3].wrapping_add(d),
    ]
}

/// Streaming MD5 hasher. State and staged input are wiped on drop.
#[derive(Clone)]
pub struct Md5 {
    state: [u32; 4],
    buffer: BlockBuffer,
}

impl Default for Md5 {
    fn default() -> Self {
        Self {
            state: INITIAL_STATE,
            buffer: BlockBuffer::new(),
        }
    }
}

impl Md5 {
    /// Total input bytes accepted so far, modulo 2^64.
    pub fn bytes_hashed(&self) -> u64 {
        self.buffer.total_bytes()
    }
}

impl Digest for Md5 {
    const ALGORITHM: Algorithm = Algorithm::Md5;
    type Output = [u8; OUTPUT_LEN];

    fn update(&mut self, data: &[u8]) {
        let state = &mut self.state;
        self.buffer.feed(data, |block| *state = compress(*state, block));
    }

    fn finalize(mut self) -> Self::Output {
        let state = &mut self.state;
        self.buffer
            .finish(LengthOrder::Little, |block| *state = compress(*state, block));

        let mut out = [0u8; OUTPUT_LEN];
        for (bytes, word) in out.chunks_exact_mut(4).zip(self.state) {
            bytes.copy_from_slice(&word.to_le_bytes());
        }
        out
    }
}

impl Drop for Md5 {
    fn drop(&mut self) {
        wipe(&mut self.state, 0);
    }
}

impl fmt::Debug for Md5 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Md5")
            .field("bytes_hashed", &self.bytes_hashed())
            .finish_non_exhaustive()
    }
}
