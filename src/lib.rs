//! Streaming MD5 and SHA-1 digests with `md5sum`/`sha1sum` compatible output.
//!
//! Both algorithms share one 64-byte block accumulator and Merkle–Damgård finalizer; only the
//! compression function, initial constants and byte order differ.
//!
//! ```
//! use hashsum::{digest, Algorithm, DigestSession};
//!
//! let mut session = DigestSession::start(Algorithm::Sha1);
//! session.feed(b"a");
//! session.feed(b"bc");
//! assert_eq!(session.finish(), digest(Algorithm::Sha1, b"abc"));
//! ```

mod batch;
mod block;
mod error;
pub mod md5;
mod session;
pub mod sha1;
mod util;

pub use batch::{hash_inputs, hash_inputs_with_stdin, write_report, HashOutcome, HashSummary};
pub use error::{DigestError, ParseAlgorithmError};
pub use md5::Md5;
pub use session::{digest, digest_reader, Algorithm, DigestSession, HexDigest, READ_CHUNK_LEN};
pub use sha1::Sha1;
pub use util::{collect_inputs, Input, InputSource};

/// A streaming hash over 64-byte blocks.
///
/// `finalize` consumes the hasher, so a finished computation cannot be fed again.
pub trait Digest: Default {
    const ALGORITHM: Algorithm;

    /// Raw digest bytes, typically `[u8; N]`.
    type Output: AsRef<[u8]> + Copy + Eq + core::fmt::Debug;

    #[must_use]
    fn new() -> Self {
        Self::default()
    }

    fn update(&mut self, data: &[u8]);

    #[must_use]
    fn finalize(self) -> Self::Output;

    /// Compute the digest of `data` in one shot.
    #[must_use]
    fn digest(data: &[u8]) -> Self::Output {
        let mut h = Self::new();
        h.update(data);
        h.finalize()
    }
}
