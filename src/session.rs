//! Runtime algorithm selection and hex output.

use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

use crate::block::wipe;
use crate::error::{DigestError, ParseAlgorithmError};
use crate::md5::{self, Md5};
use crate::sha1::{self, Sha1};
use crate::Digest;

/// Size of each read issued against a byte source.
pub const READ_CHUNK_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// 128-bit MD5.
    Md5,
    /// 160-bit SHA-1.
    Sha1,
}

impl Algorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
        }
    }

    /// Digest size in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Algorithm::Md5 => md5::OUTPUT_LEN,
            Algorithm::Sha1 => sha1::OUTPUT_LEN,
        }
    }

    /// Digest size in hex characters.
    pub const fn hex_len(self) -> usize {
        self.output_len() * 2
    }

    /// Map an invoked command name (`md5sum`, `/usr/bin/sha1sum`, `sha1sum.exe`) to an algorithm.
    pub fn from_program_name(program: &str) -> Option<Self> {
        let file_name = program.rsplit(['/', '\\']).next().unwrap_or(program);
        let stem = file_name.strip_suffix(".exe").unwrap_or(file_name);
        match stem {
            "md5sum" => Some(Algorithm::Md5),
            "sha1sum" => Some(Algorithm::Sha1),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" | "sha-1" => Ok(Algorithm::Sha1),
            _ => Err(ParseAlgorithmError(s.to_owned())),
        }
    }
}

/// Lowercase hexadecimal rendering of a finished digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexDigest(String);

impl HexDigest {
    fn encode(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One digest computation for an algorithm chosen at runtime.
///
/// A session is single-use: [`DigestSession::finish`] consumes it, so feeding after the digest
/// has been produced does not type-check. Dropping a session at any point wipes its state.
#[derive(Debug, Clone)]
pub enum DigestSession {
    Md5(Md5),
    Sha1(Sha1),
}

impl DigestSession {
    pub fn start(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Md5 => DigestSession::Md5(Md5::new()),
            Algorithm::Sha1 => DigestSession::Sha1(Sha1::new()),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            DigestSession::Md5(_) => Algorithm::Md5,
            DigestSession::Sha1(_) => Algorithm::Sha1,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        match self {
            DigestSession::Md5(h) => h.update(bytes),
            DigestSession::Sha1(h) => h.update(bytes),
        }
    }

    /// Total input bytes accepted so far, modulo 2^64.
    pub fn bytes_hashed(&self) -> u64 {
        match self {
            DigestSession::Md5(h) => h.bytes_hashed(),
            DigestSession::Sha1(h) => h.bytes_hashed(),
        }
    }

    /// Drain `reader` into the session in [`READ_CHUNK_LEN`] chunks until end of input.
    ///
    /// Interrupted reads are reissued; any other error ends the stream and is returned
    /// as [`DigestError::InputRead`]. Returns the number of bytes read.
    pub fn feed_reader<R: Read>(&mut self, mut reader: R) -> Result<u64, DigestError> {
        let mut chunk = vec![0u8; READ_CHUNK_LEN];
        let mut read = 0u64;
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    self.feed(&chunk[..n]);
                    read += n as u64;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(DigestError::InputRead { source }),
            }
        }
        Ok(read)
    }

    /// Pad, compress the final block(s), and render the digest.
    pub fn finish(self) -> HexDigest {
        match self {
            DigestSession::Md5(h) => {
                let mut bytes = h.finalize();
                let hex = HexDigest::encode(&bytes);
                wipe(&mut bytes, 0);
                hex
            }
            DigestSession::Sha1(h) => {
                let mut bytes = h.finalize();
                let hex = HexDigest::encode(&bytes);
                wipe(&mut bytes, 0);
                hex
            }
        }
    }
}

/// Digest an in-memory byte string.
pub fn digest(algorithm: Algorithm, bytes: &[u8]) -> HexDigest {
    let mut session = DigestSession::start(algorithm);
    session.feed(bytes);
    session.finish()
}

/// Digest everything `reader` yields. A read failure discards the session; no digest is produced.
pub fn digest_reader<R: Read>(algorithm: Algorithm, reader: R) -> Result<HexDigest, DigestError> {
    let mut session = DigestSession::start(algorithm);
    session.feed_reader(reader)?;
    Ok(session.finish())
}
