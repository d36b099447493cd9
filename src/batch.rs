use std::fs::File;
use std::io::{self, Read, Write};

use rayon::prelude::*;

use crate::error::DigestError;
use crate::session::{Algorithm, DigestSession, HexDigest};
use crate::util::{Input, InputSource};

/// Result for one input, carried back in submission order.
#[derive(Debug)]
pub struct HashOutcome {
    pub display_name: String,
    pub result: Result<HexDigest, DigestError>,
    pub bytes_hashed: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HashSummary {
    pub files_hashed: usize,
    pub files_failed: usize,
    pub bytes_hashed: u64,
}

impl HashSummary {
    pub fn success(&self) -> bool {
        self.files_failed == 0
    }
}

/// Hash one input to completion. Each call owns its own session; nothing is shared.
fn hash_input<R: Read>(algorithm: Algorithm, input: Input, stdin: &mut R) -> HashOutcome {
    let Input {
        display_name,
        source,
    } = input;
    let mut session = DigestSession::start(algorithm);

    let read = match source {
        InputSource::Stdin => session.feed_reader(stdin),
        InputSource::File(path) => match File::open(&path) {
            Ok(file) => session.feed_reader(file),
            Err(source) => Err(DigestError::Open { path, source }),
        },
        InputSource::Failed(err) => Err(err),
    };

    match read {
        Ok(bytes_hashed) => {
            tracing::trace!(name = %display_name, bytes_hashed, "hashed input");
            HashOutcome {
                display_name,
                result: Ok(session.finish()),
                bytes_hashed,
            }
        }
        Err(err) => {
            tracing::debug!(name = %display_name, error = %err, "input failed");
            HashOutcome {
                display_name,
                result: Err(err),
                bytes_hashed: 0,
            }
        }
    }
}

/// Hash every input on the current Rayon pool, reading `-` entries from the process stdin.
///
/// Inputs complete in any order, but the returned outcomes line up with `inputs`.
pub fn hash_inputs(algorithm: Algorithm, inputs: Vec<Input>) -> Vec<HashOutcome> {
    hash_inputs_with_stdin(algorithm, inputs, io::stdin().lock())
}

/// Like [`hash_inputs`], with `stdin` standing in for standard input.
///
/// Files are hashed in parallel. Stdin entries share one stream, so they are hashed one after
/// another in submission order: the first drains it, later ones see end of input.
pub fn hash_inputs_with_stdin<R: Read>(
    algorithm: Algorithm,
    inputs: Vec<Input>,
    mut stdin: R,
) -> Vec<HashOutcome> {
    tracing::debug!(%algorithm, count = inputs.len(), "hashing inputs");
    let (stdin_inputs, other_inputs): (Vec<_>, Vec<_>) = inputs
        .into_iter()
        .enumerate()
        .partition(|(_, input)| matches!(input.source, InputSource::Stdin));

    // No stdin entries remain here, so each worker gets an empty stand-in.
    let mut outcomes: Vec<(usize, HashOutcome)> = other_inputs
        .into_par_iter()
        .map(|(index, input)| (index, hash_input(algorithm, input, &mut io::empty())))
        .collect();
    outcomes.extend(
        stdin_inputs
            .into_iter()
            .map(|(index, input)| (index, hash_input(algorithm, input, &mut stdin))),
    );
    outcomes.sort_unstable_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Print `"<hex>  <name>\n"` for each success to `out` and a diagnostic for each failure to
/// `err`. Failed inputs produce no digest line.
pub fn write_report<O: Write, E: Write>(
    outcomes: &[HashOutcome],
    out: &mut O,
    err: &mut E,
) -> io::Result<HashSummary> {
    let mut summary = HashSummary::default();
    for outcome in outcomes {
        match &outcome.result {
            Ok(hex) => {
                writeln!(out, "{hex}  {}", outcome.display_name)?;
                summary.files_hashed += 1;
                summary.bytes_hashed += outcome.bytes_hashed;
            }
            Err(e) => {
                writeln!(err, "hashsum: {}: {e}", outcome.display_name)?;
                summary.files_failed += 1;
            }
        }
    }
    out.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::*;
    use crate::session::digest;
    use crate::util::collect_inputs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hashsum_batch_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn outcomes_follow_submission_order() {
        let dir = scratch_dir("order");
        let mut operands = Vec::new();
        for i in 0..32u32 {
            let path = dir.join(format!("f{i:02}"));
            // Larger files first so later inputs tend to finish earlier.
            fs::write(&path, vec![i as u8; (32 - i as usize) * 10_000]).unwrap();
            operands.push(path);
        }

        let outcomes = hash_inputs(Algorithm::Md5, collect_inputs(&operands, false));
        assert_eq!(outcomes.len(), 32);
        for (i, (outcome, path)) in outcomes.iter().zip(&operands).enumerate() {
            assert_eq!(outcome.display_name, path.display().to_string());
            let expected = digest(Algorithm::Md5, &vec![i as u8; (32 - i) * 10_000]);
            assert_eq!(outcome.result.as_ref().unwrap(), &expected);
        }
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn repeated_stdin_operands_share_one_stream() {
        let dir = scratch_dir("stdin");
        let file = dir.join("file.txt");
        fs::write(&file, b"file contents").unwrap();
        let operands = [PathBuf::from("-"), file.clone(), PathBuf::from("-")];

        let outcomes = hash_inputs_with_stdin(
            Algorithm::Md5,
            collect_inputs(&operands, false),
            Cursor::new(b"abc".to_vec()),
        );
        let names: Vec<_> = outcomes.iter().map(|o| o.display_name.as_str()).collect();
        assert_eq!(names, ["-", file.display().to_string().as_str(), "-"]);
        assert_eq!(
            outcomes[0].result.as_ref().unwrap().as_str(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(outcomes[0].bytes_hashed, 3);
        assert_eq!(
            outcomes[1].result.as_ref().unwrap(),
            &digest(Algorithm::Md5, b"file contents")
        );
        assert_eq!(
            outcomes[2].result.as_ref().unwrap().as_str(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(outcomes[2].bytes_hashed, 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let dir = scratch_dir("fail");
        let good = dir.join("good.txt");
        fs::write(&good, b"abc").unwrap();
        let missing = dir.join("missing.txt");

        let outcomes = hash_inputs(
            Algorithm::Sha1,
            collect_inputs(&[missing.clone(), good.clone()], false),
        );
        assert!(matches!(outcomes[0].result, Err(DigestError::Open { .. })));
        assert_eq!(
            outcomes[1].result.as_ref().unwrap().as_str(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );

        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = write_report(&outcomes, &mut out, &mut err).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("a9993e364706816aba3e25717850c26c9cd0d89d  {}\n", good.display())
        );
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with(&format!("hashsum: {}: ", missing.display())));
        assert_eq!(
            summary,
            HashSummary {
                files_hashed: 1,
                files_failed: 1,
                bytes_hashed: 3
            }
        );
        assert!(!summary.success());
        fs::remove_dir_all(&dir).unwrap();
    }
}
