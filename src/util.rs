use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::DigestError;

/// Operand that stands for standard input.
pub const STDIN_OPERAND: &str = "-";

#[derive(Debug)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
    /// Discovery already failed; reported in order like any other per-input failure.
    Failed(DigestError),
}

/// One entry of the batch, in the order its digest line must appear.
#[derive(Debug)]
pub struct Input {
    pub display_name: String,
    pub source: InputSource,
}

impl Input {
    fn file(path: &Path) -> Self {
        Self {
            display_name: path.display().to_string(),
            source: InputSource::File(path.to_path_buf()),
        }
    }

    fn failed(path: &Path, error: DigestError) -> Self {
        Self {
            display_name: path.display().to_string(),
            source: InputSource::Failed(error),
        }
    }
}

/// Turn command-line operands into an ordered input list.
///
/// No operands means standard input. With `recursive`, a directory operand expands to the
/// regular files beneath it, sorted by name; without it, the directory is a per-input failure.
pub fn collect_inputs(operands: &[PathBuf], recursive: bool) -> Vec<Input> {
    if operands.is_empty() {
        return vec![Input {
            display_name: STDIN_OPERAND.to_owned(),
            source: InputSource::Stdin,
        }];
    }

    let mut inputs = Vec::with_capacity(operands.len());
    for operand in operands {
        if operand.as_os_str() == STDIN_OPERAND {
            inputs.push(Input {
                display_name: STDIN_OPERAND.to_owned(),
                source: InputSource::Stdin,
            });
        } else if operand.is_dir() {
            if recursive {
                walk_directory(operand, &mut inputs);
            } else {
                inputs.push(Input::failed(
                    operand,
                    DigestError::IsDirectory {
                        path: operand.clone(),
                    },
                ));
            }
        } else {
            inputs.push(Input::file(operand));
        }
    }
    inputs
}

/// Append every regular file under `root`. Unreadable entries become failed inputs.
fn walk_directory(root: &Path, inputs: &mut Vec<Input>) {
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => inputs.push(Input::file(entry.path())),
            Ok(_) => {}
            Err(source) => {
                let path = source.path().unwrap_or(root).to_path_buf();
                tracing::debug!(path = %path.display(), "unreadable directory entry");
                inputs.push(Input::failed(&path, DigestError::Walk { path: path.clone(), source }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hashsum_util_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn no_operands_reads_stdin() {
        let inputs = collect_inputs(&[], false);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].display_name, "-");
        assert!(matches!(inputs[0].source, InputSource::Stdin));
    }

    #[test]
    fn operands_keep_their_order() {
        let operands = [PathBuf::from("b.txt"), PathBuf::from("-"), PathBuf::from("a.txt")];
        let names: Vec<_> = collect_inputs(&operands, false)
            .into_iter()
            .map(|i| i.display_name)
            .collect();
        assert_eq!(names, ["b.txt", "-", "a.txt"]);
    }

    #[test]
    fn directory_without_recursion_fails() {
        let dir = scratch_dir("norec");
        let inputs = collect_inputs(&[dir.clone()], false);
        assert_eq!(inputs.len(), 1);
        assert!(matches!(
            inputs[0].source,
            InputSource::Failed(DigestError::IsDirectory { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn recursion_lists_files_sorted() {
        let dir = scratch_dir("rec");
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("z.txt"), b"z").unwrap();
        fs::write(dir.join("a.txt"), b"a").unwrap();
        fs::write(dir.join("sub/m.txt"), b"m").unwrap();

        let inputs = collect_inputs(&[dir.clone()], true);
        let names: Vec<_> = inputs
            .iter()
            .map(|i| match &i.source {
                InputSource::File(p) => p.strip_prefix(&dir).unwrap().to_path_buf(),
                other => panic!("unexpected source {other:?}"),
            })
            .collect();
        assert_eq!(
            names,
            [
                PathBuf::from("a.txt"),
                PathBuf::from("sub").join("m.txt"),
                PathBuf::from("z.txt")
            ]
        );
        fs::remove_dir_all(&dir).unwrap();
    }
}
