//! Filesystem checks built on `cap-std` and `camino`.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Resolve an ambient directory for the given path and return the directory
/// with the file name.
///
/// A bare file name resolves against the current directory.
fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_string();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Return whether a path exists and is a regular file using capability-based
/// IO.
pub(crate) fn path_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace")
    }

    #[rstest]
    fn regular_files_are_files() {
        let tmp = TempDir::new().expect("tempdir");
        let path = utf8_root(&tmp).join("unlocode.db");
        std::fs::write(&path, b"db").expect("write file");
        assert!(path_is_file(&path).expect("inspect path"));
    }

    #[rstest]
    fn directories_are_not_files() {
        let tmp = TempDir::new().expect("tempdir");
        let path = utf8_root(&tmp).join("nested");
        std::fs::create_dir(&path).expect("create directory");
        assert!(!path_is_file(&path).expect("inspect path"));
    }

    #[rstest]
    fn missing_paths_report_not_found() {
        let tmp = TempDir::new().expect("tempdir");
        let path = utf8_root(&tmp).join("missing.db");
        let err = path_is_file(&path).expect_err("missing path");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn bare_file_names_resolve_against_the_working_directory() {
        let err = path_is_file(Utf8Path::new("definitely-not-present-unlocode.db"))
            .expect_err("missing path");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
