//! Filesystem helpers shared by the batch operations

use std::fs;
use std::io;
use std::path::Path;

use super::LibraryError;

type Result<T> = std::result::Result<T, LibraryError>;

/// Move `from` to `to`, replacing any file already at `to`.
///
/// Uses a rename, which is atomic on the same filesystem. When the rename
/// crosses filesystems the file is copied and the original removed.
///
/// # Errors
/// Returns `LibraryError::Move` if neither strategy succeeds.
pub fn move_replace(from: &Path, to: &Path) -> Result<()> {
    let move_err = |source| LibraryError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(from = %from.display(), to = %to.display(), "rename crosses devices, copying");
            fs::copy(from, to).map_err(move_err)?;
            fs::remove_file(from).map_err(move_err)
        }
        Err(e) => Err(move_err(e)),
    }
}

/// True when both paths resolve to the same existing file
#[must_use]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// True when `dir` contains no entries at all
///
/// # Errors
/// Returns `LibraryError::Io` if the directory cannot be read.
pub fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut entries = fs::read_dir(dir).map_err(|e| LibraryError::io(dir, e))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{touch, write_file};
    use tempfile::TempDir;

    #[test]
    fn test_move_replace_moves() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.mp3");
        let to = dir.path().join("b.mp3");
        write_file(&from, b"payload");

        move_replace(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"payload");
    }

    #[test]
    fn test_move_replace_overwrites() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("new.mp3");
        let to = dir.path().join("old.mp3");
        write_file(&from, b"new");
        write_file(&to, b"old");

        move_replace(&from, &to).unwrap();
        assert_eq!(fs::read(&to).unwrap(), b"new");
    }

    #[test]
    fn test_move_replace_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = move_replace(&dir.path().join("gone.mp3"), &dir.path().join("x.mp3"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::Move { .. }));
    }

    #[test]
    fn test_same_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("x.mp3");
        touch(&file);
        let dotted = dir.path().join(".").join("x.mp3");
        assert!(same_file(&file, &dotted));
        assert!(!same_file(&file, &dir.path().join("y.mp3")));
    }

    #[test]
    fn test_is_empty_dir() {
        let dir = TempDir::new().unwrap();
        assert!(is_empty_dir(dir.path()).unwrap());
        touch(&dir.path().join("f"));
        assert!(!is_empty_dir(dir.path()).unwrap());
    }
}
