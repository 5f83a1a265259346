//! Text file reading
//!
//! Sources and documents are read as bytes and decoded lossily, so a stray
//! invalid byte never stops a run. Lines are always split on '\n' with an
//! optional '\r', whatever the platform.

use std::fs;
use std::path::Path;

use crate::core::error::{RefersError, Result};

/// Read `path` as text, replacing invalid UTF-8 sequences
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| RefersError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::debug!(path = %path.display(), "invalid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a = 1  # @tag:a\n").unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "a = 1  # @tag:a\n");
    }

    #[test]
    fn test_read_lossy() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'a', 0xFF, b'b']).unwrap();
        assert_eq!(read_text(file.path()).unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn test_read_missing() {
        let err = read_text(Path::new("/definitely/not/here.py")).unwrap_err();
        assert_eq!(err.code(), "READ_FAILED");
    }
}
