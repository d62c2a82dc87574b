/*!
 * Reading file content with a size ceiling
 */

use std::fs;
use std::io;
use std::path::Path;

use crate::types::{Content, UnreadableReason};

/// Default maximum file size whose content is materialized (1 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

#[cfg(target_os = "linux")]
const NAME_TOO_LONG: i32 = 36;
#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
const NAME_TOO_LONG: i32 = 63;
#[cfg(windows)]
const NAME_TOO_LONG: i32 = 206;
#[cfg(not(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    windows
)))]
const NAME_TOO_LONG: i32 = -1;

/// Read a file as text, or return the placeholder describing why it was not read
///
/// Files larger than `max_size` are never opened. Invalid UTF-8 sequences
/// are replaced rather than rejected.
pub fn read_content(path: &Path, max_size: u64) -> Content {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => return Content::Unreadable(classify_error(&e)),
    };

    if metadata.is_dir() {
        return Content::Unreadable(UnreadableReason::IsDirectory);
    }

    if metadata.len() > max_size {
        return Content::TooLarge(metadata.len());
    }

    match fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Content::Text(text),
            Err(e) => Content::Text(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        },
        Err(e) => Content::Unreadable(classify_error(&e)),
    }
}

/// Map an I/O error to the reason shown to the reader
pub fn classify_error(error: &io::Error) -> UnreadableReason {
    if error.raw_os_error() == Some(NAME_TOO_LONG) {
        return UnreadableReason::PathTooLong;
    }

    match error.kind() {
        io::ErrorKind::PermissionDenied => UnreadableReason::PermissionDenied,
        io::ErrorKind::NotFound => UnreadableReason::NotFound,
        io::ErrorKind::IsADirectory => UnreadableReason::IsDirectory,
        _ => UnreadableReason::Other(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_reads_text_verbatim() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("crlf.txt");
        File::create(&path)?.write_all(b"one\r\ntwo\n")?;

        assert_eq!(
            read_content(&path, DEFAULT_MAX_FILE_SIZE),
            Content::Text("one\r\ntwo\n".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_too_large_placeholder() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("big.txt");
        File::create(&path)?.write_all("x".repeat(500).as_bytes())?;

        let content = read_content(&path, 100);
        assert_eq!(content, Content::TooLarge(500));
        assert_eq!(content.to_string(), "[File too large to display: 0.00 MB]");
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let content = read_content(Path::new("/definitely/not/here.txt"), DEFAULT_MAX_FILE_SIZE);
        assert_eq!(content, Content::Unreadable(UnreadableReason::NotFound));
        assert!(content.to_string().starts_with('['));
    }

    #[test]
    fn test_directory_path() -> io::Result<()> {
        let dir = tempdir()?;
        assert_eq!(
            read_content(dir.path(), DEFAULT_MAX_FILE_SIZE),
            Content::Unreadable(UnreadableReason::IsDirectory)
        );
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_replaced() -> io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("latin1.txt");
        File::create(&path)?.write_all(&[b'c', b'a', b'f', 0xE9])?;

        let content = read_content(&path, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(content, Content::Text("caf\u{FFFD}".to_string()));
        Ok(())
    }
}
