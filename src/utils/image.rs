//! Turns a local image file into a `data:` URI for attachment.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;

use crate::core::config::data::path_display;

/// Inline request payloads above this size are rejected by the provider.
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug)]
pub enum AttachmentError {
    Read { path: PathBuf, source: std::io::Error },
    UnsupportedType { path: PathBuf },
    TooLarge { path: PathBuf, bytes: u64 },
}

impl fmt::Display for AttachmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path_display(path), source)
            }
            AttachmentError::UnsupportedType { path } => write!(
                f,
                "{} is not a supported image (jpg, png, gif, webp, heic)",
                path_display(path)
            ),
            AttachmentError::TooLarge { path, bytes } => write!(
                f,
                "{} is too large ({} KB, limit {} KB)",
                path_display(path),
                bytes / 1024,
                MAX_IMAGE_BYTES / 1024
            ),
        }
    }
}

impl Error for AttachmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AttachmentError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::prelude::BASE64_STANDARD.encode(bytes)
    )
}

/// Reads `path` and encodes it as `data:<mime>;base64,<payload>`.
pub fn file_to_data_uri(path: &Path) -> Result<String, AttachmentError> {
    let mime = mime_for_path(path).ok_or_else(|| AttachmentError::UnsupportedType {
        path: path.to_path_buf(),
    })?;

    let metadata = fs::metadata(path).map_err(|source| AttachmentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > MAX_IMAGE_BYTES {
        return Err(AttachmentError::TooLarge {
            path: path.to_path_buf(),
            bytes: metadata.len(),
        });
    }

    let bytes = fs::read(path).map_err(|source| AttachmentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encode_data_uri(mime, &bytes))
}

/// MIME type declared in a data URI header, if any.
pub fn data_uri_mime(uri: &str) -> Option<&str> {
    let header = uri.strip_prefix("data:")?.split_once(',')?.0;
    let mime = header.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// Approximate decoded size of a base64 data URI payload.
pub fn data_uri_decoded_len(uri: &str) -> usize {
    let payload = uri.split_once(',').map(|(_, p)| p).unwrap_or(uri);
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    (payload.len() / 4 * 3).saturating_sub(padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn encodes_png_with_declared_mime() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("problem.PNG");
        fs::write(&path, b"abc").expect("write");

        let uri = file_to_data_uri(&path).expect("encode");
        assert_eq!(uri, "data:image/png;base64,YWJj");
        assert_eq!(data_uri_mime(&uri), Some("image/png"));
        assert_eq!(data_uri_decoded_len(&uri), 3);
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = file_to_data_uri(Path::new("notes.txt")).expect_err("unsupported");
        assert!(matches!(err, AttachmentError::UnsupportedType { .. }));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = TempDir::new().expect("temp dir");
        let err = file_to_data_uri(&dir.path().join("absent.jpg")).expect_err("missing");
        assert!(matches!(err, AttachmentError::Read { .. }));
    }

    #[test]
    fn decoded_len_accounts_for_padding() {
        assert_eq!(data_uri_decoded_len("data:image/jpeg;base64,YQ=="), 1);
        assert_eq!(data_uri_decoded_len("YWI="), 2);
        assert_eq!(data_uri_mime("YWI="), None);
    }
}
