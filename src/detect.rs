//! Input validation for presentation packages.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Extension accepted as a presentation package.
pub const PPTX_EXTENSION: &str = "pptx";

/// Content type of the main presentation part.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Check that `path` names an existing `.pptx` file.
///
/// The extension check is case-insensitive. Content is not inspected here;
/// a file that exists with the right name but is not a package fails later
/// with [`Error::CorruptDocument`].
///
/// # Example
///
/// ```no_run
/// use slideweight::detect::validate_input;
///
/// validate_input("deck.pptx")?;
/// # Ok::<(), slideweight::Error>(())
/// ```
pub fn validate_input(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let is_pptx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PPTX_EXTENSION));
    if !is_pptx {
        return Err(Error::UnsupportedFileType(path.to_path_buf()));
    }

    Ok(())
}

/// Whether the bytes start with a ZIP local file header.
pub fn has_zip_magic(data: &[u8]) -> bool {
    data.len() >= ZIP_MAGIC.len() && data[..ZIP_MAGIC.len()] == ZIP_MAGIC
}

/// Whether the file at `path` starts with a ZIP local file header.
pub fn file_has_zip_magic(path: impl AsRef<Path>) -> Result<bool> {
    let mut head = [0u8; 4];
    let mut file = File::open(path.as_ref())?;
    let read = file.read(&mut head)?;
    Ok(has_zip_magic(&head[..read]))
}
