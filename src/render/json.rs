//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::SlideMediaStats;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert ranked slide stats to a JSON array.
pub fn to_json(results: &[SlideMediaStats], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(results)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(results)?,
    };
    Ok(json)
}

/// Write ranked slide stats to a JSON file.
pub fn write_json(
    results: &[SlideMediaStats],
    path: impl AsRef<Path>,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(results, format)?;

    let file = File::create(path).map_err(|e| Error::output_write(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(json.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::output_write(path, e))?;

    info!("JSON output written to: {}", path.display());
    Ok(())
}
