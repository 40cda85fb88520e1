//! CSV renderer implementation.

use crate::error::{Error, Result};
use crate::model::SlideMediaStats;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 8] = [
    "rank",
    "slide_index",
    "slide_title",
    "total_media_bytes",
    "image_bytes",
    "video_bytes",
    "audio_bytes",
    "other_media_bytes",
];

/// Write ranked slide stats as CSV to any writer.
///
/// Rows follow the given order; rank is the 1-based row number. A missing
/// title is an empty cell.
pub fn to_csv_writer<W: Write>(results: &[SlideMediaStats], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for (rank, stats) in results.iter().enumerate() {
        csv.write_record([
            (rank + 1).to_string(),
            stats.slide_index.to_string(),
            stats.slide_title.clone().unwrap_or_default(),
            stats.total_media_bytes.to_string(),
            stats.image_bytes.to_string(),
            stats.video_bytes.to_string(),
            stats.audio_bytes.to_string(),
            stats.other_media_bytes.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Render ranked slide stats to a CSV string.
pub fn to_csv(results: &[SlideMediaStats]) -> Result<String> {
    let mut buf = Vec::new();
    to_csv_writer(results, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Csv(e.to_string()))
}

/// Write ranked slide stats to a CSV file.
pub fn write_csv(results: &[SlideMediaStats], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| Error::output_write(path, e))?;
    to_csv_writer(results, file).map_err(|e| Error::output_write(path, e))?;

    info!("CSV output written to: {}", path.display());
    Ok(())
}
