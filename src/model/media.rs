//! Media item model structures.

use serde::{Deserialize, Serialize};

/// Category of an embedded media object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Picture (PNG, JPEG, GIF, BMP, TIFF, WMF, EMF, SVG)
    Image,
    /// Movie
    Video,
    /// Sound
    Audio,
    /// Anything else embedded as media
    Other,
}

impl MediaKind {
    /// Determine media kind from a MIME content type.
    pub fn from_content_type(content_type: &str) -> Self {
        let lower = content_type.to_lowercase();
        if lower.starts_with("image/") {
            MediaKind::Image
        } else if lower.contains("video") {
            MediaKind::Video
        } else if lower.contains("audio") {
            MediaKind::Audio
        } else {
            MediaKind::Other
        }
    }

    /// Determine media kind from a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "tif" | "wmf" | "emf" | "svg"
            | "webp" => MediaKind::Image,
            "mp4" | "m4v" | "avi" | "mov" | "wmv" | "webm" | "mpg" | "mpeg" => MediaKind::Video,
            "mp3" | "wav" | "ogg" | "m4a" | "wma" | "aac" | "mid" | "midi" => MediaKind::Audio,
            _ => MediaKind::Other,
        }
    }

    /// Lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Other => "other",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One media reference on a slide, as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Media category
    #[serde(rename = "type")]
    pub kind: MediaKind,

    /// True size of the stored object in bytes
    pub size_bytes: u64,

    /// Bytes this occurrence adds to its slide's totals
    pub attributed_bytes: u64,

    /// Part file name inside the package (e.g. "image3.png")
    pub filename: Option<String>,

    /// MIME content type
    pub content_type: Option<String>,

    /// Slide relationship id that referenced the object
    pub relationship_id: Option<String>,

    /// Whether the same bytes are referenced by more than one slide
    pub shared: bool,
}
