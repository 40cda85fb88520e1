//! Content-addressed registry of the media objects in a presentation.
//!
//! Every media payload is keyed by the SHA-256 of its bytes, so the same
//! picture stored twice under different part names still counts as one
//! object. Each entry remembers which slides reference it; that slide set
//! is what the attribution policies are decided on.

use crate::model::{Dimensions, MediaKind};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Identity of one distinct media object: the SHA-256 of its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaKey([u8; 32]);

impl MediaKey {
    /// Compute the key for a payload.
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }
}

impl fmt::Display for MediaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for MediaKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raster format detected from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Other,
}

impl ImageFormat {
    /// Detect the format from the first bytes of an image.
    pub fn detect(data: &[u8]) -> Self {
        match imagesize::image_type(data) {
            Ok(imagesize::ImageType::Png) => ImageFormat::Png,
            Ok(imagesize::ImageType::Jpeg) => ImageFormat::Jpeg,
            Ok(imagesize::ImageType::Gif) => ImageFormat::Gif,
            Ok(imagesize::ImageType::Bmp) => ImageFormat::Bmp,
            Ok(imagesize::ImageType::Tiff) => ImageFormat::Tiff,
            Ok(imagesize::ImageType::Webp) => ImageFormat::Webp,
            _ => ImageFormat::Other,
        }
    }

    /// Upper-case name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Webp => "WEBP",
            ImageFormat::Other => "OTHER",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header facts about a raster image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub dimensions: Dimensions,
    pub format: ImageFormat,
}

impl ImageInfo {
    /// Read pixel dimensions and format without decoding the image.
    ///
    /// Returns `None` for vector formats and anything `imagesize` cannot read.
    pub fn probe(data: &[u8]) -> Option<Self> {
        let size = imagesize::blob_size(data).ok()?;
        let width = u32::try_from(size.width).ok()?;
        let height = u32::try_from(size.height).ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            dimensions: Dimensions::new(width, height),
            format: ImageFormat::detect(data),
        })
    }
}

/// Deduplicated record of one media object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub key: MediaKey,
    /// Size in bytes, fixed by the first registration
    pub size: u64,
    pub kind: MediaKind,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    /// Distinct 1-based slide indices referencing the object
    pub slides: BTreeSet<usize>,
    /// Header facts, for images only
    pub image: Option<ImageInfo>,
}

impl RegistryEntry {
    /// True when more than one slide references the object.
    pub fn is_shared(&self) -> bool {
        self.slides.len() > 1
    }

    /// Lowest slide index referencing the object.
    pub fn first_slide(&self) -> Option<usize> {
        self.slides.first().copied()
    }
}

/// All distinct media objects seen in a presentation.
#[derive(Debug, Clone, Default)]
pub struct MediaRegistry {
    entries: HashMap<MediaKey, RegistryEntry>,
}

impl MediaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `slide_index` references `data`.
    ///
    /// The first registration of a payload fixes its size, kind, content
    /// type, filename and image facts. Later registrations only add the
    /// slide to the entry's slide set.
    pub fn register(
        &mut self,
        slide_index: usize,
        data: &[u8],
        kind: MediaKind,
        content_type: Option<String>,
        filename: Option<String>,
    ) -> MediaKey {
        let key = MediaKey::of(data);
        let size = data.len() as u64;

        match self.entries.get_mut(&key) {
            Some(entry) => {
                if entry.size != size || entry.kind != kind {
                    warn!(
                        "media {} seen on slide {} as {} ({} bytes), keeping first observation {} ({} bytes)",
                        key, slide_index, kind, size, entry.kind, entry.size
                    );
                }
                entry.slides.insert(slide_index);
            }
            None => {
                let image = match kind {
                    MediaKind::Image => ImageInfo::probe(data),
                    _ => None,
                };
                debug!(
                    "registered {} {} ({} bytes) from slide {}",
                    kind,
                    filename.as_deref().unwrap_or("(unnamed)"),
                    size,
                    slide_index
                );
                self.entries.insert(
                    key,
                    RegistryEntry {
                        key,
                        size,
                        kind,
                        content_type,
                        filename,
                        slides: BTreeSet::from([slide_index]),
                        image,
                    },
                );
            }
        }

        key
    }

    pub fn get(&self, key: &MediaKey) -> Option<&RegistryEntry> {
        self.entries.get(key)
    }

    /// True when the object is referenced by more than one distinct slide.
    pub fn is_shared(&self, key: &MediaKey) -> bool {
        self.entries.get(key).is_some_and(RegistryEntry::is_shared)
    }

    /// Lowest slide index referencing the object.
    pub fn first_slide(&self, key: &MediaKey) -> Option<usize> {
        self.entries.get(key).and_then(RegistryEntry::first_slide)
    }

    /// Number of distinct objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by first slide, then key.
    pub fn entries(&self) -> Vec<&RegistryEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by_key(|e| (e.first_slide(), e.key));
        entries
    }

    /// Bytes stored once per distinct object.
    pub fn unique_bytes(&self) -> u64 {
        self.entries.values().map(|e| e.size).sum()
    }

    /// Bytes counted once per referencing slide.
    pub fn referenced_bytes(&self) -> u64 {
        self.entries
            .values()
            .map(|e| e.size * e.slides.len() as u64)
            .sum()
    }
}
