//! Slide master and layout media structures.

use super::media::MediaKind;
use serde::{Deserialize, Serialize};

/// Byte totals per media category for a master or layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTotals {
    pub total_media_bytes: u64,
    pub image_bytes: u64,
    pub video_bytes: u64,
    pub audio_bytes: u64,
    pub other_media_bytes: u64,
    pub media_count: usize,
}

impl MediaTotals {
    /// Count one media object of `size` bytes.
    pub fn add(&mut self, kind: MediaKind, size: u64) {
        match kind {
            MediaKind::Image => self.image_bytes += size,
            MediaKind::Video => self.video_bytes += size,
            MediaKind::Audio => self.audio_bytes += size,
            MediaKind::Other => self.other_media_bytes += size,
        }
        self.total_media_bytes += size;
        self.media_count += 1;
    }
}

/// Media stored on one slide layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMediaStats {
    pub layout_name: String,
    /// 1-based position within its master
    pub layout_index: usize,
    #[serde(flatten)]
    pub media: MediaTotals,
    /// Whether any slide uses this layout
    pub is_used: bool,
    /// 1-based indices of slides using this layout
    pub slides_using: Vec<usize>,
}

/// Media stored on one slide master and its layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterMediaStats {
    /// 1-based position in the presentation
    pub master_index: usize,
    pub master_name: Option<String>,
    /// Media placed directly on the master
    #[serde(flatten)]
    pub media: MediaTotals,
    pub layouts: Vec<LayoutMediaStats>,
    /// Sum of all layout media
    pub total_layout_bytes: u64,
    /// Media in layouts no slide uses
    pub unused_layout_bytes: u64,
}

impl MasterMediaStats {
    /// Name for display, falling back to "Master N".
    pub fn display_name(&self) -> String {
        self.master_name
            .clone()
            .unwrap_or_else(|| format!("Master {}", self.master_index))
    }
}

/// Media report over all slide masters and layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MastersReport {
    pub total_masters: usize,
    pub total_layouts: usize,
    pub unused_layouts: usize,
    pub total_master_media_bytes: u64,
    pub total_layout_media_bytes: u64,
    pub unused_layout_media_bytes: u64,
    pub masters: Vec<MasterMediaStats>,
}
