//! Per-slide media statistics.

use super::media::{MediaItem, MediaKind};
use serde::{Deserialize, Serialize};

/// Media weight attributed to one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideMediaStats {
    /// 1-based slide number in document order
    pub slide_index: usize,
    /// Title placeholder text, if the slide has one
    pub slide_title: Option<String>,
    /// Sum of the four category totals
    pub total_media_bytes: u64,
    pub image_bytes: u64,
    pub video_bytes: u64,
    pub audio_bytes: u64,
    pub other_media_bytes: u64,
    /// Media references in shape order
    pub media_items: Vec<MediaItem>,
}

impl SlideMediaStats {
    /// Create stats for a slide with no media.
    pub fn new(slide_index: usize, slide_title: Option<String>) -> Self {
        Self {
            slide_index,
            slide_title,
            total_media_bytes: 0,
            image_bytes: 0,
            video_bytes: 0,
            audio_bytes: 0,
            other_media_bytes: 0,
            media_items: Vec::new(),
        }
    }

    /// Append a media item, adding its attributed bytes to the matching category.
    pub fn push_item(&mut self, item: MediaItem) {
        let bytes = item.attributed_bytes;
        match item.kind {
            MediaKind::Image => self.image_bytes += bytes,
            MediaKind::Video => self.video_bytes += bytes,
            MediaKind::Audio => self.audio_bytes += bytes,
            MediaKind::Other => self.other_media_bytes += bytes,
        }
        self.total_media_bytes =
            self.image_bytes + self.video_bytes + self.audio_bytes + self.other_media_bytes;
        self.media_items.push(item);
    }

    /// Title for display, falling back to "(no title)".
    pub fn display_title(&self) -> &str {
        self.slide_title.as_deref().unwrap_or("(no title)")
    }
}
