//! Static estimate of image resize and recompression savings.
//!
//! Nothing is re-encoded: the estimates come from pixel dimensions, the
//! on-slide display size and the byte size alone. Every distinct image is
//! judged once, at its placement on the first slide that uses it, using its
//! true size whatever attribution policy the byte report ran with.

use crate::attribution::{Discovery, Placement};
use crate::model::{Dimensions, MediaKind, OpportunityType, OptimizationOpportunity, Severity};
use crate::pptx::Slide;
use crate::registry::{ImageFormat, RegistryEntry};
use std::collections::HashSet;
use tracing::debug;

pub const EMUS_PER_INCH: u64 = 914_400;
pub const SCREEN_DPI: u64 = 96;

/// Images stored above this multiple of their display size are flagged.
pub const OVERSIZE_RATIO: f64 = 2.5;
/// Above this multiple the finding is high priority.
pub const HIGH_OVERSIZE_RATIO: f64 = 5.0;
/// Multiple of the display size kept for high-density screens.
pub const RETINA_FACTOR: u64 = 2;
/// Longest edge above which an image is flagged regardless of display size.
pub const MAX_EDGE_PX: u32 = 3200;
/// Longest edge recommended for projection.
pub const TARGET_EDGE_PX: u64 = 2560;
pub const PNG_PHOTO_MIN_BYTES: u64 = 1_000_000;
pub const PNG_PHOTO_MEDIUM_BYTES: u64 = 3_000_000;

/// Convert EMU to screen pixels at 96 DPI, truncating.
pub fn emu_to_px(emu: u64) -> u32 {
    let px = u128::from(emu) * u128::from(SCREEN_DPI) / u128::from(EMUS_PER_INCH);
    u32::try_from(px).unwrap_or(u32::MAX)
}

/// Everything the classifier knows about one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProfile {
    pub slide_index: usize,
    pub slide_title: Option<String>,
    pub is_shared: bool,
    pub pixels: Dimensions,
    pub display: Dimensions,
    pub format: ImageFormat,
    pub content_type: Option<String>,
    pub bytes: u64,
}

impl ImageProfile {
    /// How many times larger than its display size the image is stored.
    ///
    /// 1.0 when the display size is unknown or zero.
    pub fn resolution_ratio(&self) -> f64 {
        if self.display.width == 0 || self.display.height == 0 {
            return 1.0;
        }
        let w = f64::from(self.pixels.width) / f64::from(self.display.width);
        let h = f64::from(self.pixels.height) / f64::from(self.display.height);
        w.max(h)
    }

    fn format_name(&self) -> String {
        match self.format {
            ImageFormat::Other => self
                .content_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            format => format.as_str().to_string(),
        }
    }

    fn opportunity(
        &self,
        opportunity_type: OpportunityType,
        potential_bytes: u64,
        recommended_dimensions: Dimensions,
        formats: (String, String),
        details: String,
        severity: Severity,
    ) -> OptimizationOpportunity {
        let savings_bytes = self.bytes.saturating_sub(potential_bytes);
        OptimizationOpportunity {
            slide_index: self.slide_index,
            slide_title: self.slide_title.clone(),
            opportunity_type,
            current_bytes: self.bytes,
            potential_bytes,
            savings_bytes,
            savings_percent: percent(savings_bytes, self.bytes),
            current_dimensions: self.pixels,
            display_dimensions: self.display,
            recommended_dimensions,
            current_format: formats.0,
            recommended_format: formats.1,
            details,
            severity,
            is_shared: self.is_shared,
        }
    }

    /// Bytes left after scaling the image down to `target`.
    fn scaled_bytes(&self, target: Dimensions) -> u64 {
        let current = self.pixels.pixels();
        if current == 0 {
            return self.bytes;
        }
        (u128::from(self.bytes) * u128::from(target.pixels()) / u128::from(current)) as u64
    }
}

/// Percentage rounded to one decimal place.
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// Fit `target` inside the aspect ratio of `pixels`, shrinking one edge.
fn fit_aspect(pixels: Dimensions, target_w: u64, target_h: u64) -> Dimensions {
    let (pw, ph) = (u128::from(pixels.width), u128::from(pixels.height));
    let (tw, th) = (u128::from(target_w), u128::from(target_h));
    let (w, h) = if tw * ph > pw * th {
        (th * pw / ph, th)
    } else {
        (tw, tw * ph / pw)
    };
    Dimensions::new(clamp_u32(w), clamp_u32(h))
}

fn clamp_u32(v: impl TryInto<u32>) -> u32 {
    v.try_into().unwrap_or(u32::MAX)
}

/// Apply every savings rule to one image.
///
/// The rules are independent: an image can be both oversized for its
/// display and above the absolute edge limit.
pub fn classify(profile: &ImageProfile) -> Vec<OptimizationOpportunity> {
    let mut found = Vec::new();
    let pixels = profile.pixels;
    if pixels.width == 0 || pixels.height == 0 {
        return found;
    }
    let same_format = || (profile.format_name(), profile.format_name());

    let ratio = profile.resolution_ratio();
    if ratio > OVERSIZE_RATIO {
        let target = fit_aspect(
            pixels,
            u64::from(profile.display.width) * RETINA_FACTOR,
            u64::from(profile.display.height) * RETINA_FACTOR,
        );
        found.push(profile.opportunity(
            OpportunityType::OversizedResolution,
            profile.scaled_bytes(target),
            target,
            same_format(),
            format!(
                "Image is {:.1}x larger than its display size. Resizing to 2x (retina) keeps it sharp on every screen.",
                ratio
            ),
            if ratio > HIGH_OVERSIZE_RATIO {
                Severity::High
            } else {
                Severity::Medium
            },
        ));
    }

    let longest = pixels.longest_edge();
    if longest > MAX_EDGE_PX {
        let (pw, ph) = (u64::from(pixels.width), u64::from(pixels.height));
        let target = if pw > ph {
            Dimensions::new(clamp_u32(TARGET_EDGE_PX), clamp_u32(TARGET_EDGE_PX * ph / pw))
        } else {
            Dimensions::new(clamp_u32(TARGET_EDGE_PX * pw / ph), clamp_u32(TARGET_EDGE_PX))
        };
        found.push(profile.opportunity(
            OpportunityType::AbsoluteSize,
            profile.scaled_bytes(target),
            target,
            same_format(),
            format!(
                "Image is {}px on its longest edge. Projectors rarely exceed 1920x1080; {}px is plenty for high-quality projection.",
                longest, TARGET_EDGE_PX
            ),
            Severity::Medium,
        ));
    }

    if profile.format == ImageFormat::Png && profile.bytes > PNG_PHOTO_MIN_BYTES {
        found.push(profile.opportunity(
            OpportunityType::PngPhoto,
            profile.bytes * 3 / 10,
            pixels,
            ("PNG".to_string(), "JPEG".to_string()),
            format!(
                "Large PNG ({}). For photos, JPEG at quality 85-90 looks the same and is far smaller.",
                crate::render::format_bytes(profile.bytes)
            ),
            if profile.bytes > PNG_PHOTO_MEDIUM_BYTES {
                Severity::Medium
            } else {
                Severity::Low
            },
        ));
    }

    if profile.format == ImageFormat::Jpeg && profile.bytes > pixels.pixels() {
        let bytes_per_pixel = profile.bytes as f64 / pixels.pixels() as f64;
        found.push(profile.opportunity(
            OpportunityType::UncompressedJpeg,
            profile.bytes / 2,
            pixels,
            (
                "JPEG (high quality)".to_string(),
                "JPEG (quality 85)".to_string(),
            ),
            format!(
                "JPEG uses {:.2} bytes/pixel, which suggests quality 95-100. Re-saving at quality 85 looks the same when projected.",
                bytes_per_pixel
            ),
            Severity::Low,
        ));
    }

    found
}

/// Build the profile of an image placement, if its dimensions are known.
fn profile_for(
    entry: &RegistryEntry,
    placement: &Placement,
    slide: &Slide,
) -> Option<ImageProfile> {
    let image = entry.image?;
    let display = placement
        .extent
        .map(|e| Dimensions::new(emu_to_px(e.cx), emu_to_px(e.cy)))
        .unwrap_or_default();

    Some(ImageProfile {
        slide_index: slide.index,
        slide_title: slide.title.clone(),
        is_shared: entry.is_shared(),
        pixels: image.dimensions,
        display,
        format: image.format,
        content_type: entry.content_type.clone(),
        bytes: entry.size,
    })
}

/// Find savings opportunities for every distinct image in the deck.
///
/// Sorted by savings descending, then slide index, then opportunity type.
pub fn analyze_optimizations(
    slides: &[Slide],
    discovery: &Discovery,
) -> Vec<OptimizationOpportunity> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for slide in slides {
        for placement in discovery.placements_on(slide.index) {
            let Some(entry) = discovery.registry.get(&placement.key) else {
                continue;
            };
            if entry.kind != MediaKind::Image {
                continue;
            }

            // Judge each image once, at its first placement on its first slide.
            if entry.first_slide() != Some(slide.index) || !seen.insert(placement.key) {
                continue;
            }

            match profile_for(entry, placement, slide) {
                Some(profile) => found.extend(classify(&profile)),
                None => debug!(
                    "slide {}: no pixel dimensions for {}, skipping",
                    slide.index,
                    entry.filename.as_deref().unwrap_or("(unnamed image)")
                ),
            }
        }
    }

    found.sort_by(|a, b| {
        b.savings_bytes
            .cmp(&a.savings_bytes)
            .then(a.slide_index.cmp(&b.slide_index))
            .then(a.opportunity_type.cmp(&b.opportunity_type))
    });
    found
}
