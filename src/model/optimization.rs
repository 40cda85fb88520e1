//! Image optimization opportunity structures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of savings an image could yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    /// Stored at far more pixels than it is displayed at
    OversizedResolution,
    /// Longest edge exceeds any realistic projector
    AbsoluteSize,
    /// Large PNG that would compress far better as JPEG
    PngPhoto,
    /// JPEG saved at a needlessly high quality
    UncompressedJpeg,
}

impl OpportunityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::OversizedResolution => "oversized_resolution",
            OpportunityType::AbsoluteSize => "absolute_size",
            OpportunityType::PngPhoto => "png_photo",
            OpportunityType::UncompressedJpeg => "uncompressed_jpeg",
        }
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of an opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width and height in pixels, rendered as `WxH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count.
    pub fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Length of the longer edge.
    pub fn longest_edge(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for Dimensions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dimensions {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let (w, h) = text
            .split_once('x')
            .ok_or_else(|| serde::de::Error::custom(format!("expected WxH, got {text:?}")))?;
        let parse = |s: &str| s.trim().parse::<u32>().map_err(serde::de::Error::custom);
        Ok(Dimensions::new(parse(w)?, parse(h)?))
    }
}

/// A potential byte saving on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOpportunity {
    /// Slide where the image first appears
    pub slide_index: usize,
    pub slide_title: Option<String>,
    pub opportunity_type: OpportunityType,
    pub current_bytes: u64,
    pub potential_bytes: u64,
    pub savings_bytes: u64,
    /// Rounded to one decimal place
    pub savings_percent: f64,
    pub current_dimensions: Dimensions,
    pub display_dimensions: Dimensions,
    pub recommended_dimensions: Dimensions,
    pub current_format: String,
    pub recommended_format: String,
    /// Human-readable explanation
    pub details: String,
    pub severity: Severity,
    /// The image appears on more than one slide
    pub is_shared: bool,
}
