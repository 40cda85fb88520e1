//! # slideweight
//!
//! Find the slides that make a PowerPoint file heavy.
//!
//! This library attributes the bytes of embedded images, movies and sounds
//! to the slides that use them, ranks slides by their media weight,
//! estimates how much image resizing or recompression would save, and
//! reports media stored on slide masters and layouts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slideweight::{analyze_file, AnalysisOptions, SharedMediaPolicy};
//!
//! // Shared media is charged to its first slide by default
//! let analysis = analyze_file("deck.pptx", &AnalysisOptions::default())?;
//! for stats in analysis.results.iter().take(5) {
//!     println!("slide {}: {} bytes", stats.slide_index, stats.total_media_bytes);
//! }
//!
//! // Charge shared media to every slide that shows it
//! let options = AnalysisOptions::new().with_policy(SharedMediaPolicy::IncludeShared);
//! let analysis = analyze_file("deck.pptx", &options)?;
//! # Ok::<(), slideweight::Error>(())
//! ```
//!
//! ## Lower-Level APIs
//!
//! ```no_run
//! use slideweight::attribution::{attribute, discover, rank, SharedMediaPolicy};
//! use slideweight::pptx::PptxParser;
//!
//! let parser = PptxParser::open("deck.pptx")?;
//! let slides = parser.slides()?;
//! let discovery = discover(&slides, &parser);
//! let mut stats = attribute(&slides, &discovery, SharedMediaPolicy::IgnoreShared);
//! rank(&mut stats);
//! println!("{} distinct media objects", discovery.registry.len());
//! # Ok::<(), slideweight::Error>(())
//! ```

pub mod attribution;
pub mod container;
pub mod detect;
pub mod error;
pub mod masters;
pub mod model;
pub mod optimize;
pub mod pptx;
pub mod registry;
pub mod render;

// Re-exports
pub use attribution::{Discovery, MediaWarning, SharedMediaPolicy};
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use error::{Error, Result};
pub use model::{
    Dimensions, LayoutMediaStats, MasterMediaStats, MastersReport, MediaItem, MediaKind,
    OpportunityType, OptimizationOpportunity, Severity, SlideMediaStats,
};
pub use pptx::PptxParser;
pub use registry::{MediaKey, MediaRegistry, RegistryEntry};

use std::path::Path;
use tracing::info;

/// Options for the byte attribution analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// How bytes of media shared between slides are charged
    pub policy: SharedMediaPolicy,
}

impl AnalysisOptions {
    /// Create new analysis options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared-media policy.
    pub fn with_policy(mut self, policy: SharedMediaPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Charge shared media to every slide (`true`) or only its first slide.
    pub fn with_include_shared(self, include: bool) -> Self {
        self.with_policy(if include {
            SharedMediaPolicy::IncludeShared
        } else {
            SharedMediaPolicy::IgnoreShared
        })
    }
}

/// Outcome of [`analyze_file`].
#[derive(Debug, Clone)]
pub struct Analysis {
    /// One entry per slide, heaviest first
    pub results: Vec<SlideMediaStats>,
    /// Number of slides in the presentation
    pub slide_count: usize,
    /// Media shapes skipped because their payload could not be read
    pub warnings: Vec<MediaWarning>,
}

/// Validate `path` and open it as a presentation.
///
/// Missing files and wrong extensions keep their own errors; anything that
/// goes wrong while reading the package becomes [`Error::CorruptDocument`].
///
/// # Example
///
/// ```no_run
/// let parser = slideweight::open_presentation("deck.pptx")?;
/// println!("{} slides", parser.slide_count());
/// # Ok::<(), slideweight::Error>(())
/// ```
pub fn open_presentation(path: impl AsRef<Path>) -> Result<PptxParser> {
    let path = path.as_ref();
    detect::validate_input(path)?;

    if !detect::file_has_zip_magic(path).map_err(Error::into_corrupt)? {
        return Err(Error::CorruptDocument(
            "file is not a ZIP package".to_string(),
        ));
    }

    PptxParser::open(path).map_err(Error::into_corrupt)
}

/// Rank the slides of a presentation by attributed media bytes.
///
/// # Example
///
/// ```no_run
/// use slideweight::{analyze_file, AnalysisOptions};
///
/// let analysis = analyze_file("deck.pptx", &AnalysisOptions::default())?;
/// println!("heaviest: slide {}", analysis.results[0].slide_index);
/// # Ok::<(), slideweight::Error>(())
/// ```
pub fn analyze_file(path: impl AsRef<Path>, options: &AnalysisOptions) -> Result<Analysis> {
    let parser = open_presentation(path)?;
    let slides = parser.slides().map_err(Error::into_corrupt)?;
    info!("Analyzing {} slides", slides.len());

    let (results, discovery) = attribution::analyze(&slides, &parser, options.policy);
    Ok(Analysis {
        results,
        slide_count: slides.len(),
        warnings: discovery.warnings,
    })
}

/// Find image optimization opportunities in a presentation.
///
/// Savings are estimated from true image sizes, whatever attribution policy
/// a byte report would use.
pub fn analyze_optimizations_file(path: impl AsRef<Path>) -> Result<Vec<OptimizationOpportunity>> {
    let parser = open_presentation(path)?;
    let slides = parser.slides().map_err(Error::into_corrupt)?;
    info!(
        "Analyzing {} slides for optimization opportunities",
        slides.len()
    );

    let discovery = attribution::discover(&slides, &parser);
    Ok(optimize::analyze_optimizations(&slides, &discovery))
}

/// Report media stored on the slide masters and layouts of a presentation.
pub fn masters_report_file(path: impl AsRef<Path>) -> Result<MastersReport> {
    let parser = open_presentation(path)?;
    masters::masters_report(&parser).map_err(Error::into_corrupt)
}
