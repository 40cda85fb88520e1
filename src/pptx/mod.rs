//! PPTX (PowerPoint) presentation reader.
//!
//! Exposes slides in document order with their titles and media-bearing
//! shapes, the slide masters with their layouts, and loads the raw bytes
//! behind a shape on demand through [`MediaSource`].

mod parser;
mod shapes;

pub use parser::{
    LayoutPart, MasterPart, MediaBlob, MediaShape, MediaSource, MediaTarget, PptxParser, Slide,
};
pub use shapes::{scan_shapes, Extent, ShapeKind, ShapeRef, ShapeScan};
