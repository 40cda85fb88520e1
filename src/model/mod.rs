//! Value types produced by the analysis.
//!
//! These are plain records: the attribution engine, the optimization
//! estimator and the masters report build them once, and the renderers
//! only read them.

mod masters;
mod media;
mod optimization;
mod stats;

pub use masters::*;
pub use media::*;
pub use optimization::*;
pub use stats::*;
