//! Report rendering.
//!
//! This module turns analysis results into console text, JSON and CSV.
//!
//! # Example
//!
//! ```no_run
//! use slideweight::{analyze_file, AnalysisOptions, render::*};
//!
//! let analysis = analyze_file("deck.pptx", &AnalysisOptions::default())?;
//!
//! // Console ranking, heaviest five slides
//! let text = render_ranking(&analysis.results, "deck.pptx", &ReportOptions::new().with_top(5));
//! print!("{}", text);
//!
//! // Machine-readable outputs
//! write_json(&analysis.results, "deck.json", JsonFormat::Pretty)?;
//! write_csv(&analysis.results, "deck.csv")?;
//! # Ok::<(), slideweight::Error>(())
//! ```

mod console;
mod csv;
mod json;
mod options;

pub use self::csv::{to_csv, to_csv_writer, write_csv, CSV_HEADER};
pub use console::{format_bytes, render_masters_report, render_optimization_report, render_ranking};
pub use json::{to_json, write_json, JsonFormat};
pub use options::ReportOptions;
