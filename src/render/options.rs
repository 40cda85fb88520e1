//! Report options configuration.

use super::json::JsonFormat;

/// Options for rendering reports.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Show only the N heaviest slides on the console (None = all)
    pub top: Option<usize>,
    /// Layout of JSON output
    pub json_format: JsonFormat,
}

impl ReportOptions {
    /// Create new report options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the console ranking to the first `n` slides. Zero shows all.
    pub fn with_top(mut self, n: usize) -> Self {
        self.top = (n > 0).then_some(n);
        self
    }

    /// Set the JSON output format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}
