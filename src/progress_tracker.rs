use std::fmt;

use crate::image_processor::ConversionResult;

/// Final tally of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub converted: usize,
    pub total: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully converted {} out of {} files.",
            self.converted, self.total
        )
    }
}

/// Counts per-image results for the summary.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    total: usize,
    converted: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &ConversionResult) {
        if result.success {
            self.converted += 1;
        }
    }

    pub const fn summary(&self) -> RunSummary {
        RunSummary {
            converted: self.converted,
            total: self.total,
        }
    }
}
