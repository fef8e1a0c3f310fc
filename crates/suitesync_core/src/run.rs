//! Per-run outcome accounting shared by the pull and push appliers.

/// Outcome of a multi-suite run.
///
/// Suites are isolated from each other: one suite's failure is counted here
/// and the run continues. The process exit status reflects whether *any*
/// suite failed, not which.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Suites whose apply step completed fully.
    pub succeeded: usize,
    /// Suites that failed (fatal remote error, or one or more plan entries
    /// failed to apply).
    pub failed: usize,
    /// Suites skipped because their local folder does not exist.
    pub skipped: usize,
}

impl RunSummary {
    /// True when no suite failed.
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}
