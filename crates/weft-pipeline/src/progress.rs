//! Progress reporting.

/// Receives advisory progress at phase boundaries.
///
/// Percentages never decrease within one session.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8, status: &str);
}

impl<F> ProgressReporter for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, status: &str) {
        self(percent, status)
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _percent: u8, _status: &str) {}
}
