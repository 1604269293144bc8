use serde::{Deserialize, Serialize};
use trait_set::trait_set;

trait_set!
{
    /// Trait for any callback that can receive [progress](Progress) reports from a running generation.
    pub trait ProgressFn = FnMut(Progress) + Send;
}

/// Represents one advisory progress report emitted during a long running generation.
///
/// `percent` is always in `0..=100`.
#[derive(Clone, Eq, PartialEq, Default, Debug, Serialize, Deserialize)]
pub struct Progress
{
    pub message: String,
    pub percent: u8,
}

impl Progress
{
    pub fn new(message: impl Into<String>, percent: u8) -> Progress
    {
        Progress { message: message.into(), percent: percent.min(100) }
    }
}

/// Optional sink for [progress](Progress) reports, handed down to the engines.
///
/// Reporting is purely advisory, a reporter without a callback silently drops everything.
#[derive(Default)]
pub struct ProgressReporter<'a>
{
    callback: Option<&'a mut dyn FnMut(Progress)>,
}

impl<'a> ProgressReporter<'a>
{
    pub fn new(callback: &'a mut impl ProgressFn) -> ProgressReporter<'a>
    {
        ProgressReporter { callback: Some(callback) }
    }

    /// A reporter that drops every report.
    pub fn silent() -> ProgressReporter<'a>
    {
        ProgressReporter { callback: None }
    }

    pub fn report(&mut self, message: impl Into<String>, percent: u8)
    {
        if let Some(callback) = self.callback.as_deref_mut()
        {
            callback(Progress::new(message, percent));
        }
    }

    /// Reports `step` out of `total` steps, mapped linearly onto `from..=to` percent.
    pub fn report_step(&mut self, message: impl Into<String>, step: usize, total: usize, from: u8, to: u8)
    {
        let total = total.max(1);
        let span = to.saturating_sub(from) as usize;
        let percent = from as usize + span * step.min(total) / total;
        self.report(message, percent as u8);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_reporter_maps_steps_to_percent()
    {
        let mut seen = vec![];
        let mut callback = |p: Progress| seen.push(p.percent);
        let mut reporter = ProgressReporter::new(&mut callback);

        reporter.report_step("a", 0, 4, 10, 90);
        reporter.report_step("b", 2, 4, 10, 90);
        reporter.report_step("c", 4, 4, 10, 90);
        reporter.report("d", 250);
        drop(reporter);

        assert_eq!(seen, vec![10, 50, 90, 100]);
    }

    #[test]
    fn test_silent_reporter_drops_reports()
    {
        let mut reporter = ProgressReporter::silent();
        reporter.report("ignored", 5);
    }
}
