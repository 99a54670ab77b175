use chrono::{Local, NaiveDate};

/// A check evaluated before a run starts loading anything.
///
/// Returning `Err(message)` fails the run with [`crate::AnalysisError::PreconditionFailed`].
pub trait RunPrecondition: Send + Sync {
    fn check(&self) -> Result<(), String>;
}

/// Refuses to run after a fixed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotAfter {
    deadline: NaiveDate,
    today: NaiveDate,
}

impl NotAfter {
    /// Compare against the local calendar date at construction time.
    pub fn new(deadline: NaiveDate) -> Self {
        Self::with_today(deadline, Local::now().date_naive())
    }

    pub fn with_today(deadline: NaiveDate, today: NaiveDate) -> Self {
        Self { deadline, today }
    }
}

impl RunPrecondition for NotAfter {
    fn check(&self) -> Result<(), String> {
        if self.today > self.deadline {
            Err(format!(
                "this analysis expired on {} (today is {})",
                self.deadline.format("%Y-%m-%d"),
                self.today.format("%Y-%m-%d")
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn deadline_day_itself_is_allowed() {
        assert!(NotAfter::with_today(d(2025, 3, 1), d(2025, 3, 1)).check().is_ok());
        assert!(NotAfter::with_today(d(2025, 3, 1), d(2025, 2, 28)).check().is_ok());
    }

    #[test]
    fn day_after_deadline_is_refused() {
        let err = NotAfter::with_today(d(2025, 3, 1), d(2025, 3, 2)).check().unwrap_err();
        assert!(err.contains("2025-03-01"), "{err}");
    }
}
