use std::fmt;

use serde::{Deserialize, Serialize};

/// Run progress as an integer percentage in `0..=100`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const COMPLETE: Progress = Progress(100);

    /// `floor(defeated / total * 100)`; zero when there is nothing to defeat.
    pub fn from_counts(defeated: usize, total: usize) -> Self {
        if total == 0 {
            return Self(0);
        }
        let percent = (defeated.min(total) * 100) / total;
        Self(percent as u8)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_percentage() {
        assert_eq!(Progress::from_counts(1, 3).value(), 33);
        assert_eq!(Progress::from_counts(2, 3).value(), 66);
        assert_eq!(Progress::from_counts(3, 3), Progress::COMPLETE);
    }

    #[test]
    fn empty_run_reports_zero() {
        assert_eq!(Progress::from_counts(0, 0).value(), 0);
    }

    #[test]
    fn never_exceeds_complete() {
        assert_eq!(Progress::from_counts(9, 3), Progress::COMPLETE);
    }
}
