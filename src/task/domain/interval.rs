//! Half-open time intervals and the overlap rule between them.

use super::TaskDomainError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns whether `[a_start, a_end)` and `[b_start, b_end)` share an instant.
///
/// Both intervals must already satisfy `start < end`. Intervals that only
/// touch (`a_end == b_start`) do not overlap.
#[must_use]
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Fractional-second digits kept on interval bounds. `TIMESTAMPTZ` stores
/// microseconds.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// A validated `[start, end)` interval with `start < end`.
///
/// Bounds are truncated to whole microseconds so every backend compares the
/// same instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct TaskInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TaskInterval {
    /// Creates an interval from bounds truncated to microsecond precision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidInterval`] when the truncated
    /// `start >= end`, which includes windows shorter than a microsecond.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TaskDomainError> {
        let stored_start = start.trunc_subsecs(STORED_SUBSEC_DIGITS);
        let stored_end = end.trunc_subsecs(STORED_SUBSEC_DIGITS);
        if stored_start >= stored_end {
            return Err(TaskDomainError::InvalidInterval {
                start: stored_start,
                end: stored_end,
            });
        }
        Ok(Self {
            start: stored_start,
            end: stored_end,
        })
    }

    /// Inclusive start instant.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end instant.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns whether this interval shares at least one instant with `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        intervals_overlap(self.start, self.end, other.start, other.end)
    }
}

impl fmt::Display for TaskInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

#[derive(Serialize, Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TaskInterval {
    type Error = TaskDomainError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl From<TaskInterval> for RawInterval {
    fn from(interval: TaskInterval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
        }
    }
}
