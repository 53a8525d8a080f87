//! Time-window arithmetic behind the flight scheduling rules.
//!
//! Two windows of the same airplane are compared in two ways: a strict
//! intersection test used when a flight is saved, and a looser test that
//! widens the candidate window by [`conflict_buffer`] on both sides, used
//! as an advisory check before taking reservations.

use chrono::{DateTime, Duration, Utc};

/// Margin applied around a flight for the buffered conflict test.
pub fn conflict_buffer() -> Duration {
    Duration::hours(1)
}

/// Half-open interval `[start, end)` an airplane is busy with a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Departure strictly before arrival
    pub fn is_ordered(&self) -> bool {
        self.start < self.end
    }

    /// `other` starts before this window ends and ends after it starts.
    /// Windows that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        other.start < self.end && other.end > self.start
    }

    /// Widens both ends by `margin`, saturating at the representable range.
    pub fn widened(&self, margin: Duration) -> TimeWindow {
        TimeWindow::new(
            self.start
                .checked_sub_signed(margin)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            self.end
                .checked_add_signed(margin)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    pub fn buffered(&self) -> TimeWindow {
        self.widened(conflict_buffer())
    }
}

/// Strict overlap between an existing flight and a candidate.
pub fn strict_overlap(existing: &TimeWindow, candidate: &TimeWindow) -> bool {
    candidate.overlaps(existing)
}

/// Overlap after widening the candidate by an hour on each side.
pub fn buffered_overlap(existing: &TimeWindow, candidate: &TimeWindow) -> bool {
    candidate.buffered().overlaps(existing)
}
