//! Half-open stay intervals, the overlap predicate and lock scopes.
//!
//! A stay covers the nights from check-in up to, but not including, the
//! check-out day: `[check_in, check_out)`. A guest leaving on day D and
//! another arriving on day D never conflict.

use std::num::NonZeroU32;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingId};
use crate::room::RoomId;

#[cfg(test)]
mod proptests;

/// Returns true when `[existing_start, existing_end)` and
/// `[candidate_start, candidate_end)` share at least one night.
///
/// Callers guarantee `start < end` for both ranges.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use staylock::overlaps;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
/// assert!(overlaps(d(1), d(5), d(4), d(6)));
/// assert!(!overlaps(d(1), d(5), d(5), d(10)));
/// ```
#[must_use]
pub fn overlaps(
    existing_start: NaiveDate,
    existing_end: NaiveDate,
    candidate_start: NaiveDate,
    candidate_end: NaiveDate,
) -> bool {
    existing_start < candidate_end && existing_end > candidate_start
}

/// Finds the first active booking in `rows` that overlaps `candidate`.
///
/// `exclude` skips a booking by id, which lets an update be checked against
/// everything except its own prior row.
#[must_use]
pub fn find_conflict<'a>(
    candidate: &StayInterval,
    rows: &'a [Booking],
    exclude: Option<BookingId>,
) -> Option<&'a Booking> {
    rows.iter()
        .filter(|b| Some(b.id()) != exclude)
        .filter(|b| b.is_active())
        .find(|b| b.interval().overlaps(candidate))
}

// Dates are stored as `%Y-%m-%d` text, which sorts like the dates
// themselves only for four-digit, non-negative years.
const MIN_YEAR: i32 = 0;
const MAX_YEAR: i32 = 9999;

/// A validated `[check_in, check_out)` range with `check_in < check_out`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use staylock::StayInterval;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
/// let stay = StayInterval::new(d(1), d(3)).unwrap();
/// assert_eq!(stay.nights(), 2);
/// assert_eq!(stay.to_string(), "[2025-03-01, 2025-03-03)");
///
/// assert!(StayInterval::new(d(3), d(3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayInterval {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayInterval {
    /// Creates a new interval.
    ///
    /// # Errors
    ///
    /// Returns an error unless `check_out` is strictly after `check_in` and
    /// both dates fall in the years 0000 to 9999.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, InvalidIntervalError> {
        for (field, date) in [("check_in", check_in), ("check_out", check_out)] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
                return Err(InvalidIntervalError::OutOfRange { field, date });
            }
        }
        if check_out <= check_in {
            return Err(InvalidIntervalError::Reversed {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Returns the first night of the stay.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Returns the departure day, which is not part of the stay.
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Returns the number of nights covered.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Returns true when the two stays share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(
            other.check_in,
            other.check_out,
            self.check_in,
            self.check_out,
        )
    }

    /// Returns true when `other` lies entirely within this interval.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.check_in <= other.check_in && other.check_out <= self.check_out
    }
}

impl std::fmt::Display for StayInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.check_in, self.check_out)
    }
}

/// Error returned for a stay that cannot be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidIntervalError {
    /// Check-out does not follow check-in.
    Reversed {
        /// The rejected check-in date.
        check_in: NaiveDate,
        /// The rejected check-out date.
        check_out: NaiveDate,
    },
    /// A date falls outside the years the store can order correctly.
    OutOfRange {
        /// Which end of the stay, `check_in` or `check_out`.
        field: &'static str,
        /// The rejected date.
        date: NaiveDate,
    },
}

impl std::fmt::Display for InvalidIntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reversed { check_in, check_out } => {
                write!(f, "check-out {check_out} must be after check-in {check_in}")
            }
            Self::OutOfRange { field, date } => write!(
                f,
                "{field} {date} is outside the years {MIN_YEAR:04} to {MAX_YEAR}"
            ),
        }
    }
}

impl std::error::Error for InvalidIntervalError {}

/// A bucket-aligned date window that narrows a lock scan.
///
/// The window always contains the interval it was built from, so every row
/// that overlaps the candidate also intersects the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBucket {
    window: StayInterval,
}

impl DateBucket {
    /// Builds the smallest bucket-aligned window covering `interval`.
    ///
    /// Returns `None` when alignment would leave the supported date range.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZeroU32;
    /// use chrono::NaiveDate;
    /// use staylock::{DateBucket, StayInterval};
    ///
    /// let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
    /// let stay = StayInterval::new(d(3, 1), d(3, 3)).unwrap();
    /// let bucket = DateBucket::covering(&stay, NonZeroU32::new(7).unwrap()).unwrap();
    /// assert!(bucket.window().contains(&stay));
    /// ```
    #[must_use]
    pub fn covering(interval: &StayInterval, width_days: NonZeroU32) -> Option<Self> {
        let width = i32::try_from(width_days.get()).ok()?;
        let start = interval.check_in.num_days_from_ce();
        let end = interval.check_out.num_days_from_ce();

        let aligned_start = start.checked_sub(start.rem_euclid(width))?;
        let remainder = end.rem_euclid(width);
        let aligned_end = if remainder == 0 {
            end
        } else {
            end.checked_add(width - remainder)?
        };

        let window = StayInterval::new(
            NaiveDate::from_num_days_from_ce_opt(aligned_start)?,
            NaiveDate::from_num_days_from_ce_opt(aligned_end)?,
        )
        .ok()?;
        Some(Self { window })
    }

    /// Returns the aligned window.
    #[must_use]
    pub const fn window(&self) -> &StayInterval {
        &self.window
    }
}

/// Describes which booking rows a locking transaction must see.
///
/// The room id alone is enough for correctness. The date bucket only keeps
/// the scan short for rooms with a long booking history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockScope {
    /// The room whose active bookings are locked.
    pub room_id: RoomId,
    /// Optional window narrowing the scan.
    pub date_bucket: Option<DateBucket>,
}

impl LockScope {
    /// Scope covering every active booking of a room.
    #[must_use]
    pub const fn room(room_id: RoomId) -> Self {
        Self {
            room_id,
            date_bucket: None,
        }
    }

    /// Scope for checking `candidate`, bucketed when a width is configured.
    #[must_use]
    pub fn for_candidate(
        room_id: RoomId,
        candidate: &StayInterval,
        bucket_width: Option<NonZeroU32>,
    ) -> Self {
        Self {
            room_id,
            date_bucket: bucket_width.and_then(|w| DateBucket::covering(candidate, w)),
        }
    }

    /// Returns the date window filtering the scan, if any.
    #[must_use]
    pub fn window(&self) -> Option<&StayInterval> {
        self.date_bucket.as_ref().map(DateBucket::window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingStatus, GuestInfo};

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn stay(a: (u32, u32), b: (u32, u32)) -> StayInterval {
        StayInterval::new(day(a.0, a.1), day(b.0, b.1)).unwrap()
    }

    fn booking(id: i64, interval: StayInterval, status: BookingStatus) -> Booking {
        Booking::for_test(
            BookingId::from(id),
            RoomId::from(1),
            interval,
            GuestInfo::new("Guest", "guest@example.com").unwrap(),
            status,
        )
    }

    #[test]
    fn test_half_open_boundary() {
        let a = stay((1, 1), (1, 5));
        let b = stay((1, 5), (1, 10));
        let c = stay((1, 4), (1, 6));

        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }

    #[test]
    fn test_years_past_9999_rejected() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

        let edge = StayInterval::new(ymd(9999, 12, 30), ymd(9999, 12, 31)).unwrap();
        assert_eq!(edge.nights(), 1);
        assert!(StayInterval::new(ymd(0, 1, 1), ymd(0, 1, 2)).is_ok());

        let err = StayInterval::new(ymd(9999, 12, 30), ymd(10000, 1, 2)).unwrap_err();
        assert_eq!(
            err,
            InvalidIntervalError::OutOfRange {
                field: "check_out",
                date: ymd(10000, 1, 2),
            }
        );
        assert!(matches!(
            StayInterval::new(ymd(-1, 12, 30), ymd(0, 1, 2)),
            Err(InvalidIntervalError::OutOfRange { field: "check_in", .. })
        ));
    }

    #[test]
    fn test_bucket_near_year_limit_falls_back() {
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let stay = StayInterval::new(ymd(9999, 12, 29), ymd(9999, 12, 31)).unwrap();
        // Aligning the end would leave year 9999.
        let scope = LockScope::for_candidate(RoomId::from(1), &stay, NonZeroU32::new(30));
        assert_eq!(scope.date_bucket, None);
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = stay((2, 1), (2, 20));
        let inner = stay((2, 5), (2, 6));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn test_identical_intervals_overlap() {
        let a = stay((2, 1), (2, 5));
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_invalid_interval_rejected() {
        assert!(StayInterval::new(day(1, 5), day(1, 5)).is_err());
        let err = StayInterval::new(day(1, 6), day(1, 5)).unwrap_err();
        assert!(matches!(err, InvalidIntervalError::Reversed { check_in, .. } if check_in == day(1, 6)));
        assert!(err.to_string().contains("must be after"));
    }

    #[test]
    fn test_find_conflict_excludes_self() {
        let rows = vec![booking(1, stay((3, 1), (3, 3)), BookingStatus::Confirmed)];
        let candidate = stay((3, 2), (3, 4));

        assert_eq!(
            find_conflict(&candidate, &rows, None).map(Booking::id),
            Some(BookingId::from(1))
        );
        assert!(find_conflict(&candidate, &rows, Some(BookingId::from(1))).is_none());
    }

    #[test]
    fn test_find_conflict_ignores_cancelled() {
        let rows = vec![booking(1, stay((2, 1), (2, 5)), BookingStatus::Cancelled)];
        assert!(find_conflict(&stay((2, 1), (2, 5)), &rows, None).is_none());
    }

    #[test]
    fn test_bucket_covers_interval() {
        let candidate = stay((3, 1), (3, 3));
        let width = NonZeroU32::new(7).unwrap();
        let bucket = DateBucket::covering(&candidate, width).unwrap();

        assert!(bucket.window().contains(&candidate));
        assert_eq!(bucket.window().nights() % 7, 0);
    }

    #[test]
    fn test_bucket_width_one_is_exact() {
        let candidate = stay((3, 1), (3, 3));
        let bucket = DateBucket::covering(&candidate, NonZeroU32::new(1).unwrap()).unwrap();
        assert_eq!(bucket.window(), &candidate);
    }

    #[test]
    fn test_lock_scope_without_bucket() {
        let scope = LockScope::for_candidate(RoomId::from(4), &stay((1, 1), (1, 2)), None);
        assert_eq!(scope, LockScope::room(RoomId::from(4)));
        assert!(scope.window().is_none());
    }
}
