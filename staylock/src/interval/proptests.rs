//! Property-based tests for the overlap predicate and date buckets.

use std::num::NonZeroU32;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::{overlaps, DateBucket, StayInterval};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn interval(start: i64, len: i64) -> StayInterval {
    let check_in = base() + Duration::days(start);
    StayInterval::new(check_in, check_in + Duration::days(len)).unwrap()
}

/// Night-by-night reference: two stays overlap iff some night is in both.
fn shares_a_night(a: &StayInterval, b: &StayInterval) -> bool {
    let mut night = a.check_in();
    while night < a.check_out() {
        if night >= b.check_in() && night < b.check_out() {
            return true;
        }
        night += Duration::days(1);
    }
    false
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn overlap_is_symmetric(s1 in 0i64..400, l1 in 1i64..30, s2 in 0i64..400, l2 in 1i64..30) {
        let a = interval(s1, l1);
        let b = interval(s2, l2);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlap_matches_night_enumeration(s1 in 0i64..120, l1 in 1i64..20, s2 in 0i64..120, l2 in 1i64..20) {
        let a = interval(s1, l1);
        let b = interval(s2, l2);
        prop_assert_eq!(a.overlaps(&b), shares_a_night(&a, &b));
    }

    #[test]
    fn back_to_back_stays_never_overlap(start in 0i64..400, l1 in 1i64..30, l2 in 1i64..30) {
        let first = interval(start, l1);
        let second = interval(start + l1, l2);
        prop_assert!(!overlaps(first.check_in(), first.check_out(), second.check_in(), second.check_out()));
    }

    #[test]
    fn interval_overlaps_itself(start in 0i64..400, len in 1i64..30) {
        let a = interval(start, len);
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn bucket_never_hides_an_overlap(
        s1 in 0i64..200, l1 in 1i64..20,
        s2 in 0i64..200, l2 in 1i64..20,
        width in 1u32..60,
    ) {
        let candidate = interval(s1, l1);
        let existing = interval(s2, l2);
        let bucket = DateBucket::covering(&candidate, NonZeroU32::new(width).unwrap()).unwrap();

        prop_assert!(bucket.window().contains(&candidate));
        if existing.overlaps(&candidate) {
            prop_assert!(existing.overlaps(bucket.window()));
        }
    }
}
