use crate::flight::FlightLeg;
use crate::schedule::calculator::{ScheduleCalculator, compare_flight_order, sort_flights};
use crate::schedule::tests::utils::{arb_clock_time, arb_leg, arb_offset};
use crate::time::MINUTES_PER_DAY;
use proptest::prelude::*;
use proptest::proptest;
use std::cmp::Ordering;
use std::sync::Arc;

proptest! {
    #[test]
    fn test_duration_is_never_negative(
        dep in arb_clock_time(),
        arr in arb_clock_time(),
        dep_offset in arb_offset(),
        arr_offset in arb_offset(),
    ) {
        let calc = ScheduleCalculator::default();
        let d = calc.compute_duration(dep, arr, Some(dep_offset), Some(arr_offset));
        let widest_delta = 26 * 60;

        prop_assert!(
            (d.total_minutes() as i64) < MINUTES_PER_DAY + widest_delta,
            "\n{} ({}) -> {} ({}) took {} minutes",
            dep, dep_offset, arr, arr_offset, d.total_minutes()
        );

        // Shifting the arrival reading by whole days does not change the result.
        let expected = (arr.minutes_since_midnight() - arr_offset.minutes())
            - (dep.minutes_since_midnight() - dep_offset.minutes());
        prop_assert_eq!(
            0,
            (d.total_minutes() as i64 - expected).rem_euclid(MINUTES_PER_DAY),
            "\n{} ({}) -> {} ({}) is not a whole number of days from the UTC difference",
            dep, dep_offset, arr, arr_offset
        );
    }

    #[test]
    fn test_same_zone_duration_stays_within_a_day(
        dep in arb_clock_time(),
        arr in arb_clock_time(),
        offset in arb_offset(),
    ) {
        let calc = ScheduleCalculator::new(offset);
        let d = calc.compute_duration(dep, arr, None, None);
        prop_assert!((d.total_minutes() as i64) < MINUTES_PER_DAY);
    }

    #[test]
    fn test_sort_is_ordered_idempotent_and_stable(
        flights in prop::collection::vec(arb_leg(), 0..30)
    ) {
        let flights: Vec<_> = flights
            .into_iter()
            .enumerate()
            .map(|(i, mut f)| {
                f.id = Arc::from(i.to_string());
                f
            })
            .collect();
        let input_position = |f: &FlightLeg| f.id.parse::<usize>().unwrap();

        let mut sorted = flights.clone();
        sort_flights(&mut sorted);

        for pair in sorted.windows(2) {
            let order = compare_flight_order(&pair[0], &pair[1]);
            prop_assert!(
                order != Ordering::Greater,
                "\nFlight {} ({} {:?}) sorted before Flight {} ({} {:?})",
                pair[0].id, pair[0].date, pair[0].departure_time(),
                pair[1].id, pair[1].date, pair[1].departure_time()
            );
            if order == Ordering::Equal {
                prop_assert!(input_position(&pair[0]) < input_position(&pair[1]));
            }
        }

        let mut again = sorted.clone();
        sort_flights(&mut again);
        prop_assert_eq!(&sorted, &again);
    }
}
