use crate::flight::FlightLeg;
use crate::offset::UtcOffset;
use crate::schedule::calculator::ScheduleCalculator;
use crate::time::ClockTime;
use chrono::NaiveDate;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::sample::select;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn t(s: &str) -> ClockTime {
    s.parse().unwrap()
}

pub fn utc(hours: f64) -> UtcOffset {
    UtcOffset::from_hours(hours).unwrap()
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn add_flight(
    flights: &mut Vec<FlightLeg>,
    flight_id: &str,
    date: NaiveDate,
    departure_time: Option<&str>,
    arrival_time: Option<&str>,
) {
    let calc = ScheduleCalculator::default();
    let mut leg = FlightLeg::new(date, &calc);
    leg.id = Arc::from(flight_id);
    if let Some(dep) = departure_time {
        leg.set_departure_time(t(dep), &calc);
    }
    if let Some(arr) = arrival_time {
        leg.set_arrival_time(t(arr), &calc);
    }
    flights.push(leg);
}

pub fn ids(flights: &[FlightLeg]) -> Vec<&str> {
    flights.iter().map(|f| f.id.as_ref()).collect()
}

pub fn arb_clock_time() -> impl Strategy<Value = ClockTime> {
    (0..24u8, 0..60u8).prop_map(|(h, m)| ClockTime::new(h, m).unwrap())
}

pub fn arb_offset() -> impl Strategy<Value = UtcOffset> {
    select(UtcOffset::supported())
}

pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    prop_oneof![
        Just(ymd(2024, 2, 28)),
        Just(ymd(2024, 2, 29)),
        Just(ymd(2024, 3, 1)),
    ]
}

pub fn arb_leg() -> impl Strategy<Value = FlightLeg> {
    (
        arb_date(),
        proptest::option::of(arb_clock_time()),
        arb_clock_time(),
        0..1000u32,
    )
        .prop_map(|(date, dep, arr, n)| {
            let calc = ScheduleCalculator::default();
            let mut leg = FlightLeg::new(date, &calc);
            leg.id = Arc::from(format!("FL_{}", n));
            if let Some(dep) = dep {
                leg.set_departure_time(dep, &calc);
            }
            leg.set_arrival_time(arr, &calc);
            leg
        })
}
