use crate::duration::FlightDuration;
use crate::flight::FlightLeg;
use crate::offset::UtcOffset;
use crate::time::{ClockTime, MINUTES_PER_DAY};
use std::cmp::Ordering;

/// Flight-time arithmetic. The only state is the zone assumed when a caller
/// leaves an offset unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleCalculator {
    default_offset: UtcOffset,
}

impl Default for ScheduleCalculator {
    fn default() -> Self {
        ScheduleCalculator::new(UtcOffset::UTC_PLUS_8)
    }
}

impl ScheduleCalculator {
    pub fn new(default_offset: UtcOffset) -> ScheduleCalculator {
        ScheduleCalculator { default_offset }
    }

    pub fn default_offset(&self) -> UtcOffset {
        self.default_offset
    }

    /// Elapsed time between two wall-clock readings taken in possibly
    /// different zones.
    ///
    /// An arrival reading earlier than the departure reading is taken to land
    /// on the next day. The wall-clock difference is then corrected by the
    /// offset delta, and wrapped forward by whole days while it is negative.
    pub fn compute_duration(
        &self,
        departure: ClockTime,
        arrival: ClockTime,
        departure_offset: Option<UtcOffset>,
        arrival_offset: Option<UtcOffset>,
    ) -> FlightDuration {
        let departure_offset = departure_offset.unwrap_or(self.default_offset);
        let arrival_offset = arrival_offset.unwrap_or(self.default_offset);

        let departs_at = departure.minutes_since_midnight();
        let mut lands_at = arrival.minutes_since_midnight();
        if lands_at < departs_at {
            lands_at += MINUTES_PER_DAY;
        }

        let wall_clock = lands_at - departs_at;
        let mut elapsed = wall_clock - (arrival_offset.minutes() - departure_offset.minutes());
        while elapsed < 0 {
            elapsed += MINUTES_PER_DAY;
        }

        tracing::trace!(
            %departure, %arrival, %departure_offset, %arrival_offset, wall_clock, elapsed,
            "computed flight duration"
        );
        FlightDuration(elapsed as u32)
    }
}

/// Chronological order: departure date first, then departure time. A leg with
/// no departure time sorts ahead of every timed leg on the same date.
pub fn compare_flight_order(a: &FlightLeg, b: &FlightLeg) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.departure_time().cmp(&b.departure_time()))
}

/// Stable ascending sort; legs that compare equal keep their insertion order.
pub fn sort_flights(flights: &mut [FlightLeg]) {
    flights.sort_by(compare_flight_order);
}

pub fn format_duration(minutes: u32) -> String {
    FlightDuration(minutes).to_string()
}
