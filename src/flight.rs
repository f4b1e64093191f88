use crate::duration::FlightDuration;
use crate::offset::UtcOffset;
use crate::schedule::calculator::ScheduleCalculator;
use crate::time::ClockTime;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tabled::Tabled;

pub type FlightId = Arc<str>;

/// One directional flight segment. The duration is derived from the four
/// time/offset fields and is recomputed whenever one of them changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub id: FlightId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient_time")]
    departure_time: Option<ClockTime>,
    #[serde(default, deserialize_with = "lenient_time")]
    arrival_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    departure_offset: Option<UtcOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    arrival_offset: Option<UtcOffset>,
    #[serde(default)]
    duration: Option<FlightDuration>,
}

fn lenient_time<'de, D>(deserializer: D) -> Result<Option<ClockTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| ClockTime::parse_lenient(&s)))
}

impl FlightLeg {
    /// A blank leg on `date` with both ends in the calculator's default zone.
    pub fn new(date: NaiveDate, calculator: &ScheduleCalculator) -> FlightLeg {
        FlightLeg {
            id: Arc::from(""),
            flight_number: None,
            date,
            departure_time: None,
            arrival_time: None,
            departure_offset: Some(calculator.default_offset()),
            arrival_offset: Some(calculator.default_offset()),
            duration: None,
        }
    }

    pub fn departure_time(&self) -> Option<ClockTime> {
        self.departure_time
    }

    pub fn arrival_time(&self) -> Option<ClockTime> {
        self.arrival_time
    }

    /// `None` only for stored legs whose zone was never chosen.
    pub fn departure_offset(&self) -> Option<UtcOffset> {
        self.departure_offset
    }

    pub fn arrival_offset(&self) -> Option<UtcOffset> {
        self.arrival_offset
    }

    pub fn duration(&self) -> Option<FlightDuration> {
        self.duration
    }

    pub fn set_departure_time(&mut self, time: ClockTime, calculator: &ScheduleCalculator) {
        self.departure_time = Some(time);
        self.recompute(calculator);
    }

    pub fn set_arrival_time(&mut self, time: ClockTime, calculator: &ScheduleCalculator) {
        self.arrival_time = Some(time);
        self.recompute(calculator);
    }

    pub fn set_departure_offset(&mut self, offset: UtcOffset, calculator: &ScheduleCalculator) {
        self.departure_offset = Some(offset);
        self.recompute(calculator);
    }

    pub fn set_arrival_offset(&mut self, offset: UtcOffset, calculator: &ScheduleCalculator) {
        self.arrival_offset = Some(offset);
        self.recompute(calculator);
    }

    fn resolve_offsets(&mut self, calculator: &ScheduleCalculator) {
        self.departure_offset.get_or_insert(calculator.default_offset());
        self.arrival_offset.get_or_insert(calculator.default_offset());
    }

    fn recompute(&mut self, calculator: &ScheduleCalculator) {
        self.resolve_offsets(calculator);
        self.duration = match (self.departure_time, self.arrival_time) {
            (Some(dep), Some(arr)) => Some(calculator.compute_duration(
                dep,
                arr,
                self.departure_offset,
                self.arrival_offset,
            )),
            _ => None,
        };
    }

    /// Fills in a missing duration for legs stored without one, placing any
    /// zone-less end in the calculator's default zone. An existing duration is
    /// left alone. Returns whether a value was written.
    pub fn backfill_duration(&mut self, calculator: &ScheduleCalculator) -> bool {
        self.resolve_offsets(calculator);
        if self.duration.is_some() {
            return false;
        }
        self.recompute(calculator);
        if self.duration.is_some() {
            tracing::debug!(flight = %self.id, "backfilled missing duration");
        }
        self.duration.is_some()
    }
}

#[derive(Tabled)]
pub struct FlightRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Flight")]
    pub flight_number: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Departs")]
    pub departs: String,
    #[tabled(rename = "Arrives")]
    pub arrives: String,
    #[tabled(rename = "Duration")]
    pub duration: String,
}

impl FlightRow {
    /// Zone-less ends are shown in the calculator's default zone.
    pub fn new(leg: &FlightLeg, calculator: &ScheduleCalculator) -> FlightRow {
        let at = |time: Option<ClockTime>, offset: Option<UtcOffset>| match time {
            Some(t) => format!("{} ({})", t, offset.unwrap_or(calculator.default_offset())),
            None => "-".to_string(),
        };
        FlightRow {
            id: leg.id.to_string(),
            flight_number: leg.flight_number.clone().unwrap_or_default(),
            date: leg.date.to_string(),
            departs: at(leg.departure_time(), leg.departure_offset()),
            arrives: at(leg.arrival_time(), leg.arrival_offset()),
            duration: leg
                .duration()
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}
