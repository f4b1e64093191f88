use crate::duration::FlightDuration;
use crate::error::{Error, Result};
use crate::flight::{FlightId, FlightLeg};
use crate::schedule::calculator::{ScheduleCalculator, sort_flights};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

pub type TripId = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    flights: Vec<FlightLeg>,
}

/// Millisecond timestamp ids, bumped past any id already taken.
pub(crate) fn generate_id(taken: impl Fn(&str) -> bool) -> Arc<str> {
    let mut stamp = chrono::Utc::now().timestamp_millis();
    loop {
        let candidate = stamp.to_string();
        if !taken(&candidate) {
            return Arc::from(candidate);
        }
        stamp += 1;
    }
}

fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(Error::InvalidDateRange { start, end });
    }
    Ok(())
}

impl Trip {
    pub fn new(
        name: impl Into<String>,
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: impl Into<String>,
    ) -> Result<Trip> {
        check_date_range(start_date, end_date)?;
        Ok(Trip {
            id: Arc::from(""),
            name: name.into(),
            destination: destination.into(),
            start_date,
            end_date,
            description: description.into(),
            flights: vec![],
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn update_dates(&mut self, start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
        check_date_range(start_date, end_date)?;
        self.start_date = start_date;
        self.end_date = end_date;
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_date_range(self.start_date, self.end_date)
    }

    /// Flights in insertion order.
    pub fn flights(&self) -> &[FlightLeg] {
        &self.flights
    }

    pub fn flight(&self, id: &str) -> Option<&FlightLeg> {
        self.flights.iter().find(|f| &*f.id == id)
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.flights
            .iter()
            .position(|f| &*f.id == id)
            .ok_or_else(|| Error::FlightNotFound(Arc::from(id)))
    }

    pub fn add_flight(&mut self, mut leg: FlightLeg) -> FlightId {
        leg.id = generate_id(|candidate| self.flight(candidate).is_some());
        let id = leg.id.clone();
        tracing::info!(trip = %self.id, flight = %id, date = %leg.date, "added flight");
        self.flights.push(leg);
        id
    }

    pub fn remove_flight(&mut self, id: &str) -> Result<FlightLeg> {
        let idx = self.position(id)?;
        tracing::info!(trip = %self.id, flight = id, "removed flight");
        Ok(self.flights.remove(idx))
    }

    /// The leg, with its duration backfilled if it was stored without one.
    pub fn flight_for_edit(
        &mut self,
        id: &str,
        calculator: &ScheduleCalculator,
    ) -> Result<&mut FlightLeg> {
        let idx = self.position(id)?;
        let leg = &mut self.flights[idx];
        leg.backfill_duration(calculator);
        Ok(leg)
    }

    pub fn flights_in_order(&self) -> Vec<FlightLeg> {
        let mut ordered = self.flights.clone();
        sort_flights(&mut ordered);
        ordered
    }

    pub fn backfill_durations(&mut self, calculator: &ScheduleCalculator) -> usize {
        self.flights
            .iter_mut()
            .map(|leg| leg.backfill_duration(calculator))
            .filter(|filled| *filled)
            .count()
    }

    pub fn total_flight_time(&self) -> FlightDuration {
        self.flights.iter().filter_map(|f| f.duration()).sum()
    }
}

#[derive(Tabled)]
pub struct TripRow {
    #[tabled(rename = "")]
    pub marker: String,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Destination")]
    pub destination: String,
    #[tabled(rename = "Dates")]
    pub dates: String,
    #[tabled(rename = "Flights")]
    pub flights: usize,
    #[tabled(rename = "In the air")]
    pub flight_time: String,
}

impl TripRow {
    pub fn new(trip: &Trip, selected: bool) -> TripRow {
        TripRow {
            marker: if selected { "*".to_string() } else { String::new() },
            id: trip.id.to_string(),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            dates: format!("{} → {}", trip.start_date, trip.end_date),
            flights: trip.flights.len(),
            flight_time: trip.total_flight_time().to_string(),
        }
    }
}
