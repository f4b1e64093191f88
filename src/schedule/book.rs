use crate::error::{Error, Result};
use crate::schedule::calculator::ScheduleCalculator;
use crate::trip::{Trip, TripId, generate_id};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Every trip the planner knows about, plus the one currently being edited.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TripBook {
    #[serde(default)]
    trips: Vec<Trip>,
    #[serde(default)]
    selected: Option<TripId>,
}

impl TripBook {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no trip book yet, starting empty");
            return Ok(TripBook::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| Error::BookRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut book: TripBook = serde_json::from_str(&data)?;
        for trip in &book.trips {
            trip.validate()?;
        }
        if book
            .selected
            .as_ref()
            .is_some_and(|id| book.trip(id).is_none())
        {
            tracing::warn!("selected trip no longer exists, clearing selection");
            book.selected = None;
        }
        tracing::debug!(trips = book.trips.len(), "loaded trip book");
        Ok(book)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), trips = self.trips.len(), "saved trip book");
        Ok(())
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.iter().find(|t| &*t.id == id)
    }

    pub fn trip_mut(&mut self, id: &str) -> Option<&mut Trip> {
        self.trips.iter_mut().find(|t| &*t.id == id)
    }

    /// Stores a new trip and makes it the selected one.
    pub fn add_trip(&mut self, mut trip: Trip) -> TripId {
        trip.id = generate_id(|candidate| self.trip(candidate).is_some());
        let id = trip.id.clone();
        tracing::info!(trip = %id, name = %trip.name, "added trip");
        self.trips.push(trip);
        self.selected = Some(id.clone());
        id
    }

    /// Replaces the stored trip wholesale and selects it.
    pub fn update_trip(&mut self, id: &str, mut trip: Trip) -> Result<()> {
        trip.validate()?;
        let slot = self
            .trip_mut(id)
            .ok_or_else(|| Error::TripNotFound(Arc::from(id)))?;
        trip.id = slot.id.clone();
        *slot = trip;
        self.selected = Some(Arc::from(id));
        Ok(())
    }

    pub fn remove_trip(&mut self, id: &str) -> Result<Trip> {
        let idx = self
            .trips
            .iter()
            .position(|t| &*t.id == id)
            .ok_or_else(|| Error::TripNotFound(Arc::from(id)))?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        tracing::info!(trip = id, "removed trip");
        Ok(self.trips.remove(idx))
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        let trip = self
            .trip(id)
            .ok_or_else(|| Error::TripNotFound(Arc::from(id)))?;
        self.selected = Some(trip.id.clone());
        Ok(())
    }

    pub fn selected_id(&self) -> Option<&TripId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Result<&Trip> {
        self.selected
            .as_deref()
            .and_then(|id| self.trip(id))
            .ok_or(Error::NoTripSelected)
    }

    pub fn selected_mut(&mut self) -> Result<&mut Trip> {
        let id = self.selected.clone().ok_or(Error::NoTripSelected)?;
        self.trip_mut(&id).ok_or(Error::NoTripSelected)
    }

    /// Runs the missing-duration backfill over every stored leg.
    pub fn backfill_all(&mut self, calculator: &ScheduleCalculator) -> usize {
        self.trips
            .iter_mut()
            .map(|t| t.backfill_durations(calculator))
            .sum()
    }
}
