use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Elapsed flight time in whole minutes. Never negative.
#[derive(Debug, Clone, Copy, Default, Ord, Eq, PartialEq, Hash, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightDuration(pub u32);

impl FlightDuration {
    pub fn total_minutes(&self) -> u32 {
        self.0
    }

    pub fn hours(&self) -> u32 {
        self.0 / 60
    }

    pub fn minutes(&self) -> u32 {
        self.0 % 60
    }
}

impl Add for FlightDuration {
    type Output = Self;

    fn add(self, rhs: FlightDuration) -> Self::Output {
        FlightDuration(self.0 + rhs.0)
    }
}

impl std::iter::Sum for FlightDuration {
    fn sum<I: Iterator<Item = FlightDuration>>(iter: I) -> Self {
        iter.fold(FlightDuration::default(), |acc, d| acc + d)
    }
}

impl std::fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}小時{}分", self.hours(), self.minutes())
    }
}
