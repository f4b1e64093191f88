use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Signed displacement from UTC, carried in half-hour steps so that
/// fractional zones keep minute precision.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct UtcOffset(i8);

impl UtcOffset {
    pub const MIN_HOURS: i8 = -12;
    pub const MAX_HOURS: i8 = 14;

    pub const UTC: UtcOffset = UtcOffset(0);
    pub const UTC_PLUS_8: UtcOffset = UtcOffset(16);

    /// The only fractional zone the planner offers.
    const FRACTIONAL: [i8; 1] = [11];

    pub fn from_whole_hours(hours: i8) -> Option<UtcOffset> {
        (Self::MIN_HOURS..=Self::MAX_HOURS)
            .contains(&hours)
            .then(|| UtcOffset(hours * 2))
    }

    pub fn from_hours(hours: f64) -> Result<UtcOffset, Error> {
        let unsupported = || Error::UnsupportedOffset(hours.to_string());
        let doubled = hours * 2.0;
        if !doubled.is_finite() || doubled.fract() != 0.0 {
            return Err(unsupported());
        }
        if doubled < i8::MIN as f64 || doubled > i8::MAX as f64 {
            return Err(unsupported());
        }
        let candidate = UtcOffset(doubled as i8);
        if candidate.is_supported() {
            Ok(candidate)
        } else {
            Err(unsupported())
        }
    }

    fn is_supported(&self) -> bool {
        if self.0 % 2 == 0 {
            (Self::MIN_HOURS..=Self::MAX_HOURS).contains(&(self.0 / 2))
        } else {
            Self::FRACTIONAL.contains(&self.0)
        }
    }

    /// Every offset the planner offers, west to east.
    pub fn supported() -> Vec<UtcOffset> {
        let mut all: Vec<UtcOffset> = (Self::MIN_HOURS..=Self::MAX_HOURS)
            .map(|h| UtcOffset(h * 2))
            .chain(Self::FRACTIONAL.iter().map(|h| UtcOffset(*h)))
            .collect();
        all.sort();
        all
    }

    pub fn hours(&self) -> f64 {
        self.0 as f64 / 2.0
    }

    pub fn minutes(&self) -> i64 {
        self.0 as i64 * 30
    }

    /// Parses `s` only when it carries the `UTC` label, so bare numbers stay
    /// free for other uses. A labelled but unsupported zone is an error.
    pub fn parse_labelled(s: &str) -> Result<Option<UtcOffset>, Error> {
        match s.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("utc") => s.parse().map(Some),
            _ => Ok(None),
        }
    }
}

impl FromStr for UtcOffset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || Error::UnsupportedOffset(s.to_string());
        let trimmed = s.trim();
        let body = match trimmed.get(..3) {
            Some(prefix) if prefix.eq_ignore_ascii_case("utc") => &trimmed[3..],
            _ => trimmed,
        };
        if body.is_empty() {
            return Ok(UtcOffset::UTC);
        }
        let hours = match body.split_once(':') {
            // "+5:30" style
            Some((h, m)) => {
                let h = h.parse::<f64>().map_err(|_| unsupported())?;
                let m = match m {
                    "00" => 0.0,
                    "30" => 0.5,
                    _ => return Err(unsupported()),
                };
                if body.starts_with('-') { h - m } else { h + m }
            }
            None => body.parse::<f64>().map_err(|_| unsupported())?,
        };
        UtcOffset::from_hours(hours).map_err(|_| unsupported())
    }
}

impl TryFrom<f64> for UtcOffset {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        UtcOffset::from_hours(value)
    }
}

impl From<UtcOffset> for f64 {
    fn from(value: UtcOffset) -> Self {
        value.hours()
    }
}

impl std::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { '-' } else { '+' };
        let half_hours = self.0.unsigned_abs();
        if half_hours % 2 == 0 {
            write!(f, "UTC{}{}", sign, half_hours / 2)
        } else {
            write!(f, "UTC{}{}.5", sign, half_hours / 2)
        }
    }
}
