use std::path::PathBuf;
use thiserror::Error;

use crate::flight::FlightId;
use crate::trip::TripId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid clock time '{0}', expected HH:MM")]
    InvalidClockTime(String),

    #[error("unsupported UTC offset '{0}'")]
    UnsupportedOffset(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("trip not found: {0}")]
    TripNotFound(TripId),

    #[error("flight not found: {0}")]
    FlightNotFound(FlightId),

    #[error("no trip selected")]
    NoTripSelected,

    #[error("failed to read trip book at {path}: {source}")]
    BookRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Errors a REPL user can fix by retyping the command.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidClockTime(_)
                | Self::UnsupportedOffset(_)
                | Self::InvalidDate(_)
                | Self::InvalidDateRange { .. }
                | Self::TripNotFound(_)
                | Self::FlightNotFound(_)
                | Self::NoTripSelected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidClockTime("25:00".to_string());
        assert_eq!(err.to_string(), "invalid clock time '25:00', expected HH:MM");

        let err = Error::UnsupportedOffset("UTC+15".to_string());
        assert_eq!(err.to_string(), "unsupported UTC offset 'UTC+15'");

        let err = Error::FlightNotFound(Arc::from("42"));
        assert_eq!(err.to_string(), "flight not found: 42");

        let err = Error::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "end date 2024-05-01 is before start date 2024-05-10"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::NoTripSelected.is_input_error());
        assert!(Error::InvalidDate("x".to_string()).is_input_error());
        let io = Error::Io(std::io::Error::other("disk"));
        assert!(!io.is_input_error());
    }
}
