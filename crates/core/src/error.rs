//! Error taxonomy shared by the fleet store and its persistence layers.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures reported by fleet, storage and receipt operations.
///
/// Every variant is recoverable: callers report it to the operator and carry on.
#[derive(Debug, Error)]
pub enum FleetError {
    /// The fleet already holds `capacity` vehicles.
    #[error("fleet is full ({capacity} vehicles); cannot add more")]
    FleetFull {
        /// Configured maximum number of vehicles.
        capacity: usize,
    },
    /// The requested slot is outside `1..=size`.
    #[error("invalid vehicle selection {index} (fleet has {size} vehicles)")]
    InvalidIndex {
        /// Index as supplied by the operator.
        index: i64,
        /// Current fleet size.
        size: usize,
    },
    /// The vehicle in the slot is already rented out.
    #[error("vehicle {index} is already rented out")]
    AlreadyRented {
        /// 1-based slot index.
        index: usize,
    },
    /// The vehicle in the slot is not currently rented out.
    #[error("vehicle {index} is not rented out")]
    NotRented {
        /// 1-based slot index.
        index: usize,
    },
    /// The bill for a rental does not fit in a decimal.
    #[error("charge for vehicle {index} overflows")]
    ChargeOverflow {
        /// 1-based slot index.
        index: usize,
    },
    /// A vehicle attribute cannot be stored in the fleet file.
    #[error("vehicle {field} '{value}' must not contain commas or line breaks")]
    InvalidField {
        /// Name of the offending attribute.
        field: &'static str,
        /// Value as entered.
        value: String,
    },
    /// A fleet or receipts file could not be opened, read or written.
    #[error("unable to access {}: {source}", path.display())]
    FileUnavailable {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line in the fleet file does not describe a vehicle.
    #[error("malformed fleet record at {}:{line}: {reason}", path.display())]
    MalformedRecord {
        /// Fleet file being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

impl FleetError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias for results produced by this crate's fleet operations.
pub type FleetResult<T> = Result<T, FleetError>;
