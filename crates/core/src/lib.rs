#![warn(clippy::all, missing_docs)]

//! Core bookkeeping for a small vehicle rental fleet.
//!
//! This crate hosts the vehicle and customer records, the fleet store with
//! its rent/return state transitions, receipt generation, flat-file
//! persistence and configuration used by the console front end.

pub mod config;
pub mod error;
pub mod fleet;
pub mod models;
pub mod receipt;
pub mod storage;
pub mod system;

pub use config::{AdminCredentials, AppConfig};
pub use error::{FleetError, FleetResult};
pub use fleet::{Charge, Fleet, Rental, RentedVehicle, SlotIndex};
pub use models::{Customer, Vehicle, VehicleKind};
pub use receipt::{Receipt, ReceiptLines, ReceiptLog};
pub use storage::FleetFile;
pub use system::{RentalSystem, ReturnOutcome};
