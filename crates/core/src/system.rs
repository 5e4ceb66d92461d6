//! The rental system as seen by a session: a fleet wired to its files.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    error::{FleetError, FleetResult},
    fleet::{Fleet, RentedVehicle, SlotIndex},
    models::{Customer, Vehicle},
    receipt::{Receipt, ReceiptLines, ReceiptLog},
    storage::FleetFile,
};

/// A returned vehicle's receipt and whether it reached the receipts log.
#[derive(Debug)]
pub struct ReturnOutcome {
    /// Charge breakdown for the completed rental.
    pub receipt: Receipt,
    /// Why the receipt could not be appended, if it was not.
    pub log_error: Option<FleetError>,
}

/// Fleet bookkeeping plus the fleet file and receipts log backing it.
#[derive(Debug)]
pub struct RentalSystem {
    fleet: Fleet,
    fleet_file: FleetFile,
    receipts: ReceiptLog,
    damage_surcharge: Decimal,
}

impl RentalSystem {
    /// Load the persisted fleet described by `config`.
    pub fn open(config: &AppConfig) -> FleetResult<Self> {
        let fleet_file = FleetFile::new(config.fleet_path());
        let vehicles = fleet_file.load()?;
        info!(
            "loaded {} vehicles from {}",
            vehicles.len(),
            fleet_file.path().display()
        );
        let fleet = Fleet::from_vehicles(config.fleet_capacity, vehicles);
        Ok(Self {
            fleet,
            fleet_file,
            receipts: ReceiptLog::new(config.receipts_path()),
            damage_surcharge: config.damage_surcharge,
        })
    }

    /// Read-only view of the fleet.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Add a vehicle and rewrite the fleet file.
    ///
    /// If the file cannot be written the error is returned, but the vehicle
    /// stays in the in-memory fleet.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> FleetResult<SlotIndex> {
        let description = vehicle.to_string();
        let index = self.fleet.add_vehicle(vehicle)?;
        info!("vehicle {index} added: {description}");
        if let Err(err) = self.fleet_file.save(self.fleet.vehicles()) {
            warn!("vehicle {index} added but fleet was not saved: {err}");
            return Err(err);
        }
        Ok(index)
    }

    /// Vehicles that can be rented.
    pub fn available(&self) -> Vec<(SlotIndex, &Vehicle)> {
        self.fleet.available()
    }

    /// Vehicles currently out on rent.
    pub fn rented(&self) -> Vec<RentedVehicle<'_>> {
        self.fleet.rented()
    }

    /// Rent the vehicle at the 1-based `index`.
    pub fn rent(&mut self, index: i64, customer: &Customer, days: u32) -> FleetResult<()> {
        self.fleet.rent(index, customer, days)?;
        info!("vehicle {index} rented to {} for {days} days", customer.name);
        Ok(())
    }

    /// Return the vehicle at `index`, recording and handing back its receipt.
    ///
    /// The vehicle is available again even if the receipt cannot be appended;
    /// the receipt is handed back either way with the append failure attached.
    pub fn return_vehicle(&mut self, index: i64, damaged: bool) -> FleetResult<ReturnOutcome> {
        let receipt = self
            .fleet
            .return_vehicle(index, damaged, self.damage_surcharge)?;
        info!(
            "vehicle {index} returned (damaged: {damaged}), total {}",
            receipt.total
        );
        let log_error = match self.receipts.append(&receipt) {
            Ok(()) => None,
            Err(err) => {
                warn!("receipt for vehicle {index} was not recorded: {err}");
                Some(err)
            }
        };
        Ok(ReturnOutcome { receipt, log_error })
    }

    /// Lines of the receipts log; fails when no receipt has been written yet.
    pub fn receipts(&self) -> FleetResult<ReceiptLines> {
        self.receipts.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;


    fn corolla() -> Vehicle {
        Vehicle::new("Sedan", "Toyota", "Corolla", "2020", Decimal::from(3000))
    }

    #[test]
    fn first_run_starts_empty() -> Result<()> {
        let dir = tempdir()?;
        let system = RentalSystem::open(&AppConfig::with_data_dir(dir.path()))?;
        assert!(system.fleet().is_empty());
        assert!(matches!(
            system.receipts().err(),
            Some(FleetError::FileUnavailable { .. })
        ));
        Ok(())
    }

    #[test]
    fn rent_and_return_scenario() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::with_data_dir(dir.path());
        let mut system = RentalSystem::open(&config)?;

        let index = system.add_vehicle(corolla())?;
        assert_eq!(index.get(), 1);

        let available = system.available();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].0.get(), 1);
        assert_eq!(available[0].1, &corolla());

        system.rent(1, &Customer::new("A", "555", "CNIC1"), 4)?;
        assert!(system.available().is_empty());
        assert_eq!(system.rented().len(), 1);

        let outcome = system.return_vehicle(1, false)?;
        assert!(outcome.log_error.is_none());
        assert_eq!(outcome.receipt.total, Decimal::from(12000));
        assert_eq!(system.available().len(), 1);
        assert!(system.rented().is_empty());

        let lines = system.receipts()?.collect::<FleetResult<Vec<_>>>()?;
        assert!(lines.iter().any(|line| line == "Total Charge: Rs12000"));
        Ok(())
    }

    #[test]
    fn damaged_return_adds_configured_surcharge() -> Result<()> {
        let dir = tempdir()?;
        let mut config = AppConfig::with_data_dir(dir.path());
        config.damage_surcharge = Decimal::from(1000);
        let mut system = RentalSystem::open(&config)?;

        system.add_vehicle(corolla())?;
        system.rent(1, &Customer::new("A", "555", "CNIC1"), 2)?;
        let receipt = system.return_vehicle(1, true)?.receipt;

        assert_eq!(receipt.damage_charge, Decimal::from(1000));
        assert_eq!(receipt.total, Decimal::from(7000));
        Ok(())
    }

    #[test]
    fn reopened_fleet_keeps_rates_but_not_rentals() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::with_data_dir(dir.path());
        {
            let mut system = RentalSystem::open(&config)?;
            system.add_vehicle(corolla())?;
            system.add_vehicle(Vehicle::new(
                "SUV",
                "Kia",
                "Sportage",
                "2022",
                Decimal::new(4250_75, 2),
            ))?;
            system.rent(2, &Customer::new("A", "555", "CNIC1"), 3)?;
        }

        let system = RentalSystem::open(&config)?;
        assert_eq!(system.fleet().len(), 2);
        assert_eq!(system.available().len(), 2);
        let rates: Vec<Decimal> = system.fleet().vehicles().map(|v| v.daily_rate).collect();
        assert_eq!(rates, vec![Decimal::from(3000), Decimal::new(4250_75, 2)]);
        Ok(())
    }

    #[test]
    fn failed_save_keeps_vehicle_in_memory() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::with_data_dir(dir.path());
        let mut system = RentalSystem::open(&config)?;
        fs::create_dir(config.fleet_path())?;

        let err = system.add_vehicle(corolla()).unwrap_err();
        assert!(matches!(err, FleetError::FileUnavailable { .. }));
        assert_eq!(system.fleet().len(), 1);
        Ok(())
    }

    #[test]
    fn unrecorded_receipt_is_still_returned() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::with_data_dir(dir.path());
        let mut system = RentalSystem::open(&config)?;
        system.add_vehicle(corolla())?;
        system.rent(1, &Customer::new("A", "555", "CNIC1"), 3)?;
        fs::create_dir(config.receipts_path())?;

        let outcome = system.return_vehicle(1, true)?;
        assert!(matches!(
            outcome.log_error,
            Some(FleetError::FileUnavailable { .. })
        ));
        assert_eq!(outcome.receipt.total, Decimal::from(14000));
        assert!(system.rented().is_empty());
        Ok(())
    }

    #[test]
    fn vehicle_with_comma_is_rejected_and_fleet_reopens() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::with_data_dir(dir.path());
        let mut system = RentalSystem::open(&config)?;
        system.add_vehicle(corolla())?;

        let benz = Vehicle::new("Sedan", "Mercedes, Benz", "C200", "2021", Decimal::from(4000));
        let err = system.add_vehicle(benz).unwrap_err();
        assert!(matches!(err, FleetError::InvalidField { field: "make", .. }));
        assert_eq!(system.fleet().len(), 1);

        let reopened = RentalSystem::open(&config)?;
        assert_eq!(reopened.fleet().len(), 1);
        Ok(())
    }

    #[test]
    fn fleet_above_lowered_capacity_still_opens() -> Result<()> {
        let dir = tempdir()?;
        let mut config = AppConfig::with_data_dir(dir.path());
        {
            let mut system = RentalSystem::open(&config)?;
            system.add_vehicle(corolla())?;
            system.add_vehicle(corolla())?;
        }
        config.fleet_capacity = 1;

        let mut system = RentalSystem::open(&config)?;
        assert_eq!(system.fleet().len(), 2);
        let err = system.add_vehicle(corolla()).unwrap_err();
        assert!(matches!(err, FleetError::FleetFull { capacity: 1 }));
        Ok(())
    }

    #[test]
    fn capacity_comes_from_config() -> Result<()> {
        let dir = tempdir()?;
        let mut config = AppConfig::with_data_dir(dir.path());
        config.fleet_capacity = 1;
        let mut system = RentalSystem::open(&config)?;

        system.add_vehicle(corolla())?;
        let err = system.add_vehicle(corolla()).unwrap_err();
        assert!(matches!(err, FleetError::FleetFull { capacity: 1 }));
        assert_eq!(system.fleet().len(), 1);
        Ok(())
    }
}
