//! Receipts for completed rentals and the append-only log they are kept in.

use std::{
    fmt,
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Lines, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    error::{FleetError, FleetResult},
    fleet::{Charge, Rental},
    models::{Customer, Vehicle},
};

const HEADER: &str = "--- Receipt ---";
const FOOTER: &str = "----------------";

/// Charge breakdown for one completed rental.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Renter as recorded when the rental started.
    pub customer: Customer,
    /// Vehicle that was returned.
    pub vehicle: Vehicle,
    /// Days the vehicle was rented for.
    pub days: u32,
    /// Whether the vehicle came back damaged.
    pub damaged: bool,
    /// Damage surcharge, zero when returned intact.
    pub damage_charge: Decimal,
    /// Amount owed.
    pub total: Decimal,
    /// When the vehicle was returned.
    pub issued_at: DateTime<Local>,
}

impl Receipt {
    pub(crate) fn new(vehicle: Vehicle, rental: Rental, charge: Charge) -> Self {
        Self {
            customer: rental.customer,
            vehicle,
            days: rental.days,
            damaged: rental.damaged,
            damage_charge: charge.damage,
            total: charge.total,
            issued_at: Local::now(),
        }
    }

    /// Body lines of the receipt, without the header and footer markers.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Date: {}", self.issued_at.format("%Y-%m-%d %H:%M:%S")),
            self.customer.to_string(),
            format!(
                "Vehicle: {}, Make: {}, Model: {}, Year: {}, Rate per day: Rs{}",
                self.vehicle.kind,
                self.vehicle.make,
                self.vehicle.model,
                self.vehicle.year,
                self.vehicle.daily_rate
            ),
            format!("Days Rented: {}", self.days),
            format!("Damage Charge: {}", self.damage_charge),
            format!("Total Charge: Rs{}", self.total),
        ]
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER}")?;
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{FOOTER}")
    }
}

/// Append-only text log of receipts.
#[derive(Debug, Clone)]
pub struct ReceiptLog {
    path: PathBuf,
}

impl ReceiptLog {
    /// Log backed by the file at `path`; the file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the receipts file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one receipt block to the log.
    pub fn append(&self, receipt: &Receipt) -> FleetResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| FleetError::file(parent, err))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| FleetError::file(&self.path, err))?;
        file.write_all(receipt.to_string().as_bytes())
            .map_err(|err| FleetError::file(&self.path, err))?;
        info!(
            "recorded receipt for {} ({} {}), total {}",
            receipt.customer.name, receipt.vehicle.make, receipt.vehicle.model, receipt.total
        );
        Ok(())
    }

    /// Read the log line by line.
    ///
    /// Each call reopens the file. A log that does not exist yet is reported as
    /// [`FleetError::FileUnavailable`] rather than as an empty sequence.
    pub fn lines(&self) -> FleetResult<ReceiptLines> {
        let file = File::open(&self.path).map_err(|err| FleetError::file(&self.path, err))?;
        Ok(ReceiptLines {
            path: self.path.clone(),
            inner: BufReader::new(file).lines(),
        })
    }
}

/// Lazy iterator over the lines of a receipts log.
pub struct ReceiptLines {
    path: PathBuf,
    inner: Lines<BufReader<File>>,
}

impl Iterator for ReceiptLines {
    type Item = FleetResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|line| line.map_err(|err| FleetError::file(&self.path, err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn sample_receipt(damaged: bool) -> Receipt {
        let vehicle = Vehicle::new("Sedan", "Toyota", "Corolla", "2020", Decimal::from(2500));
        let rental = Rental {
            customer: Customer::new("A", "555", "CNIC1"),
            days: 3,
            damaged,
        };
        let charge = Charge::compute(vehicle.daily_rate, 3, damaged, Decimal::from(5000))
            .expect("sample charge fits");
        Receipt::new(vehicle, rental, charge)
    }

    #[test]
    fn receipt_block_is_bounded_by_markers() {
        let text = sample_receipt(true).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&HEADER));
        assert_eq!(lines.last(), Some(&FOOTER));
        assert!(lines.contains(&"Customer Name: A, Phone: 555, CNIC: CNIC1"));
        assert!(lines.contains(
            &"Vehicle: Sedan, Make: Toyota, Model: Corolla, Year: 2020, Rate per day: Rs2500"
        ));
        assert!(lines.contains(&"Days Rented: 3"));
        assert!(lines.contains(&"Damage Charge: 5000"));
        assert!(lines.contains(&"Total Charge: Rs12500"));
    }

    #[test]
    fn append_accumulates_blocks() -> Result<()> {
        let dir = tempdir()?;
        let log = ReceiptLog::new(dir.path().join("receipts.txt"));

        log.append(&sample_receipt(false))?;
        log.append(&sample_receipt(true))?;

        let lines = log.lines()?.collect::<FleetResult<Vec<_>>>()?;
        let headers = lines.iter().filter(|line| line.as_str() == HEADER).count();
        assert_eq!(headers, 2);
        assert!(lines.iter().any(|line| line == "Total Charge: Rs7500"));
        assert!(lines.iter().any(|line| line == "Total Charge: Rs12500"));

        let again = log.lines()?.count();
        assert_eq!(again, lines.len());
        Ok(())
    }

    #[test]
    fn missing_log_is_unavailable_not_empty() -> Result<()> {
        let dir = tempdir()?;
        let log = ReceiptLog::new(dir.path().join("receipts.txt"));

        let err = log.lines().err().expect("expected missing log error");
        assert!(matches!(err, FleetError::FileUnavailable { .. }));
        Ok(())
    }

    #[test]
    fn append_creates_missing_directories() -> Result<()> {
        let dir = tempdir()?;
        let log = ReceiptLog::new(dir.path().join("nested/receipts.txt"));
        log.append(&sample_receipt(false))?;
        assert!(log.path().exists());
        Ok(())
    }
}
