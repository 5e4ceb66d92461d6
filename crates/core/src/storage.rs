//! Flat-file persistence for the fleet.
//!
//! One vehicle per line as `type,make,model,year,daily_rate`. Fields are not
//! quoted, so embedded commas do not survive a round trip. Rental state is
//! never written.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    error::{FleetError, FleetResult},
    models::Vehicle,
};

const FIELD_COUNT: usize = 5;

/// Reads and rewrites the fleet file.
#[derive(Debug, Clone)]
pub struct FleetFile {
    path: PathBuf,
}

impl FleetFile {
    /// Adapter for the fleet file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the fleet file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with every vehicle in `vehicles`.
    pub fn save<'a>(&self, vehicles: impl IntoIterator<Item = &'a Vehicle>) -> FleetResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| FleetError::file(parent, err))?;
        }
        let mut contents = String::new();
        let mut count = 0usize;
        for vehicle in vehicles {
            contents.push_str(&format_record(vehicle));
            contents.push('\n');
            count += 1;
        }
        fs::write(&self.path, contents).map_err(|err| FleetError::file(&self.path, err))?;
        debug!("saved {count} vehicles to {}", self.path.display());
        Ok(())
    }

    /// Read every vehicle from the file.
    ///
    /// A missing file is normal first-run state and yields an empty list.
    pub fn load(&self) -> FleetResult<Vec<Vehicle>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(
                    "fleet file {} not found; starting with an empty fleet",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(FleetError::file(&self.path, err)),
        };

        let mut vehicles = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let vehicle = parse_record(line).map_err(|reason| FleetError::MalformedRecord {
                path: self.path.clone(),
                line: number + 1,
                reason,
            })?;
            vehicles.push(vehicle);
        }
        debug!("loaded {} vehicles from {}", vehicles.len(), self.path.display());
        Ok(vehicles)
    }
}

fn format_record(vehicle: &Vehicle) -> String {
    format!(
        "{},{},{},{},{}",
        vehicle.kind, vehicle.make, vehicle.model, vehicle.year, vehicle.daily_rate
    )
}

fn parse_record(line: &str) -> Result<Vehicle, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {FIELD_COUNT} comma-separated fields, found {}",
            fields.len()
        ));
    }
    let rate = fields[4].trim();
    let daily_rate =
        Decimal::from_str(rate).map_err(|err| format!("invalid daily rate '{rate}': {err}"))?;
    Ok(Vehicle::new(
        fields[0], fields[1], fields[2], fields[3], daily_rate,
    ))
}
