#![allow(missing_docs)]

//! Vehicle and customer records.

use std::{convert::Infallible, fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FleetError, FleetResult};

/// Kind of vehicle held in the fleet.
///
/// Known kinds are matched case-insensitively; anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Sedan,
    Suv,
    Truck,
    Other(String),
}

impl FromStr for VehicleKind {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let kind = match trimmed.to_ascii_lowercase().as_str() {
            "sedan" => Self::Sedan,
            "suv" => Self::Suv,
            "truck" => Self::Truck,
            _ => Self::Other(trimmed.to_string()),
        };
        Ok(kind)
    }
}

impl From<&str> for VehicleKind {
    fn from(value: &str) -> Self {
        match value.parse::<Self>() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sedan => f.write_str("Sedan"),
            Self::Suv => f.write_str("SUV"),
            Self::Truck => f.write_str("Truck"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A single vehicle in the fleet.
///
/// Rental status is not stored here; it belongs to the fleet slot holding the
/// vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Vehicle kind.
    pub kind: VehicleKind,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year as entered; free text.
    pub year: String,
    /// Charge per rental day.
    pub daily_rate: Decimal,
}

impl Vehicle {
    /// Build a vehicle from operator-entered attributes.
    pub fn new(
        kind: impl Into<VehicleKind>,
        make: impl Into<String>,
        model: impl Into<String>,
        year: impl Into<String>,
        daily_rate: Decimal,
    ) -> Self {
        Self {
            kind: kind.into(),
            make: make.into(),
            model: model.into(),
            year: year.into(),
            daily_rate,
        }
    }

    /// Check that every text attribute survives the comma-separated fleet file.
    pub fn validate(&self) -> FleetResult<()> {
        let kind = self.kind.to_string();
        let fields = [
            ("type", kind.as_str()),
            ("make", self.make.as_str()),
            ("model", self.model.as_str()),
            ("year", self.year.as_str()),
        ];
        for (field, value) in fields {
            if value.contains([',', '\n', '\r']) {
                return Err(FleetError::InvalidField {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Make: {}, Model: {}, Year: {}, Rate per day: Rs{}",
            self.kind, self.make, self.model, self.year, self.daily_rate
        )
    }
}

/// A renter's identity as reported at the start of a customer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    /// National identity card number (CNIC).
    pub national_id: String,
}

impl Customer {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        national_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            national_id: national_id.into(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer Name: {}, Phone: {}, CNIC: {}",
            self.name, self.phone, self.national_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_parse_case_insensitively() {
        assert_eq!(VehicleKind::from("sedan"), VehicleKind::Sedan);
        assert_eq!(VehicleKind::from(" SUV "), VehicleKind::Suv);
        assert_eq!(VehicleKind::from("Truck"), VehicleKind::Truck);
    }

    #[test]
    fn unknown_kind_is_preserved() {
        let kind = VehicleKind::from("Hatchback");
        assert_eq!(kind, VehicleKind::Other("Hatchback".to_string()));
        assert_eq!(kind.to_string(), "Hatchback");
    }

    #[test]
    fn vehicle_display_matches_listing_format() {
        let car = Vehicle::new("Sedan", "Toyota", "Corolla", "2020", Decimal::from(3000));
        assert_eq!(
            car.to_string(),
            "Type: Sedan, Make: Toyota, Model: Corolla, Year: 2020, Rate per day: Rs3000"
        );
    }

    #[test]
    fn commas_and_line_breaks_are_rejected() {
        let car = Vehicle::new("Sedan", "Mercedes, Benz", "C200", "2021", Decimal::from(4000));
        assert!(matches!(
            car.validate(),
            Err(FleetError::InvalidField { field: "make", .. })
        ));

        let car = Vehicle::new("Sedan", "Toyota", "Corolla", "20\n20", Decimal::from(3000));
        assert!(matches!(
            car.validate(),
            Err(FleetError::InvalidField { field: "year", .. })
        ));

        let car = Vehicle::new("Sedan", "Toyota", "Corolla", "2020", Decimal::from(3000));
        assert!(car.validate().is_ok());
    }

    #[test]
    fn customer_display_includes_identity() {
        let customer = Customer::new("A", "555", "CNIC1");
        assert_eq!(customer.to_string(), "Customer Name: A, Phone: 555, CNIC: CNIC1");
    }
}
