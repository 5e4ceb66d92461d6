//! In-memory fleet bookkeeping: vehicles, their rental associations and billing.

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    error::{FleetError, FleetResult},
    models::{Customer, Vehicle},
    receipt::Receipt,
};

/// Maximum number of vehicles when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 100;

/// 1-based position of a vehicle in the fleet, used as its external identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(usize);

impl SlotIndex {
    fn from_offset(offset: usize) -> Self {
        Self(offset + 1)
    }

    /// The 1-based value shown to operators.
    pub fn get(self) -> usize {
        self.0
    }

    fn offset(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who holds a rented vehicle and on what terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rental {
    /// Snapshot of the renter taken when the rental started.
    pub customer: Customer,
    /// Number of days agreed at rent time.
    pub days: u32,
    /// Whether the vehicle came back damaged; only set while returning.
    pub damaged: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    vehicle: Vehicle,
    rental: Option<Rental>,
}

/// A vehicle currently out on rent, as listed to operators.
#[derive(Debug, Clone, Copy)]
pub struct RentedVehicle<'a> {
    /// Slot holding the vehicle.
    pub index: SlotIndex,
    /// The rented vehicle.
    pub vehicle: &'a Vehicle,
    /// Renter recorded for the slot.
    pub customer: &'a Customer,
    /// Agreed rental length.
    pub days: u32,
}

/// Damage and total charges for a completed rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charge {
    /// Surcharge applied for damage, zero when returned intact.
    pub damage: Decimal,
    /// Rate times days plus the damage surcharge.
    pub total: Decimal,
}

impl Charge {
    /// Compute `daily_rate * days`, plus `surcharge` when `damaged`.
    ///
    /// Returns `None` when the total does not fit in a [`Decimal`].
    pub fn compute(
        daily_rate: Decimal,
        days: u32,
        damaged: bool,
        surcharge: Decimal,
    ) -> Option<Self> {
        let damage = if damaged { surcharge } else { Decimal::ZERO };
        let total = daily_rate
            .checked_mul(Decimal::from(days))?
            .checked_add(damage)?;
        Some(Self { damage, total })
    }
}

/// Capacity-bounded, append-only collection of vehicles and their rentals.
///
/// A slot is rented out exactly when it carries a [`Rental`].
#[derive(Debug, Clone)]
pub struct Fleet {
    slots: Vec<Slot>,
    capacity: usize,
}

impl Default for Fleet {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Fleet {
    /// Create an empty fleet holding at most `capacity` vehicles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    /// Build a fleet of available vehicles, e.g. from persisted storage.
    ///
    /// Every vehicle is kept even beyond `capacity`; such a fleet refuses
    /// further additions.
    pub fn from_vehicles(capacity: usize, vehicles: Vec<Vehicle>) -> Self {
        if vehicles.len() > capacity {
            warn!(
                "fleet holds {} vehicles, above the capacity of {capacity}",
                vehicles.len()
            );
        }
        let slots = vehicles
            .into_iter()
            .map(|vehicle| Slot {
                vehicle,
                rental: None,
            })
            .collect();
        Self { slots, capacity }
    }

    /// Number of vehicles in the fleet.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no vehicle has been added yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of vehicles.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All vehicles in slot order, regardless of rental status.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.slots.iter().map(|slot| &slot.vehicle)
    }

    /// Look up a vehicle by its 1-based index.
    pub fn vehicle(&self, index: i64) -> FleetResult<&Vehicle> {
        let offset = self.resolve(index)?;
        Ok(&self.slots[offset].vehicle)
    }

    /// Rental association of the slot, if the vehicle is rented out.
    pub fn rental(&self, index: i64) -> FleetResult<Option<&Rental>> {
        let offset = self.resolve(index)?;
        Ok(self.slots[offset].rental.as_ref())
    }

    /// Append a vehicle, returning its slot index.
    ///
    /// Text attributes containing commas or line breaks are rejected.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> FleetResult<SlotIndex> {
        vehicle.validate()?;
        if self.slots.len() >= self.capacity {
            return Err(FleetError::FleetFull {
                capacity: self.capacity,
            });
        }
        self.slots.push(Slot {
            vehicle,
            rental: None,
        });
        let index = SlotIndex::from_offset(self.slots.len() - 1);
        debug!("added vehicle at slot {index}");
        Ok(index)
    }

    /// Vehicles not currently rented out, in fleet order.
    pub fn available(&self) -> Vec<(SlotIndex, &Vehicle)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.rental.is_none())
            .map(|(offset, slot)| (SlotIndex::from_offset(offset), &slot.vehicle))
            .collect()
    }

    /// Vehicles currently rented out, with their renters.
    pub fn rented(&self) -> Vec<RentedVehicle<'_>> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(offset, slot)| {
                slot.rental.as_ref().map(|rental| RentedVehicle {
                    index: SlotIndex::from_offset(offset),
                    vehicle: &slot.vehicle,
                    customer: &rental.customer,
                    days: rental.days,
                })
            })
            .collect()
    }

    /// Rent out the vehicle at `index` to a copy of `customer` for `days` days.
    pub fn rent(&mut self, index: i64, customer: &Customer, days: u32) -> FleetResult<()> {
        let offset = self.resolve(index)?;
        let slot = &mut self.slots[offset];
        if slot.rental.is_some() {
            return Err(FleetError::AlreadyRented { index: offset + 1 });
        }
        slot.rental = Some(Rental {
            customer: customer.clone(),
            days,
            damaged: false,
        });
        Ok(())
    }

    /// Take back the vehicle at `index`, clearing its rental and billing it.
    ///
    /// The returned receipt still has to be recorded by the caller. If the bill
    /// overflows, the rental stays in place.
    pub fn return_vehicle(
        &mut self,
        index: i64,
        damaged: bool,
        surcharge: Decimal,
    ) -> FleetResult<Receipt> {
        let offset = self.resolve(index)?;
        let slot = &mut self.slots[offset];
        let days = slot
            .rental
            .as_ref()
            .map(|rental| rental.days)
            .ok_or(FleetError::NotRented { index: offset + 1 })?;
        let charge = Charge::compute(slot.vehicle.daily_rate, days, damaged, surcharge)
            .ok_or(FleetError::ChargeOverflow { index: offset + 1 })?;

        let mut rental = slot
            .rental
            .take()
            .ok_or(FleetError::NotRented { index: offset + 1 })?;
        rental.damaged = damaged;
        Ok(Receipt::new(slot.vehicle.clone(), rental, charge))
    }

    fn resolve(&self, index: i64) -> FleetResult<usize> {
        let invalid = || FleetError::InvalidIndex {
            index,
            size: self.slots.len(),
        };
        let position = usize::try_from(index).map_err(|_| invalid())?;
        if position == 0 || position > self.slots.len() {
            return Err(invalid());
        }
        Ok(SlotIndex(position).offset())
    }
}
