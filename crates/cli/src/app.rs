use std::io::{BufRead, Write};

use anyhow::Result;
use fleet_rental_core::{
    AdminCredentials, Customer, FleetError, Receipt, RentalSystem, Vehicle, VehicleKind,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::theme::Theme;

const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

/// Whether the session loop should keep going after a menu returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Line-based menus driving a [`RentalSystem`].
pub struct Console<R, W> {
    system: RentalSystem,
    admin: AdminCredentials,
    input: R,
    output: W,
    theme: Theme,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(
        system: RentalSystem,
        admin: AdminCredentials,
        input: R,
        output: W,
        theme: Theme,
    ) -> Self {
        Self {
            system,
            admin,
            input,
            output,
            theme,
        }
    }

    /// Run the login loop until the operator exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let heading = self.theme.heading("Welcome to the Vehicle Rental System!");
            writeln!(self.output, "{heading}")?;
            writeln!(self.output, "1. Enter 'admin' to login as administrator")?;
            writeln!(self.output, "2. Enter 'customer' to continue as customer")?;
            writeln!(self.output, "3. Enter 'exit' to exit")?;

            let Some(choice) = self.prompt("> ")? else {
                break;
            };
            let flow = match choice.as_str() {
                "admin" | "1" => self.admin_login()?,
                "customer" | "2" => self.customer_login()?,
                "exit" | "3" => Flow::Exit,
                _ => {
                    self.warn(INVALID_CHOICE)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                break;
            }
        }
        info!("session ended");
        self.output.flush()?;
        Ok(())
    }

    fn admin_login(&mut self) -> Result<Flow> {
        let Some(username) = self.prompt("Enter administrator username: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(password) = self.prompt("Enter administrator password: ")? else {
            return Ok(Flow::Exit);
        };
        if !self.admin.verify(&username, &password) {
            warn!("rejected administrator login for '{username}'");
            self.error("Invalid administrator credentials.")?;
            return Ok(Flow::Continue);
        }
        info!("administrator '{username}' logged in");
        self.admin_menu()
    }

    fn admin_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output)?;
            let heading = self.theme.heading("--- Administrator Menu ---");
            writeln!(self.output, "{heading}")?;
            writeln!(self.output, "1. Add Vehicle to Fleet")?;
            writeln!(self.output, "2. Display Available Vehicles")?;
            writeln!(self.output, "3. Display All Receipts")?;
            writeln!(self.output, "4. Logout")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };
            let flow = match choice.as_str() {
                "1" => self.add_vehicle()?,
                "2" => self.show_available()?,
                "3" => self.show_receipts()?,
                "4" => return Ok(Flow::Continue),
                _ => {
                    self.warn(INVALID_CHOICE)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn customer_login(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt("Enter your name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(phone) = self.prompt("Enter your phone number: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(national_id) = self.prompt("Enter your CNIC: ")? else {
            return Ok(Flow::Exit);
        };
        let customer = Customer::new(name, phone, national_id);
        info!("customer session started for {}", customer.name);
        self.customer_menu(&customer)
    }

    fn customer_menu(&mut self, customer: &Customer) -> Result<Flow> {
        loop {
            writeln!(self.output)?;
            let heading = self.theme.heading("--- Customer Menu ---");
            writeln!(self.output, "{heading}")?;
            writeln!(self.output, "1. Display Available Vehicles")?;
            writeln!(self.output, "2. Rent a Vehicle")?;
            writeln!(self.output, "3. Return a Vehicle")?;
            writeln!(self.output, "4. Display Vehicles Currently on Rent")?;
            writeln!(self.output, "5. Logout")?;

            let Some(choice) = self.prompt("Enter your choice: ")? else {
                return Ok(Flow::Exit);
            };
            let flow = match choice.as_str() {
                "1" => self.show_available()?,
                "2" => self.rent(customer)?,
                "3" => self.return_vehicle()?,
                "4" => self.show_rented()?,
                "5" => return Ok(Flow::Continue),
                _ => {
                    self.warn(INVALID_CHOICE)?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn add_vehicle(&mut self) -> Result<Flow> {
        let Some(kind) = self.prompt("Enter vehicle type (Sedan/SUV/Truck): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(make) = self.prompt("Enter vehicle make: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(model) = self.prompt("Enter vehicle model: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(year) = self.prompt("Enter vehicle year: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(rate) = self.prompt("Enter vehicle daily rate: ")? else {
            return Ok(Flow::Exit);
        };
        let daily_rate = match rate.parse::<Decimal>() {
            Ok(rate) if rate.is_sign_negative() => {
                self.error("Daily rate cannot be negative.")?;
                return Ok(Flow::Continue);
            }
            Ok(rate) => rate,
            Err(_) => {
                self.error("Invalid daily rate.")?;
                return Ok(Flow::Continue);
            }
        };

        let vehicle = Vehicle::new(VehicleKind::from(kind.as_str()), make, model, year, daily_rate);
        match self.system.add_vehicle(vehicle) {
            Ok(index) => self.success(&format!("Vehicle added to the fleet as number {index}."))?,
            Err(err @ FleetError::FileUnavailable { .. }) => {
                self.warn(&format!("Vehicle added, but the fleet could not be saved: {err}"))?
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn show_available(&mut self) -> Result<Flow> {
        let available = self.system.available();
        let mut lines = Vec::with_capacity(available.len());
        for (index, vehicle) in available {
            lines.push(format!("{index}. {vehicle}"));
        }

        let heading = self.theme.heading("Available Vehicles:");
        writeln!(self.output, "{heading}")?;
        if lines.is_empty() {
            let empty = self.theme.muted("No vehicles available.");
            writeln!(self.output, "{empty}")?;
        }
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(Flow::Continue)
    }

    fn show_rented(&mut self) -> Result<Flow> {
        let mut blocks = Vec::new();
        for rented in self.system.rented() {
            blocks.push(format!(
                "Vehicle {}:\n{}\n{}\nRental Days: {}",
                rented.index, rented.vehicle, rented.customer, rented.days
            ));
        }

        let heading = self.theme.heading("Vehicles currently on rent:");
        writeln!(self.output, "{heading}")?;
        if blocks.is_empty() {
            let empty = self.theme.muted("No vehicles currently on rent.");
            writeln!(self.output, "{empty}")?;
        }
        for block in blocks {
            writeln!(self.output, "{block}")?;
        }
        Ok(Flow::Continue)
    }

    fn show_receipts(&mut self) -> Result<Flow> {
        let lines = match self.system.receipts() {
            Ok(lines) => lines,
            Err(err) => {
                debug!("receipts unavailable: {err}");
                self.error("Unable to open receipts file or file does not exist.")?;
                return Ok(Flow::Continue);
            }
        };

        writeln!(self.output)?;
        let heading = self.theme.heading("--- Receipts ---");
        writeln!(self.output, "{heading}")?;
        for line in lines {
            match line {
                Ok(line) => writeln!(self.output, "{line}")?,
                Err(err) => {
                    self.report(&err)?;
                    break;
                }
            }
        }
        writeln!(self.output, "----------------")?;
        Ok(Flow::Continue)
    }

    fn rent(&mut self, customer: &Customer) -> Result<Flow> {
        let Some(index) = self.prompt("Enter the vehicle number you want to rent: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(index) = index.parse::<i64>() else {
            self.error("Invalid vehicle selection.")?;
            return Ok(Flow::Continue);
        };
        let Some(days) = self.prompt("Enter the number of days you want to rent: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(days) = days.parse::<u32>() else {
            self.error("Invalid number of days.")?;
            return Ok(Flow::Continue);
        };

        match self.system.rent(index, customer, days) {
            Ok(()) => self.success("Vehicle rented successfully.")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn return_vehicle(&mut self) -> Result<Flow> {
        let Some(index) = self.prompt("Enter the vehicle number you want to return: ")? else {
            return Ok(Flow::Exit);
        };
        let Ok(index) = index.parse::<i64>() else {
            self.error("Invalid vehicle selection.")?;
            return Ok(Flow::Continue);
        };
        let Some(damage) =
            self.prompt("Is there any damage to the vehicle? (1 for Yes, 0 for No): ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(damaged) = parse_yes_no(&damage) else {
            self.error("Please answer 1 for Yes or 0 for No.")?;
            return Ok(Flow::Continue);
        };

        match self.system.return_vehicle(index, damaged) {
            Ok(outcome) => {
                self.print_receipt(&outcome.receipt)?;
                if let Some(err) = outcome.log_error {
                    self.warn(&format!("Receipt could not be saved: {err}"))?;
                }
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn print_receipt(&mut self, receipt: &Receipt) -> Result<()> {
        let heading = self.theme.heading("--- Receipt ---");
        writeln!(self.output, "{heading}")?;
        for line in receipt.lines() {
            writeln!(self.output, "{line}")?;
        }
        writeln!(self.output, "----------------")?;
        Ok(())
    }

    /// Show `label` and read one trimmed line; `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, err: &FleetError) -> Result<()> {
        let message = match err {
            FleetError::FleetFull { .. } => "Fleet is full. Cannot add more vehicles.".to_string(),
            FleetError::InvalidIndex { .. } => "Invalid vehicle selection.".to_string(),
            FleetError::AlreadyRented { .. } => "Vehicle is already rented out.".to_string(),
            FleetError::NotRented { .. } => "Vehicle is not rented out.".to_string(),
            FleetError::ChargeOverflow { .. } => {
                "The charge is too large to compute; the vehicle is still on rent.".to_string()
            }
            FleetError::InvalidField { field, .. } => {
                format!("Vehicle {field} must not contain commas.")
            }
            other => other.to_string(),
        };
        self.error(&message)
    }

    fn success(&mut self, message: &str) -> Result<()> {
        let text = self.theme.success(message);
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        let text = self.theme.warning(message);
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        let text = self.theme.error(message);
        writeln!(self.output, "{text}")?;
        Ok(())
    }
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" => Some(true),
        "0" | "n" | "no" => Some(false),
        _ => None,
    }
}
