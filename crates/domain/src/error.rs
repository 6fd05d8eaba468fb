// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and seat allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Passenger name is empty or invalid.
    InvalidName(String),
    /// Student id is empty or invalid.
    InvalidStudentId(String),
    /// Route is empty or invalid.
    InvalidRoute(String),
    /// Bus number is not a positive integer.
    InvalidBusNumber(String),
    /// Referenced bus does not exist.
    BusNotFound(u32),
    /// No bus serves the route.
    RouteNotFound(String),
    /// Referenced student does not exist.
    StudentNotFound(String),
    /// No ticket for today matches the id.
    TicketNotFound(String),
    /// A student with this id already exists.
    DuplicateStudent(String),
    /// Every seat on the bus is taken.
    BusFull {
        /// The full bus.
        bus_no: u32,
        /// Its capacity.
        capacity: u32,
    },
    /// The conductor is not assigned to any bus.
    ConductorNotAssigned(String),
    /// A conductor attempted an operation outside their assigned bus.
    OutsideAssignedBus {
        /// The conductor.
        conductor_id: String,
        /// The bus the operation targeted.
        bus_no: u32,
    },
    /// Failed to parse a calendar date.
    InvalidDate {
        /// The raw date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidStudentId(msg) => write!(f, "Invalid student id: {msg}"),
            Self::InvalidRoute(msg) => write!(f, "Invalid route: {msg}"),
            Self::InvalidBusNumber(msg) => write!(f, "Invalid bus number: {msg}"),
            Self::BusNotFound(bus_no) => write!(f, "Bus {bus_no} not found"),
            Self::RouteNotFound(route) => write!(f, "No bus serves route '{route}'"),
            Self::StudentNotFound(id) => write!(f, "Student '{id}' not found"),
            Self::TicketNotFound(id) => write!(f, "No ticket for today matches '{id}'"),
            Self::DuplicateStudent(id) => write!(f, "Student '{id}' already exists"),
            Self::BusFull { bus_no, capacity } => {
                write!(f, "Bus {bus_no} is full ({capacity} seats taken)")
            }
            Self::ConductorNotAssigned(id) => {
                write!(f, "Conductor '{id}' is not assigned to a bus")
            }
            Self::OutsideAssignedBus {
                conductor_id,
                bus_no,
            } => {
                write!(
                    f,
                    "Conductor '{conductor_id}' is not assigned to bus {bus_no}"
                )
            }
            Self::InvalidDate { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
