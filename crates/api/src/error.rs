// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use bsms::CoreError;
use bsms_domain::DomainError;
use bsms_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with existing roster data.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Every seat on the target bus is taken.
    CapacityExceeded {
        /// A human-readable description of the capacity limit hit.
        message: String,
    },
    /// A conductor attempted an operation outside their assigned bus.
    UnauthorizedScope {
        /// A human-readable description of the scope violation.
        message: String,
    },
    /// The uploaded CSV could not be parsed.
    InvalidCsvFormat {
        /// Why the CSV was rejected.
        reason: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::CapacityExceeded { message } => {
                write!(f, "Capacity exceeded: {message}")
            }
            Self::UnauthorizedScope { message } => {
                write!(f, "Unauthorized scope: {message}")
            }
            Self::InvalidCsvFormat { reason } => {
                write!(f, "Invalid CSV: {reason}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidStudentId(msg) => ApiError::InvalidInput {
            field: String::from("student_id"),
            message: msg,
        },
        DomainError::InvalidRoute(msg) => ApiError::InvalidInput {
            field: String::from("route"),
            message: msg,
        },
        DomainError::InvalidBusNumber(msg) => ApiError::InvalidInput {
            field: String::from("bus_no"),
            message: msg,
        },
        DomainError::BusNotFound(bus_no) => ApiError::ResourceNotFound {
            resource_type: String::from("Bus"),
            message: format!("Bus {bus_no} does not exist"),
        },
        DomainError::RouteNotFound(route) => ApiError::ResourceNotFound {
            resource_type: String::from("Route"),
            message: format!("No bus serves route '{route}'"),
        },
        DomainError::StudentNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Student '{id}' does not exist"),
        },
        DomainError::TicketNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("No ticket for today matches '{id}'"),
        },
        DomainError::DuplicateStudent(id) => ApiError::Conflict {
            rule: String::from("unique_student_id"),
            message: format!("Student '{id}' already exists"),
        },
        DomainError::BusFull { bus_no, capacity } => ApiError::CapacityExceeded {
            message: format!("Bus {bus_no} is full ({capacity} seats taken)"),
        },
        DomainError::ConductorNotAssigned(id) => ApiError::UnauthorizedScope {
            message: format!("Conductor '{id}' is not assigned to a bus"),
        },
        DomainError::OutsideAssignedBus {
            conductor_id,
            bus_no,
        } => ApiError::UnauthorizedScope {
            message: format!("Conductor '{conductor_id}' is not assigned to bus {bus_no}"),
        },
        DomainError::InvalidDate { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
