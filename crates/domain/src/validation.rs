// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Values accepted as affirmative for the `fee_paid` import column.
const AFFIRMATIVE: &[&str] = &["yes", "true", "1"];

/// Parses a raw `fee_paid` cell into a boolean.
///
/// Anything other than an affirmative value (case-insensitive) is false.
#[must_use]
pub fn parse_fee_paid(raw: &str) -> bool {
    AFFIRMATIVE.contains(&raw.trim().to_lowercase().as_str())
}

/// Validates that a passenger name is non-empty.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` for an empty or whitespace name.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a student id is non-empty.
///
/// # Errors
///
/// Returns `DomainError::InvalidStudentId` for an empty id.
pub fn validate_student_id(student_id: &str) -> Result<(), DomainError> {
    if student_id.trim().is_empty() {
        return Err(DomainError::InvalidStudentId(String::from(
            "Student id cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a route is non-empty.
///
/// # Errors
///
/// Returns `DomainError::InvalidRoute` for an empty route.
pub fn validate_route(route: &str) -> Result<(), DomainError> {
    if route.trim().is_empty() {
        return Err(DomainError::InvalidRoute(String::from(
            "Route cannot be empty",
        )));
    }
    Ok(())
}

/// Validates that a bus number is positive.
///
/// # Errors
///
/// Returns `DomainError::InvalidBusNumber` when the number is zero.
pub fn validate_bus_no(bus_no: u32) -> Result<(), DomainError> {
    if bus_no == 0 {
        return Err(DomainError::InvalidBusNumber(String::from(
            "Bus number must be a positive integer",
        )));
    }
    Ok(())
}
