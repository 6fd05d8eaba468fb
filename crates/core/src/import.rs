// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bsms_domain::{
    Bus, DEFAULT_CAPACITY, Student, normalize_route, parse_fee_paid, validate_bus_no,
    validate_name, validate_route, validate_student_id,
};
use std::collections::{HashMap, HashSet};

/// A canonical incoming student row.
///
/// Header aliasing and cell cleanup happen at the boundary; the
/// reconciler only ever sees this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRow {
    /// Unique student identifier.
    pub student_id: String,
    /// The student's name.
    pub name: String,
    /// Enrolled course.
    pub course: Option<String>,
    /// Year of study.
    pub year: Option<u32>,
    /// Route the student rides; resolved to a bus case-insensitively.
    pub route: String,
    /// Raw fee cell; only affirmative values ("yes", "true", "1") are
    /// accepted.
    pub fee_paid: String,
}

/// A canonical incoming bus row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusRow {
    /// Parsed bus number; `None` when the cell was not a valid integer.
    pub bus_no: Option<u32>,
    /// Registration plate of the vehicle.
    pub vehicle_no: Option<String>,
    /// Driver name.
    pub driver: Option<String>,
    /// Driver contact number.
    pub driver_contact: Option<String>,
    /// Helper name.
    pub helper: Option<String>,
    /// Helper contact number.
    pub helper_contact: Option<String>,
    /// Route served by the bus.
    pub route: String,
    /// Departure time.
    pub time: Option<String>,
    /// Parsed capacity; `None` or zero falls back to the default.
    pub capacity: Option<u32>,
    /// Assigned conductor.
    pub conductor_id: Option<String>,
}

/// The outcome of a student import batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentImport {
    /// Newly accepted students, in input order.
    pub accepted: Vec<Student>,
    /// How many rows were skipped. Rejection reasons are not reported;
    /// a bad row is skipped, never fatal to the batch.
    pub rejected: usize,
}

/// Converts a batch of incoming rows into new roster entries.
///
/// Rows are processed in input order. A row is skipped when its fee is
/// not affirmative, a required field is empty, the id duplicates an
/// existing or earlier-accepted student, no bus serves its route, or the
/// bus is out of seats. Seats are handed out from a per-bus counter
/// seeded with the highest seat already held by a permanent student on
/// that bus, so seats within one batch are strictly increasing and
/// contiguous per bus. Day tickets are not consulted when seeding the
/// counter; that mirrors the upstream data flow where imports run before
/// conductors issue tickets.
#[must_use]
pub fn reconcile_students(
    rows: &[StudentRow],
    existing: &[Student],
    buses: &[Bus],
) -> StudentImport {
    let mut seen: HashSet<String> = existing
        .iter()
        .map(|student| student.student_id.clone())
        .collect();

    // Highest seat already occupied per bus, permanent students only.
    let mut highest_seat: HashMap<u32, u32> = HashMap::new();
    for student in existing {
        if let (Some(bus_no), Some(seat)) = (student.bus_no, student.seat) {
            let entry: &mut u32 = highest_seat.entry(bus_no).or_insert(0);
            *entry = (*entry).max(seat);
        }
    }

    let mut outcome: StudentImport = StudentImport::default();

    for row in rows {
        let student_id: &str = row.student_id.trim();
        let name: &str = row.name.trim();
        let route: &str = row.route.trim();

        if !parse_fee_paid(&row.fee_paid)
            || validate_student_id(student_id).is_err()
            || validate_name(name).is_err()
            || validate_route(route).is_err()
        {
            outcome.rejected += 1;
            continue;
        }
        if seen.contains(student_id) {
            outcome.rejected += 1;
            continue;
        }

        let key: String = normalize_route(route);
        let Some(bus) = buses.iter().find(|bus| bus.route_key() == key) else {
            outcome.rejected += 1;
            continue;
        };

        let current: u32 = highest_seat.get(&bus.bus_no).copied().unwrap_or(0);
        if current >= bus.capacity {
            outcome.rejected += 1;
            continue;
        }
        let seat: u32 = current + 1;
        highest_seat.insert(bus.bus_no, seat);
        seen.insert(student_id.to_string());

        outcome.accepted.push(Student {
            student_id: student_id.to_string(),
            name: name.to_string(),
            course: row.course.as_deref().map(|course| course.trim().to_string()),
            year: row.year,
            bus_no: Some(bus.bus_no),
            seat: Some(seat),
            present: false,
            fee_paid: true,
        });
    }

    outcome
}

/// Maps incoming bus rows to a fresh bus roster.
///
/// Only rows with a valid positive bus number and a non-empty route are
/// kept. The result replaces the prior roster wholesale; a bus omitted
/// from the batch ceases to exist for subsequent lookups.
#[must_use]
pub fn reconcile_buses(rows: &[BusRow]) -> Vec<Bus> {
    rows.iter()
        .filter_map(|row| {
            let bus_no: u32 = row.bus_no?;
            validate_bus_no(bus_no).ok()?;
            let route: &str = row.route.trim();
            validate_route(route).ok()?;
            Some(Bus {
                bus_no,
                vehicle_no: row.vehicle_no.clone(),
                driver: row.driver.clone(),
                driver_contact: row.driver_contact.clone(),
                helper: row.helper.clone(),
                helper_contact: row.helper_contact.clone(),
                route: route.to_string(),
                time: row.time.clone(),
                capacity: row.capacity.filter(|capacity| *capacity > 0).unwrap_or(DEFAULT_CAPACITY),
                conductor_id: row.conductor_id.clone(),
            })
        })
        .collect()
}
