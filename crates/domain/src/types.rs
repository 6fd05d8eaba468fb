// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::Date;

/// Seat capacity assumed for a bus when none is recorded.
pub const DEFAULT_CAPACITY: u32 = 36;

const fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

/// Normalizes a route string into its case-insensitive lookup key.
///
/// Route matching everywhere in the system goes through this key.
#[must_use]
pub fn normalize_route(route: &str) -> String {
    route.trim().to_lowercase()
}

/// A bus in the fleet roster.
///
/// `bus_no` is the primary key. The bus roster is replaced wholesale by
/// bulk import; staff fields are mutated individually by replacement
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    /// Unique positive bus number.
    pub bus_no: u32,
    /// Registration plate of the vehicle, when recorded.
    #[serde(default)]
    pub vehicle_no: Option<String>,
    /// Driver name.
    #[serde(default)]
    pub driver: Option<String>,
    /// Driver contact number.
    #[serde(default)]
    pub driver_contact: Option<String>,
    /// Helper name.
    #[serde(default)]
    pub helper: Option<String>,
    /// Helper contact number.
    #[serde(default)]
    pub helper_contact: Option<String>,
    /// Free-text route served by this bus.
    pub route: String,
    /// Departure time as free text.
    #[serde(default)]
    pub time: Option<String>,
    /// Number of seats on the bus.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    /// Conductor currently assigned to this bus. At most one bus per
    /// conductor is assumed; the last writer wins.
    #[serde(default)]
    pub conductor_id: Option<String>,
}

impl Bus {
    /// Returns the normalized route key used for route matching.
    #[must_use]
    pub fn route_key(&self) -> String {
        normalize_route(&self.route)
    }
}

/// A permanent student with an optional bus and seat assignment.
///
/// Students are created by bulk import (`fee_paid` must be affirmative)
/// or by an on-the-spot add (`fee_paid` defaults to false). They are
/// never deleted; attendance and reassignment mutate them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique student identifier.
    pub student_id: String,
    /// The student's name.
    pub name: String,
    /// Enrolled course, when recorded.
    #[serde(default)]
    pub course: Option<String>,
    /// Year of study, when recorded.
    #[serde(default)]
    pub year: Option<u32>,
    /// The bus this student rides, if assigned.
    #[serde(default)]
    pub bus_no: Option<u32>,
    /// The seat on that bus, unique within the bus.
    #[serde(default)]
    pub seat: Option<u32>,
    /// Whether the student was marked present. The flag persists until
    /// the next explicit set.
    #[serde(default)]
    pub present: bool,
    /// Whether the transport fee has been paid.
    #[serde(default)]
    pub fee_paid: bool,
}

/// A one-day ticket passenger.
///
/// Tickets are valid for a single calendar date and are purged the first
/// time any ticket-reading operation runs on a later date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Identifier for the day, synthesized when not supplied.
    pub student_id: String,
    /// The passenger's name.
    pub name: String,
    /// The bus this ticket is for.
    pub bus_no: u32,
    /// The allocated seat, unique within the bus for the date.
    pub seat: u32,
    /// The calendar date the ticket is valid on.
    pub date: Date,
    /// Whether the passenger was marked present.
    #[serde(default)]
    pub present: bool,
}

/// Course and year exclusions for an off-day consolidation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffDayFilter {
    /// Courses excused today. Matched against the student's course after
    /// trimming, case sensitively.
    #[serde(default)]
    pub courses: Vec<String>,
    /// Years of study excused today.
    #[serde(default)]
    pub years: Vec<u32>,
}

impl OffDayFilter {
    /// Whether the student is excused today.
    ///
    /// Set-membership OR: a student is off when their course is listed
    /// or their year is listed.
    #[must_use]
    pub fn is_off_day(&self, student: &Student) -> bool {
        let course_hit: bool = student
            .course
            .as_deref()
            .is_some_and(|course| self.courses.iter().any(|off| off.trim() == course.trim()));
        let year_hit: bool = student.year.is_some_and(|year| self.years.contains(&year));
        course_hit || year_hit
    }
}
