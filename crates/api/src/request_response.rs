// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Responses echo the wire shapes the mobile clients already consume:
//! snake_case fields, `message` strings on mutations, and merged
//! passenger records flagged with `is_temp`.

use bsms::RoutePlan;
use bsms_domain::{Student, Ticket};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One passenger in the merged roster view.
///
/// Permanent students and day-ticket holders share this shape; ticket
/// holders carry `is_temp = true` and never have a course or year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerInfo {
    /// The passenger's identifier (student id or ticket id).
    pub student_id: String,
    /// The passenger's name.
    pub name: String,
    /// Enrolled course, permanent students only.
    pub course: Option<String>,
    /// Year of study, permanent students only.
    pub year: Option<u32>,
    /// Assigned bus.
    pub bus_no: Option<u32>,
    /// Assigned seat.
    pub seat: Option<u32>,
    /// Whether the passenger was marked present today.
    pub present: bool,
    /// Whether the transport fee is paid. Always `false` for tickets.
    pub fee_paid: bool,
    /// `true` when the record is a day ticket.
    pub is_temp: bool,
}

/// Response for a conductor's bus lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusAssignmentResponse {
    /// The bus the conductor is assigned to.
    pub bus_no: u32,
}

/// Request to mark a passenger present or absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The passenger to update.
    pub student_id: String,
    /// The new presence flag.
    pub present: bool,
}

/// Response after an attendance update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceResponse {
    /// A success message.
    pub message: String,
    /// The presence flag that was stored.
    pub present: bool,
}

/// Request to issue a day ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTicketRequest {
    /// The conductor issuing the ticket.
    pub conductor_id: String,
    /// The passenger's name.
    pub name: String,
    /// Optional caller-supplied ticket id.
    #[serde(default)]
    pub student_id: Option<String>,
}

/// Response after issuing a day ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTicketResponse {
    /// A success message.
    pub message: String,
    /// The issued ticket.
    pub ticket: Ticket,
}

/// Response after removing a day ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTicketResponse {
    /// A success message.
    pub message: String,
}

/// Request to add a walk-on student from the conductor's device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStudentRequest {
    /// The conductor adding the student.
    pub conductor_id: String,
    /// The new student's id.
    pub student_id: String,
    /// The new student's name.
    pub name: String,
}

/// Response after adding a walk-on student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStudentResponse {
    /// A success message.
    pub message: String,
    /// The stored student record.
    pub student: Student,
}

/// Request to move a student to a specific bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignStudentRequest {
    /// The student to move.
    pub student_id: String,
    /// The destination bus.
    pub bus_no: u32,
}

/// Response after moving a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignStudentResponse {
    /// A success message.
    pub message: String,
    /// The seat the student received on the destination bus.
    pub seat: u32,
}

/// Request to replace a bus's driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceDriverRequest {
    /// The bus to update.
    pub bus_no: u32,
    /// The new driver's name.
    pub driver_name: String,
    /// The new driver's contact, when provided.
    #[serde(default)]
    pub driver_contact: Option<String>,
}

/// Request to replace a bus's conductor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceConductorRequest {
    /// The bus to update.
    pub bus_no: u32,
    /// The new conductor's id.
    pub conductor_id: String,
}

/// Response after a staff replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUpdateResponse {
    /// A success message.
    pub message: String,
    /// The bus that was updated.
    pub bus_no: u32,
}

/// Bulk upload payload for the JSON import endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadRequest {
    /// Loosely keyed rows, one object per spreadsheet row.
    pub data: Vec<Map<String, Value>>,
}

/// Response after replacing the bus roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportBusesResponse {
    /// A success message.
    pub message: String,
    /// How many buses the new roster holds.
    pub count: usize,
}

/// Response after a student import batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStudentsResponse {
    /// A success message.
    pub message: String,
    /// How many students the batch added.
    pub added: usize,
}

/// Off-day filter as supplied by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffDayRequest {
    /// Courses that are off for the day.
    #[serde(default)]
    pub courses: Vec<String>,
    /// Years of study that are off for the day.
    #[serde(default)]
    pub years: Vec<u32>,
}

/// Request to consolidate routes for an off day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidateRequest {
    /// Routes to consolidate.
    pub routes: Vec<String>,
    /// Who is off for the day.
    #[serde(default)]
    pub off: OffDayRequest,
    /// The day the plan covers, `YYYY-MM-DD`. Defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// When `true`, commit the moves; otherwise only plan.
    #[serde(default)]
    pub apply: bool,
}

/// Response carrying one consolidation plan per requested route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidateResponse {
    /// The day the plan covers, `YYYY-MM-DD`.
    pub date: String,
    /// Per-route plans, in request order.
    pub plans: Vec<RoutePlan>,
}

/// One bus's occupancy line in the fleet summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusSummaryInfo {
    /// The bus.
    pub bus_no: u32,
    /// Its seat capacity.
    pub capacity: u32,
    /// Permanent students plus live tickets on the bus.
    pub occupied: usize,
    /// How many of those were marked present today.
    pub present_today: usize,
    /// The route the bus serves.
    pub route: String,
}

/// Response for a role lookup by user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    /// The role implied by the id prefix.
    pub role: String,
}
