// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Bus Seat Management System.
//!
//! Handlers here are transport-agnostic: they take a
//! [`bsms_persistence::RosterStore`] plus plain request values and
//! return response values or an [`ApiError`]. The HTTP server maps
//! those onto routes and status codes; tests drive them directly over
//! an in-memory store.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;
mod rows;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use handlers::{
    add_walk_on_student, assign_student, bus_for_conductor, consolidate_offday, find_passenger,
    fleet_summary, get_bus, identify_role, import_buses, import_students, issue_ticket, list_buses,
    list_passengers, list_tickets, mark_attendance, remove_ticket, replace_conductor,
    replace_driver,
};
pub use request_response::{
    AddStudentRequest, AddStudentResponse, AssignStudentRequest, AssignStudentResponse,
    AttendanceRequest, AttendanceResponse, BulkUploadRequest, BusAssignmentResponse,
    BusSummaryInfo, ConsolidateRequest, ConsolidateResponse, ImportBusesResponse,
    ImportStudentsResponse, IssueTicketRequest, IssueTicketResponse, OffDayRequest, PassengerInfo,
    RemoveTicketResponse, ReplaceConductorRequest, ReplaceDriverRequest, RoleResponse,
    StaffUpdateResponse,
};
pub use rows::{bus_rows_from_csv, bus_rows_from_json, student_rows_from_csv, student_rows_from_json};
