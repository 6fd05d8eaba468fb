// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers load collections from the [`RosterStore`], run the core
//! transitions, and persist the results. Every passenger-facing read
//! goes through the day-ticket purge first, so callers never observe a
//! ticket from a previous day; the purge writes through when it drops
//! anything.

use bsms::{
    BusRow, ConsolidationOutcome, StudentImport, StudentRow, allocate_seat,
    issue_ticket as build_ticket, plan_consolidation, purge_tickets, reconcile_buses,
    reconcile_students, remove_ticket as drop_ticket, set_ticket_presence,
};
use bsms_domain::{
    Bus, DomainError, OffDayFilter, Student, Ticket, classify_role, normalize_route,
};
use bsms_persistence::RosterStore;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddStudentRequest, AddStudentResponse, AssignStudentRequest, AssignStudentResponse,
    AttendanceRequest, AttendanceResponse, BusAssignmentResponse, BusSummaryInfo,
    ConsolidateRequest, ConsolidateResponse, ImportBusesResponse, ImportStudentsResponse,
    IssueTicketRequest, IssueTicketResponse, PassengerInfo, RemoveTicketResponse,
    ReplaceConductorRequest, ReplaceDriverRequest, RoleResponse, StaffUpdateResponse,
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Loads today's tickets, dropping stale ones with a write-through.
fn todays_tickets(store: &mut dyn RosterStore, today: Date) -> Result<Vec<Ticket>, ApiError> {
    let purge = purge_tickets(store.load_tickets()?, today);
    if purge.purged > 0 {
        store.save_tickets(&purge.tickets)?;
        tracing::info!(purged = purge.purged, "stale day tickets dropped");
    }
    Ok(purge.tickets)
}

fn bus_for_conductor_id<'a>(buses: &'a [Bus], conductor_id: &str) -> Option<&'a Bus> {
    buses.iter().find(|bus| {
        bus.conductor_id
            .as_deref()
            .is_some_and(|cid| cid.trim() == conductor_id)
    })
}

fn required_field(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from(field),
            message: String::from("must not be empty"),
        });
    }
    Ok(trimmed.to_string())
}

/// Lists the bus roster.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded.
pub fn list_buses(store: &mut dyn RosterStore) -> Result<Vec<Bus>, ApiError> {
    Ok(store.load_buses()?)
}

/// Looks up a single bus by number.
///
/// # Errors
///
/// Returns an error if the bus is unknown.
pub fn get_bus(store: &mut dyn RosterStore, bus_no: u32) -> Result<Bus, ApiError> {
    let buses: Vec<Bus> = store.load_buses()?;
    buses
        .into_iter()
        .find(|bus| bus.bus_no == bus_no)
        .ok_or_else(|| translate_domain_error(DomainError::BusNotFound(bus_no)))
}

/// Lists the merged passenger view, optionally scoped to one bus.
///
/// Permanent students come first, then today's ticket holders flagged
/// with `is_temp`.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded.
pub fn list_passengers(
    store: &mut dyn RosterStore,
    bus_no: Option<u32>,
    today: Date,
) -> Result<Vec<PassengerInfo>, ApiError> {
    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let students: Vec<Student> = store.load_students()?;

    let merged: Vec<PassengerInfo> = students
        .into_iter()
        .map(passenger_from_student)
        .chain(tickets.into_iter().map(passenger_from_ticket))
        .filter(|passenger| bus_no.is_none() || passenger.bus_no == bus_no)
        .collect();
    Ok(merged)
}

fn passenger_from_student(student: Student) -> PassengerInfo {
    PassengerInfo {
        student_id: student.student_id,
        name: student.name,
        course: student.course,
        year: student.year,
        bus_no: student.bus_no,
        seat: student.seat,
        present: student.present,
        fee_paid: student.fee_paid,
        is_temp: false,
    }
}

fn passenger_from_ticket(ticket: Ticket) -> PassengerInfo {
    PassengerInfo {
        student_id: ticket.student_id,
        name: ticket.name,
        course: None,
        year: None,
        bus_no: Some(ticket.bus_no),
        seat: Some(ticket.seat),
        present: ticket.present,
        fee_paid: false,
        is_temp: true,
    }
}

/// Finds one passenger by id, permanent students first.
///
/// # Errors
///
/// Returns an error if no student or live ticket matches the id.
pub fn find_passenger(
    store: &mut dyn RosterStore,
    student_id: &str,
    today: Date,
) -> Result<PassengerInfo, ApiError> {
    let id: String = required_field(student_id, "student_id")?;
    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let students: Vec<Student> = store.load_students()?;

    if let Some(student) = students.into_iter().find(|s| s.student_id == id) {
        return Ok(passenger_from_student(student));
    }
    tickets
        .into_iter()
        .find(|ticket| ticket.student_id == id)
        .map(passenger_from_ticket)
        .ok_or_else(|| translate_domain_error(DomainError::StudentNotFound(id)))
}

/// Resolves which bus a conductor is assigned to.
///
/// # Errors
///
/// Returns an error if the conductor id is blank or no bus carries it.
pub fn bus_for_conductor(
    store: &mut dyn RosterStore,
    conductor_id: &str,
) -> Result<BusAssignmentResponse, ApiError> {
    let cid: String = required_field(conductor_id, "conductor_id")?;
    let buses: Vec<Bus> = store.load_buses()?;
    bus_for_conductor_id(&buses, &cid)
        .map(|bus| BusAssignmentResponse { bus_no: bus.bus_no })
        .ok_or_else(|| translate_domain_error(DomainError::ConductorNotAssigned(cid)))
}

/// Marks a passenger present or absent, permanent students first.
///
/// # Errors
///
/// Returns an error if the id is blank or matches nobody.
pub fn mark_attendance(
    store: &mut dyn RosterStore,
    request: &AttendanceRequest,
    today: Date,
) -> Result<AttendanceResponse, ApiError> {
    let id: String = required_field(&request.student_id, "student_id")?;
    let mut students: Vec<Student> = store.load_students()?;

    if let Some(student) = students.iter_mut().find(|s| s.student_id == id) {
        student.present = request.present;
        store.save_students(&students)?;
        return Ok(AttendanceResponse {
            message: String::from("Attendance updated"),
            present: request.present,
        });
    }

    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let updated: Vec<Ticket> =
        set_ticket_presence(tickets, &id, request.present).map_err(translate_core_error)?;
    store.save_tickets(&updated)?;
    Ok(AttendanceResponse {
        message: String::from("Attendance updated (ticket)"),
        present: request.present,
    })
}

/// Issues a day ticket on the conductor's own bus.
///
/// `now_ms` feeds the synthesized ticket id when the caller does not
/// supply one.
///
/// # Errors
///
/// Returns an error if the conductor is unassigned, the bus is full, or
/// the passenger name is blank.
pub fn issue_ticket(
    store: &mut dyn RosterStore,
    request: &IssueTicketRequest,
    today: Date,
    now_ms: i128,
) -> Result<IssueTicketResponse, ApiError> {
    let cid: String = required_field(&request.conductor_id, "conductor_id")?;
    let mut tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let buses: Vec<Bus> = store.load_buses()?;
    let students: Vec<Student> = store.load_students()?;

    let bus: &Bus = bus_for_conductor_id(&buses, &cid)
        .ok_or_else(|| translate_domain_error(DomainError::ConductorNotAssigned(cid)))?;

    let ticket: Ticket = build_ticket(
        bus,
        &students,
        &tickets,
        &request.name,
        request.student_id.as_deref(),
        today,
        now_ms,
    )
    .map_err(translate_core_error)?;

    tickets.push(ticket.clone());
    store.save_tickets(&tickets)?;
    tracing::info!(bus_no = bus.bus_no, seat = ticket.seat, "day ticket issued");
    Ok(IssueTicketResponse {
        message: String::from("Ticket added"),
        ticket,
    })
}

/// Removes one of today's tickets.
///
/// When `conductor_id` is given, the ticket must belong to that
/// conductor's bus.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or lies outside the
/// conductor's bus.
pub fn remove_ticket(
    store: &mut dyn RosterStore,
    conductor_id: Option<&str>,
    ticket_id: &str,
    today: Date,
) -> Result<RemoveTicketResponse, ApiError> {
    let id: String = required_field(ticket_id, "ticket_id")?;
    let tickets: Vec<Ticket> = todays_tickets(store, today)?;

    let scope_bus: Option<u32> = match conductor_id {
        Some(cid) => {
            let cid: String = required_field(cid, "conductor_id")?;
            let buses: Vec<Bus> = store.load_buses()?;
            let bus: &Bus = bus_for_conductor_id(&buses, &cid)
                .ok_or_else(|| translate_domain_error(DomainError::ConductorNotAssigned(cid)))?;
            Some(bus.bus_no)
        }
        None => None,
    };

    let (remaining, removed) = drop_ticket(tickets, &id).map_err(translate_core_error)?;
    if let Some(bus_no) = scope_bus
        && removed.bus_no != bus_no
    {
        return Err(translate_domain_error(DomainError::OutsideAssignedBus {
            conductor_id: conductor_id.unwrap_or_default().trim().to_string(),
            bus_no: removed.bus_no,
        }));
    }

    store.save_tickets(&remaining)?;
    Ok(RemoveTicketResponse {
        message: String::from("Ticket removed"),
    })
}

/// Lists today's tickets, optionally scoped to one bus.
///
/// # Errors
///
/// Returns an error if the tickets cannot be loaded.
pub fn list_tickets(
    store: &mut dyn RosterStore,
    bus_no: Option<u32>,
    today: Date,
) -> Result<Vec<Ticket>, ApiError> {
    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    Ok(tickets
        .into_iter()
        .filter(|ticket| bus_no.is_none() || bus_no == Some(ticket.bus_no))
        .collect())
}

/// Adds a permanent student from the conductor's device.
///
/// The student lands on the conductor's own bus with the next free
/// seat, unpaid until the office confirms the fee.
///
/// # Errors
///
/// Returns an error if the conductor is unassigned, the id already
/// exists, or the bus is full.
pub fn add_walk_on_student(
    store: &mut dyn RosterStore,
    request: &AddStudentRequest,
    today: Date,
) -> Result<AddStudentResponse, ApiError> {
    let cid: String = required_field(&request.conductor_id, "conductor_id")?;
    let id: String = required_field(&request.student_id, "student_id")?;
    let name: String = required_field(&request.name, "name")?;

    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let buses: Vec<Bus> = store.load_buses()?;
    let mut students: Vec<Student> = store.load_students()?;

    let bus: &Bus = bus_for_conductor_id(&buses, &cid)
        .ok_or_else(|| translate_domain_error(DomainError::ConductorNotAssigned(cid)))?;

    if students.iter().any(|student| student.student_id == id) {
        return Err(translate_domain_error(DomainError::DuplicateStudent(id)));
    }

    let seat: u32 = allocate_seat(bus, &students, &tickets).map_err(translate_core_error)?;
    let student: Student = Student {
        student_id: id,
        name,
        course: None,
        year: None,
        bus_no: Some(bus.bus_no),
        seat: Some(seat),
        present: false,
        fee_paid: false,
    };
    students.push(student.clone());
    store.save_students(&students)?;
    Ok(AddStudentResponse {
        message: String::from("Student added"),
        student,
    })
}

/// Replaces the bus roster with a reconciled upload batch.
///
/// # Errors
///
/// Returns an error if the new roster cannot be saved.
pub fn import_buses(
    store: &mut dyn RosterStore,
    rows: &[BusRow],
) -> Result<ImportBusesResponse, ApiError> {
    let buses: Vec<Bus> = reconcile_buses(rows);
    store.save_buses(&buses)?;
    tracing::info!(count = buses.len(), "bus roster replaced");
    Ok(ImportBusesResponse {
        message: String::from("Buses uploaded successfully!"),
        count: buses.len(),
    })
}

/// Appends a reconciled student batch to the roster.
///
/// Bad rows are skipped, never fatal to the batch.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded or saved.
pub fn import_students(
    store: &mut dyn RosterStore,
    rows: &[StudentRow],
) -> Result<ImportStudentsResponse, ApiError> {
    let buses: Vec<Bus> = store.load_buses()?;
    let mut students: Vec<Student> = store.load_students()?;

    let outcome: StudentImport = reconcile_students(rows, &students, &buses);
    let added: usize = outcome.accepted.len();
    students.extend(outcome.accepted);
    store.save_students(&students)?;
    tracing::info!(added, rejected = outcome.rejected, "student batch imported");
    Ok(ImportStudentsResponse {
        message: String::from("Students uploaded!"),
        added,
    })
}

/// Replaces a bus's driver, and contact when supplied.
///
/// # Errors
///
/// Returns an error if the driver name is blank or the bus is unknown.
pub fn replace_driver(
    store: &mut dyn RosterStore,
    request: &ReplaceDriverRequest,
) -> Result<StaffUpdateResponse, ApiError> {
    let driver: String = required_field(&request.driver_name, "driver_name")?;
    let mut buses: Vec<Bus> = store.load_buses()?;

    let bus: &mut Bus = buses
        .iter_mut()
        .find(|bus| bus.bus_no == request.bus_no)
        .ok_or_else(|| translate_domain_error(DomainError::BusNotFound(request.bus_no)))?;
    bus.driver = Some(driver);
    if let Some(contact) = &request.driver_contact {
        bus.driver_contact = Some(contact.trim().to_string());
    }
    store.save_buses(&buses)?;
    Ok(StaffUpdateResponse {
        message: String::from("Driver updated"),
        bus_no: request.bus_no,
    })
}

/// Replaces a bus's conductor.
///
/// # Errors
///
/// Returns an error if the conductor id is blank or the bus is unknown.
pub fn replace_conductor(
    store: &mut dyn RosterStore,
    request: &ReplaceConductorRequest,
) -> Result<StaffUpdateResponse, ApiError> {
    let cid: String = required_field(&request.conductor_id, "conductor_id")?;
    let mut buses: Vec<Bus> = store.load_buses()?;

    let bus: &mut Bus = buses
        .iter_mut()
        .find(|bus| bus.bus_no == request.bus_no)
        .ok_or_else(|| translate_domain_error(DomainError::BusNotFound(request.bus_no)))?;
    bus.conductor_id = Some(cid);
    store.save_buses(&buses)?;
    Ok(StaffUpdateResponse {
        message: String::from("Conductor updated"),
        bus_no: request.bus_no,
    })
}

/// Moves a permanent student onto a specific bus.
///
/// The student receives the next free seat on the destination bus.
///
/// # Errors
///
/// Returns an error if the student or bus is unknown, or the bus is
/// full.
pub fn assign_student(
    store: &mut dyn RosterStore,
    request: &AssignStudentRequest,
    today: Date,
) -> Result<AssignStudentResponse, ApiError> {
    let id: String = required_field(&request.student_id, "student_id")?;
    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let buses: Vec<Bus> = store.load_buses()?;
    let mut students: Vec<Student> = store.load_students()?;

    let bus: &Bus = buses
        .iter()
        .find(|bus| bus.bus_no == request.bus_no)
        .ok_or_else(|| translate_domain_error(DomainError::BusNotFound(request.bus_no)))?;

    if !students.iter().any(|student| student.student_id == id) {
        return Err(translate_domain_error(DomainError::StudentNotFound(id)));
    }

    let seat: u32 = allocate_seat(bus, &students, &tickets).map_err(translate_core_error)?;
    for student in &mut students {
        if student.student_id == id {
            student.bus_no = Some(bus.bus_no);
            student.seat = Some(seat);
        }
    }
    store.save_students(&students)?;
    Ok(AssignStudentResponse {
        message: String::from("Assigned"),
        seat,
    })
}

/// Plans (and optionally applies) an off-day route consolidation.
///
/// # Errors
///
/// Returns an error if no routes are given, the date is malformed, or
/// the roster cannot be loaded or saved.
pub fn consolidate_offday(
    store: &mut dyn RosterStore,
    request: &ConsolidateRequest,
    today: Date,
) -> Result<ConsolidateResponse, ApiError> {
    let routes: Vec<String> = request
        .routes
        .iter()
        .map(|route| normalize_route(route))
        .filter(|route| !route.is_empty())
        .collect();
    if routes.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("routes"),
            message: String::from("provide at least one route"),
        });
    }

    let date: Date = match &request.date {
        Some(raw) => {
            Date::parse(raw.trim(), DATE_FORMAT).map_err(|err| {
                translate_domain_error(DomainError::InvalidDate {
                    date_string: raw.trim().to_string(),
                    error: err.to_string(),
                })
            })?
        }
        None => today,
    };

    let off: OffDayFilter = OffDayFilter {
        courses: request
            .off
            .courses
            .iter()
            .map(|course| course.trim().to_string())
            .filter(|course| !course.is_empty())
            .collect(),
        years: request.off.years.clone(),
    };

    let buses: Vec<Bus> = store.load_buses()?;
    let students: Vec<Student> = store.load_students()?;

    let outcome: ConsolidationOutcome =
        plan_consolidation(&buses, &students, &routes, &off, request.apply);
    if let Some(updated) = outcome.students {
        store.save_students(&updated)?;
        tracing::info!(
            routes = routes.len(),
            moved = outcome
                .plans
                .iter()
                .map(|plan| plan.moved.len())
                .sum::<usize>(),
            "off-day consolidation applied"
        );
    }

    Ok(ConsolidateResponse {
        date: date.to_string(),
        plans: outcome.plans,
    })
}

/// Builds the per-bus occupancy summary for the incharge dashboard.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded.
pub fn fleet_summary(
    store: &mut dyn RosterStore,
    today: Date,
) -> Result<Vec<BusSummaryInfo>, ApiError> {
    let tickets: Vec<Ticket> = todays_tickets(store, today)?;
    let buses: Vec<Bus> = store.load_buses()?;
    let students: Vec<Student> = store.load_students()?;

    let summary: Vec<BusSummaryInfo> = buses
        .iter()
        .map(|bus| {
            let perm: usize = students
                .iter()
                .filter(|student| student.bus_no == Some(bus.bus_no))
                .count();
            let temp: usize = tickets
                .iter()
                .filter(|ticket| ticket.bus_no == bus.bus_no)
                .count();
            let present: usize = students
                .iter()
                .filter(|student| student.bus_no == Some(bus.bus_no) && student.present)
                .count()
                + tickets
                    .iter()
                    .filter(|ticket| ticket.bus_no == bus.bus_no && ticket.present)
                    .count();
            BusSummaryInfo {
                bus_no: bus.bus_no,
                capacity: bus.capacity,
                occupied: perm + temp,
                present_today: present,
                route: bus.route.clone(),
            }
        })
        .collect();
    Ok(summary)
}

/// Resolves the role implied by a user id prefix.
///
/// # Errors
///
/// Returns an error if the id is blank or no role prefix matches.
pub fn identify_role(user_id: &str) -> Result<RoleResponse, ApiError> {
    let id: String = required_field(user_id, "user_id")?;
    classify_role(&id)
        .map(|role| RoleResponse {
            role: role.as_str().to_string(),
        })
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("user_id"),
            message: String::from("no role matches the id prefix"),
        })
}
