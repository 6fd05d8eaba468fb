// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::allocator::allocate_seat;
use crate::error::CoreError;
use bsms_domain::{Bus, DomainError, Student, Ticket, validate_name};
use time::Date;

/// The result of purging stale tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketPurge {
    /// Tickets valid today, in stored order.
    pub tickets: Vec<Ticket>,
    /// How many stale tickets were dropped.
    pub purged: usize,
}

/// Drops every ticket not dated `today`.
///
/// This is a write-through purge: whenever `purged > 0` the caller must
/// persist the filtered set, so subsequent reads are cheaper and storage
/// does not grow without bound. Idempotent for a fixed date.
#[must_use]
pub fn purge_tickets(tickets: Vec<Ticket>, today: Date) -> TicketPurge {
    let before: usize = tickets.len();
    let tickets: Vec<Ticket> = tickets
        .into_iter()
        .filter(|ticket| ticket.date == today)
        .collect();
    TicketPurge {
        purged: before - tickets.len(),
        tickets,
    }
}

/// Issues a one-day ticket on a bus.
///
/// The seat comes from the allocator over the permanent students and
/// today's tickets. When no id is supplied, one is synthesized from the
/// bus number, the date, and the issue timestamp so ids stay unique
/// within the day.
///
/// # Errors
///
/// * `DomainError::InvalidName` when the passenger name is empty.
/// * `DomainError::BusFull` when no seat is available; nothing is
///   allocated in that case.
pub fn issue_ticket(
    bus: &Bus,
    students: &[Student],
    tickets: &[Ticket],
    name: &str,
    supplied_id: Option<&str>,
    today: Date,
    issued_at_ms: i128,
) -> Result<Ticket, CoreError> {
    validate_name(name)?;
    let seat: u32 = allocate_seat(bus, students, tickets)?;
    let student_id: String = supplied_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(
            || format!("TEMP-{}-{}-{}", bus.bus_no, today, issued_at_ms),
            String::from,
        );
    Ok(Ticket {
        student_id,
        name: name.trim().to_string(),
        bus_no: bus.bus_no,
        seat,
        date: today,
        present: false,
    })
}

/// Removes the day's ticket matching `student_id`.
///
/// Returns the remaining tickets and the removed one.
///
/// # Errors
///
/// A miss is `DomainError::TicketNotFound`, not a silent no-op.
pub fn remove_ticket(
    mut tickets: Vec<Ticket>,
    student_id: &str,
) -> Result<(Vec<Ticket>, Ticket), CoreError> {
    let position: usize = tickets
        .iter()
        .position(|ticket| ticket.student_id == student_id)
        .ok_or_else(|| {
            CoreError::DomainViolation(DomainError::TicketNotFound(student_id.to_string()))
        })?;
    let removed: Ticket = tickets.remove(position);
    Ok((tickets, removed))
}

/// Sets the presence flag on the day's ticket matching `student_id`.
///
/// Callers pass the already-purged set, so stale tickets can never be
/// marked.
///
/// # Errors
///
/// Returns `DomainError::TicketNotFound` when no ticket matches.
pub fn set_ticket_presence(
    mut tickets: Vec<Ticket>,
    student_id: &str,
    present: bool,
) -> Result<Vec<Ticket>, CoreError> {
    let ticket: &mut Ticket = tickets
        .iter_mut()
        .find(|ticket| ticket.student_id == student_id)
        .ok_or_else(|| {
            CoreError::DomainViolation(DomainError::TicketNotFound(student_id.to_string()))
        })?;
    ticket.present = present;
    Ok(tickets)
}
