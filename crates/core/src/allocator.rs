// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use bsms_domain::{Bus, DomainError, Student, Ticket, next_free_seat, taken_seats};
use std::collections::HashSet;

/// Computes the lowest-numbered free seat on a bus.
///
/// The taken set is the union of permanent students' seats and the given
/// tickets' seats on this bus; callers pass today's tickets so stale
/// dates never block a seat. Pure and deterministic: the same occupancy
/// state always yields the same seat.
///
/// # Errors
///
/// Returns `DomainError::BusFull` when every seat in `1..=capacity` is
/// taken, including for a capacity of zero.
pub fn allocate_seat(
    bus: &Bus,
    students: &[Student],
    tickets: &[Ticket],
) -> Result<u32, CoreError> {
    let taken: HashSet<u32> = taken_seats(bus.bus_no, students, tickets);
    next_free_seat(bus.capacity, &taken).ok_or_else(|| {
        CoreError::DomainViolation(DomainError::BusFull {
            bus_no: bus.bus_no,
            capacity: bus.capacity,
        })
    })
}
