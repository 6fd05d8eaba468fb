// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Student, Ticket};
use std::collections::HashSet;

/// Collects the seat numbers already taken on a bus.
///
/// Both permanent students and day tickets count. Seats recorded outside
/// the capacity range (stale data after a capacity reduction) are still
/// treated as taken; they are simply never handed out again by
/// [`next_free_seat`].
#[must_use]
pub fn taken_seats(bus_no: u32, students: &[Student], tickets: &[Ticket]) -> HashSet<u32> {
    students
        .iter()
        .filter(|student| student.bus_no == Some(bus_no))
        .filter_map(|student| student.seat)
        .chain(
            tickets
                .iter()
                .filter(|ticket| ticket.bus_no == bus_no)
                .map(|ticket| ticket.seat),
        )
        .collect()
}

/// Returns the lowest-numbered free seat, or `None` when the bus is full.
///
/// Scans `1..=capacity` in ascending order, so the result is fully
/// determined by the occupancy state: identical inputs always yield the
/// same seat. A capacity of zero is always full.
#[must_use]
pub fn next_free_seat(capacity: u32, taken: &HashSet<u32>) -> Option<u32> {
    (1..=capacity).find(|seat| !taken.contains(seat))
}
