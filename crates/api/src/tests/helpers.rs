// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bsms::RosterState;
use bsms_domain::{Bus, Student, Ticket};
use bsms_persistence::MemoryStore;
use time::Date;
use time::macros::date;

pub const TODAY: Date = date!(2026 - 08 - 25);
pub const YESTERDAY: Date = date!(2026 - 08 - 24);
pub const NOW_MS: i128 = 1_756_000_000_000;

pub fn make_bus(bus_no: u32, route: &str, capacity: u32) -> Bus {
    Bus {
        bus_no,
        vehicle_no: None,
        driver: Some(String::from("Driver")),
        driver_contact: None,
        helper: None,
        helper_contact: None,
        route: String::from(route),
        time: None,
        capacity,
        conductor_id: Some(format!("C{bus_no:03}")),
    }
}

pub fn make_student(student_id: &str, bus_no: u32, seat: u32) -> Student {
    Student {
        student_id: String::from(student_id),
        name: format!("Student {student_id}"),
        course: None,
        year: None,
        bus_no: Some(bus_no),
        seat: Some(seat),
        present: false,
        fee_paid: true,
    }
}

pub fn make_ticket(student_id: &str, bus_no: u32, seat: u32, date: Date) -> Ticket {
    Ticket {
        student_id: String::from(student_id),
        name: format!("Passenger {student_id}"),
        bus_no,
        seat,
        date,
        present: false,
    }
}

/// A store with one bus, one student, and one live ticket.
pub fn seeded_store() -> MemoryStore {
    MemoryStore::with_state(RosterState {
        buses: vec![make_bus(1, "north", 4)],
        students: vec![make_student("S1", 1, 1)],
        tickets: vec![make_ticket("T1", 1, 2, TODAY)],
    })
}
