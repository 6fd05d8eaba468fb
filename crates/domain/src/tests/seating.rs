// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Student, Ticket, next_free_seat, taken_seats};
use std::collections::HashSet;
use time::macros::date;

fn student(id: &str, bus_no: Option<u32>, seat: Option<u32>) -> Student {
    Student {
        student_id: String::from(id),
        name: format!("Student {id}"),
        course: None,
        year: None,
        bus_no,
        seat,
        present: false,
        fee_paid: true,
    }
}

fn ticket(id: &str, bus_no: u32, seat: u32) -> Ticket {
    Ticket {
        student_id: String::from(id),
        name: format!("Passenger {id}"),
        bus_no,
        seat,
        date: date!(2026 - 08 - 25),
        present: false,
    }
}

#[test]
fn test_allocates_lowest_free_seat() {
    let taken: HashSet<u32> = [1, 2, 4].into_iter().collect();
    assert_eq!(next_free_seat(36, &taken), Some(3));
}

#[test]
fn test_empty_bus_allocates_seat_one() {
    let taken: HashSet<u32> = HashSet::new();
    assert_eq!(next_free_seat(36, &taken), Some(1));
}

#[test]
fn test_full_bus_returns_none() {
    let taken: HashSet<u32> = (1..=4).collect();
    assert_eq!(next_free_seat(4, &taken), None);
}

#[test]
fn test_capacity_zero_is_always_full() {
    let taken: HashSet<u32> = HashSet::new();
    assert_eq!(next_free_seat(0, &taken), None);
}

#[test]
fn test_allocation_is_deterministic() {
    let taken: HashSet<u32> = [2, 5].into_iter().collect();
    let first: Option<u32> = next_free_seat(10, &taken);
    let second: Option<u32> = next_free_seat(10, &taken);
    assert_eq!(first, second);
    assert_eq!(first, Some(1));
}

#[test]
fn test_allocated_seat_lies_within_capacity() {
    for occupied in 0..8u32 {
        let taken: HashSet<u32> = (1..=occupied).collect();
        let seat: u32 = next_free_seat(8, &taken).unwrap();
        assert!((1..=8).contains(&seat));
        assert!(!taken.contains(&seat));
    }
}

#[test]
fn test_out_of_range_seat_counts_as_taken_but_is_never_returned() {
    // Stale seat 40 on a bus whose capacity was reduced to 2.
    let students: Vec<Student> = vec![student("S1", Some(1), Some(40))];
    let taken: HashSet<u32> = taken_seats(1, &students, &[]);
    assert!(taken.contains(&40));
    assert_eq!(next_free_seat(2, &taken), Some(1));
}

#[test]
fn test_taken_seats_merges_students_and_tickets() {
    let students: Vec<Student> = vec![
        student("S1", Some(1), Some(1)),
        student("S2", Some(1), None),
        student("S3", Some(2), Some(2)),
    ];
    let tickets: Vec<Ticket> = vec![ticket("T1", 1, 3), ticket("T2", 2, 1)];

    let taken: HashSet<u32> = taken_seats(1, &students, &tickets);
    assert_eq!(taken, [1, 3].into_iter().collect());
}

#[test]
fn test_unassigned_seats_are_excluded_from_taken_set() {
    let students: Vec<Student> = vec![student("S1", Some(1), None), student("S2", None, None)];
    assert!(taken_seats(1, &students, &[]).is_empty());
}
