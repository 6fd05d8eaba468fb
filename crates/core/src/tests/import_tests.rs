// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{make_bus, make_student};
use crate::{BusRow, StudentImport, StudentRow, reconcile_buses, reconcile_students};
use bsms_domain::{Bus, DEFAULT_CAPACITY, Student};

fn row(student_id: &str, route: &str) -> StudentRow {
    StudentRow {
        student_id: String::from(student_id),
        name: format!("Student {student_id}"),
        course: Some(String::from("BSc")),
        year: Some(2),
        route: String::from(route),
        fee_paid: String::from("yes"),
    }
}

#[test]
fn test_accepted_rows_keep_input_order_and_contiguous_seats() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36)];
    let existing: Vec<Student> = vec![make_student("S0", 1, 5)];
    let rows: Vec<StudentRow> = vec![row("S1", "north"), row("S2", "North "), row("S3", "NORTH")];

    let outcome: StudentImport = reconcile_students(&rows, &existing, &buses);
    assert_eq!(outcome.rejected, 0);
    let ids: Vec<&str> = outcome
        .accepted
        .iter()
        .map(|student| student.student_id.as_str())
        .collect();
    assert_eq!(ids, ["S1", "S2", "S3"]);
    let seats: Vec<Option<u32>> = outcome.accepted.iter().map(|student| student.seat).collect();
    assert_eq!(seats, [Some(6), Some(7), Some(8)]);
}

#[test]
fn test_unpaid_fee_row_is_silently_skipped() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36)];
    let mut unpaid: StudentRow = row("S1", "north");
    unpaid.fee_paid = String::from("no");

    let outcome: StudentImport = reconcile_students(&[unpaid, row("S2", "north")], &[], &buses);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].student_id, "S2");
    assert_eq!(outcome.rejected, 1);
}

#[test]
fn test_missing_required_fields_reject_the_row() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36)];
    let mut no_name: StudentRow = row("S1", "north");
    no_name.name = String::from("  ");
    let mut no_route: StudentRow = row("S2", "north");
    no_route.route = String::new();
    let mut no_id: StudentRow = row("", "north");
    no_id.student_id = String::new();

    let outcome: StudentImport = reconcile_students(&[no_name, no_route, no_id], &[], &buses);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejected, 3);
}

#[test]
fn test_duplicate_suppression_is_cumulative_across_the_batch() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36)];
    let rows: Vec<StudentRow> = vec![row("S1", "north"), row("S1", "north")];

    let outcome: StudentImport = reconcile_students(&rows, &[], &buses);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.rejected, 1);
}

#[test]
fn test_reimporting_the_same_batch_accepts_nothing() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36)];
    let rows: Vec<StudentRow> = vec![row("S1", "north"), row("S2", "north")];

    let first: StudentImport = reconcile_students(&rows, &[], &buses);
    let mut roster: Vec<Student> = first.accepted;
    let second: StudentImport = reconcile_students(&rows, &roster, &buses);
    assert!(second.accepted.is_empty());
    assert_eq!(second.rejected, rows.len());
    roster.extend(second.accepted);
    assert_eq!(roster.len(), 2);
}

#[test]
fn test_unknown_route_rejects_the_row() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36)];
    let outcome: StudentImport = reconcile_students(&[row("S1", "west")], &[], &buses);
    assert!(outcome.accepted.is_empty());
    assert_eq!(outcome.rejected, 1);
}

#[test]
fn test_import_never_exceeds_capacity() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 2)];
    let existing: Vec<Student> = vec![make_student("S0", 1, 1)];
    let rows: Vec<StudentRow> = vec![row("S1", "north"), row("S2", "north"), row("S3", "north")];

    let outcome: StudentImport = reconcile_students(&rows, &existing, &buses);
    assert_eq!(outcome.accepted.len(), 1);
    assert_eq!(outcome.accepted[0].seat, Some(2));
    assert_eq!(outcome.rejected, 2);
}

#[test]
fn test_first_bus_wins_when_routes_collide() {
    let buses: Vec<Bus> = vec![make_bus(1, "north", 36), make_bus(2, "north", 50)];
    let outcome: StudentImport = reconcile_students(&[row("S1", "north")], &[], &buses);
    assert_eq!(outcome.accepted[0].bus_no, Some(1));
}

#[test]
fn test_bus_rows_replace_the_roster_and_filter_invalid_rows() {
    let rows: Vec<BusRow> = vec![
        BusRow {
            bus_no: Some(1),
            route: String::from("north"),
            capacity: Some(40),
            ..BusRow::default()
        },
        BusRow {
            bus_no: None,
            route: String::from("south"),
            ..BusRow::default()
        },
        BusRow {
            bus_no: Some(3),
            route: String::from("  "),
            ..BusRow::default()
        },
        BusRow {
            bus_no: Some(0),
            route: String::from("east"),
            ..BusRow::default()
        },
    ];

    let buses: Vec<Bus> = reconcile_buses(&rows);
    assert_eq!(buses.len(), 1);
    assert_eq!(buses[0].bus_no, 1);
    assert_eq!(buses[0].capacity, 40);
}

#[test]
fn test_zero_or_missing_capacity_falls_back_to_default() {
    let rows: Vec<BusRow> = vec![
        BusRow {
            bus_no: Some(1),
            route: String::from("north"),
            capacity: Some(0),
            ..BusRow::default()
        },
        BusRow {
            bus_no: Some(2),
            route: String::from("south"),
            capacity: None,
            ..BusRow::default()
        },
    ];

    let buses: Vec<Bus> = reconcile_buses(&rows);
    assert_eq!(buses[0].capacity, DEFAULT_CAPACITY);
    assert_eq!(buses[1].capacity, DEFAULT_CAPACITY);
}
