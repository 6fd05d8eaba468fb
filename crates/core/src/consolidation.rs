// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bsms_domain::{Bus, OffDayFilter, Student, next_free_seat, normalize_route};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A passenger reassigned onto the kept bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedStudent {
    /// The reassigned student.
    pub student_id: String,
    /// The kept bus they move to.
    pub to_bus_no: u32,
    /// Their seat on the kept bus.
    pub seat: u32,
}

/// A passenger the kept bus could not accommodate.
///
/// Overflow students keep their original assignment and must be handled
/// by a human, e.g. moved to a different route manually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowStudent {
    /// The student left behind.
    pub student_id: String,
}

/// The consolidation plan for a single route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// The normalized route key this plan covers.
    pub route: String,
    /// The bus kept running, `None` when no bus serves the route.
    pub keep_bus_no: Option<u32>,
    /// Buses suspended for the day.
    pub suspend_bus_nos: Vec<u32>,
    /// Passengers re-seated onto the kept bus.
    pub moved: Vec<MovedStudent>,
    /// Passengers the kept bus could not take.
    pub overflow: Vec<OverflowStudent>,
}

/// The result of a consolidation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationOutcome {
    /// One plan per selected route, in selection order.
    pub plans: Vec<RoutePlan>,
    /// The updated student collection; present only when the pass was
    /// applied. The caller persists it as one write.
    pub students: Option<Vec<Student>>,
}

/// Plans (and optionally applies) an off-day route consolidation.
///
/// Per route: the highest-capacity bus is kept (stable order breaks
/// ties, so equal capacities keep the first bus in stored order) and the
/// rest are suspended. Students on suspended buses are re-seated onto
/// the kept bus in stored order, skipping off-day students entirely;
/// whoever does not fit is recorded as overflow and left in place. The
/// kept bus's capacity is never exceeded.
///
/// With `apply = false` this is a pure plan: repeated calls over
/// unchanged input produce the same plans and no student changes. With
/// `apply = true` every move is committed to the returned student
/// collection, so a later route in the same pass sees earlier moves.
#[must_use]
pub fn plan_consolidation(
    buses: &[Bus],
    students: &[Student],
    selected_routes: &[String],
    off: &OffDayFilter,
    apply: bool,
) -> ConsolidationOutcome {
    let mut students: Vec<Student> = students.to_vec();
    let mut plans: Vec<RoutePlan> = Vec::with_capacity(selected_routes.len());

    for route_raw in selected_routes {
        let route: String = normalize_route(route_raw);

        let mut route_buses: Vec<&Bus> = buses
            .iter()
            .filter(|bus| bus.route_key() == route)
            .collect();
        if route_buses.is_empty() {
            plans.push(RoutePlan {
                route,
                keep_bus_no: None,
                suspend_bus_nos: Vec::new(),
                moved: Vec::new(),
                overflow: Vec::new(),
            });
            continue;
        }

        // Stable sort: ties keep the stored fleet order.
        route_buses.sort_by(|a, b| b.capacity.cmp(&a.capacity));
        let keep_bus_no: u32 = route_buses[0].bus_no;
        let keep_capacity: u32 = route_buses[0].capacity;
        let suspend_bus_nos: Vec<u32> = route_buses[1..].iter().map(|bus| bus.bus_no).collect();

        let mut taken: HashSet<u32> = students
            .iter()
            .filter(|student| student.bus_no == Some(keep_bus_no))
            .filter_map(|student| student.seat)
            .collect();

        let mut moved: Vec<MovedStudent> = Vec::new();
        let mut overflow: Vec<OverflowStudent> = Vec::new();

        for student in &mut students {
            let Some(bus_no) = student.bus_no else {
                continue;
            };
            if !suspend_bus_nos.contains(&bus_no) {
                continue;
            }
            if off.is_off_day(student) {
                continue;
            }

            if let Some(seat) = next_free_seat(keep_capacity, &taken) {
                taken.insert(seat);
                moved.push(MovedStudent {
                    student_id: student.student_id.clone(),
                    to_bus_no: keep_bus_no,
                    seat,
                });
                if apply {
                    student.bus_no = Some(keep_bus_no);
                    student.seat = Some(seat);
                }
            } else {
                overflow.push(OverflowStudent {
                    student_id: student.student_id.clone(),
                });
            }
        }

        plans.push(RoutePlan {
            route,
            keep_bus_no: Some(keep_bus_no),
            suspend_bus_nos,
            moved,
            overflow,
        });
    }

    ConsolidationOutcome {
        plans,
        students: apply.then_some(students),
    }
}
