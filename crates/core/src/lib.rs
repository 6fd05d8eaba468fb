// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod allocator;
mod consolidation;
mod error;
mod import;
mod state;
mod tickets;

#[cfg(test)]
mod tests;

pub use allocator::allocate_seat;
pub use consolidation::{
    ConsolidationOutcome, MovedStudent, OverflowStudent, RoutePlan, plan_consolidation,
};
pub use error::CoreError;
pub use import::{BusRow, StudentImport, StudentRow, reconcile_buses, reconcile_students};
pub use state::RosterState;
pub use tickets::{
    TicketPurge, issue_ticket, purge_tickets, remove_ticket, set_ticket_presence,
};
