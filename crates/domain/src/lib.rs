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

mod error;
mod role;
mod seating;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use role::{Role, classify_role};
pub use seating::{next_free_seat, taken_seats};
pub use types::{Bus, DEFAULT_CAPACITY, OffDayFilter, Student, Ticket, normalize_route};
pub use validation::{
    parse_fee_paid, validate_bus_no, validate_name, validate_route, validate_student_id,
};
