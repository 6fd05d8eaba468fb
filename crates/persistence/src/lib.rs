// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Bus Seat Management System.
//!
//! The roster lives in three JSON documents (buses, students, day
//! tickets), each an array of records. [`JsonFileStore`] keeps them as
//! files in a data directory and is the production backend;
//! [`MemoryStore`] holds the same collections in memory for tests.
//!
//! Every write replaces a whole collection. The documents are small
//! (a campus fleet, not a warehouse) and whole-file replacement keeps
//! each save atomic at the collection level, so there is no partial
//! update to reason about.

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
#![allow(clippy::multiple_crate_versions)]

mod error;
mod json_file;
mod memory;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use bsms::RosterState;
use bsms_domain::{Bus, Student, Ticket};

/// Storage backend for the roster collections.
///
/// Loads return owned copies; callers compute the next collection in
/// full and hand it back to a `save_*` method. Backends never interpret
/// the data beyond (de)serializing it.
pub trait RosterStore {
    /// Loads the bus roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or decoded.
    fn load_buses(&self) -> Result<Vec<Bus>, PersistenceError>;

    /// Loads the permanent student roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or decoded.
    fn load_students(&self) -> Result<Vec<Student>, PersistenceError>;

    /// Loads the day tickets, stale ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing data cannot be read or decoded.
    fn load_tickets(&self) -> Result<Vec<Ticket>, PersistenceError>;

    /// Replaces the bus roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written.
    fn save_buses(&mut self, buses: &[Bus]) -> Result<(), PersistenceError>;

    /// Replaces the permanent student roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written.
    fn save_students(&mut self, students: &[Student]) -> Result<(), PersistenceError>;

    /// Replaces the day ticket collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be encoded or written.
    fn save_tickets(&mut self, tickets: &[Ticket]) -> Result<(), PersistenceError>;

    /// Loads all three collections as one state value.
    ///
    /// # Errors
    ///
    /// Returns an error if any collection cannot be read or decoded.
    fn load_state(&self) -> Result<RosterState, PersistenceError> {
        Ok(RosterState {
            buses: self.load_buses()?,
            students: self.load_students()?,
            tickets: self.load_tickets()?,
        })
    }
}
