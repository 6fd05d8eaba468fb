// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, RosterStore};
use bsms::RosterState;
use bsms_domain::{Bus, Student, Ticket};

/// In-memory roster store.
///
/// Backs unit and integration tests; behaves exactly like
/// [`crate::JsonFileStore`] minus the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RosterState,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with `state`.
    #[must_use]
    pub const fn with_state(state: RosterState) -> Self {
        Self { state }
    }
}

impl RosterStore for MemoryStore {
    fn load_buses(&self) -> Result<Vec<Bus>, PersistenceError> {
        Ok(self.state.buses.clone())
    }

    fn load_students(&self) -> Result<Vec<Student>, PersistenceError> {
        Ok(self.state.students.clone())
    }

    fn load_tickets(&self) -> Result<Vec<Ticket>, PersistenceError> {
        Ok(self.state.tickets.clone())
    }

    fn save_buses(&mut self, buses: &[Bus]) -> Result<(), PersistenceError> {
        self.state.buses = buses.to_vec();
        Ok(())
    }

    fn save_students(&mut self, students: &[Student]) -> Result<(), PersistenceError> {
        self.state.students = students.to_vec();
        Ok(())
    }

    fn save_tickets(&mut self, tickets: &[Ticket]) -> Result<(), PersistenceError> {
        self.state.tickets = tickets.to_vec();
        Ok(())
    }
}
