// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PersistenceError, RosterStore};
use bsms_domain::{Bus, Student, Ticket};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const BUSES_FILE: &str = "buses.json";
const STUDENTS_FILE: &str = "students.json";
const TICKETS_FILE: &str = "tickets.json";

/// File-backed roster store.
///
/// Keeps one pretty-printed JSON array per collection in a data
/// directory. A missing or empty file reads as an empty collection, so
/// a fresh directory is a valid empty roster.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, PersistenceError> {
        let dir: PathBuf = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn read_collection<T: DeserializeOwned>(
        &self,
        file_name: &str,
    ) -> Result<Vec<T>, PersistenceError> {
        let path: PathBuf = self.dir.join(file_name);
        let raw: String = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(file = file_name, "data file absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Decode { path, source })
    }

    fn write_collection<T: Serialize>(
        &self,
        file_name: &str,
        items: &[T],
    ) -> Result<(), PersistenceError> {
        let path: PathBuf = self.dir.join(file_name);
        let encoded: String =
            serde_json::to_string_pretty(items).map_err(PersistenceError::Encode)?;
        fs::write(&path, encoded).map_err(|source| PersistenceError::Io { path, source })?;
        tracing::debug!(file = file_name, records = items.len(), "collection written");
        Ok(())
    }
}

impl RosterStore for JsonFileStore {
    fn load_buses(&self) -> Result<Vec<Bus>, PersistenceError> {
        self.read_collection(BUSES_FILE)
    }

    fn load_students(&self) -> Result<Vec<Student>, PersistenceError> {
        self.read_collection(STUDENTS_FILE)
    }

    fn load_tickets(&self) -> Result<Vec<Ticket>, PersistenceError> {
        self.read_collection(TICKETS_FILE)
    }

    fn save_buses(&mut self, buses: &[Bus]) -> Result<(), PersistenceError> {
        self.write_collection(BUSES_FILE, buses)
    }

    fn save_students(&mut self, students: &[Student]) -> Result<(), PersistenceError> {
        self.write_collection(STUDENTS_FILE, students)
    }

    fn save_tickets(&mut self, tickets: &[Ticket]) -> Result<(), PersistenceError> {
        self.write_collection(TICKETS_FILE, tickets)
    }
}
