// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bsms_domain::{Bus, Student, Ticket};
use serde::{Deserialize, Serialize};

/// The full roster snapshot a core operation works over.
///
/// Core operations are synchronous, single-threaded computations over one
/// such snapshot; they never cache state across calls. Callers re-read
/// current state before each operation and write back the full resulting
/// collections (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterState {
    /// The bus fleet.
    pub buses: Vec<Bus>,
    /// All permanent students.
    pub students: Vec<Student>,
    /// Stored day tickets, possibly including stale dates until the next
    /// purge-on-read.
    pub tickets: Vec<Ticket>,
}
