// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// The closed set of actor roles derivable from an id string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A permanent student rider.
    Student,
    /// The conductor assigned to one bus.
    Conductor,
    /// The motor transport officer running the fleet.
    Mto,
    /// The transport incharge overseeing daily operation.
    Incharge,
    /// Faculty rider.
    Faculty,
}

impl Role {
    /// Returns the lowercase string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Conductor => "conductor",
            Self::Mto => "mto",
            Self::Incharge => "incharge",
            Self::Faculty => "faculty",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies an id string into a role by its prefix.
///
/// Multi-letter prefixes are checked first so that "MTO1" is not taken
/// for a conductor-style id. Returns `None` for ids matching no known
/// prefix; callers decide whether that is an error.
#[must_use]
pub fn classify_role(id: &str) -> Option<Role> {
    let id: String = id.trim().to_uppercase();
    if id.starts_with("MTO") {
        Some(Role::Mto)
    } else if id.starts_with("INC") {
        Some(Role::Incharge)
    } else if id.starts_with('S') {
        Some(Role::Student)
    } else if id.starts_with('C') {
        Some(Role::Conductor)
    } else if id.starts_with('F') {
        Some(Role::Faculty)
    } else {
        None
    }
}
