//! School entities the fee ledger reads but never writes
//!
//! Students, classes and staff are maintained by the administrative CRUD
//! pages; the ledger receives them as plain values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClassId, CollectorId, StudentId};

/// A student enrolled in exactly one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub class_id: ClassId,
    /// Display name
    pub name: String,
    /// Roll number or admission code
    pub code: String,
}

impl Student {
    pub fn new(class_id: ClassId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: StudentId::new_v7(),
            class_id,
            name: name.into(),
            code: code.into(),
        }
    }
}

/// A class (form/section) students belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub grade: String,
}

impl Class {
    pub fn new(name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            id: ClassId::new_v7(),
            name: name.into(),
            grade: grade.into(),
        }
    }
}

/// Staff role allowed to collect payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorRole {
    Teacher,
    Admin,
}

impl CollectorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectorRole::Teacher => "teacher",
            CollectorRole::Admin => "admin",
        }
    }
}

impl fmt::Display for CollectorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(CollectorRole::Teacher),
            "admin" => Ok(CollectorRole::Admin),
            other => Err(format!("unknown collector role '{}'", other)),
        }
    }
}

/// The `(role, id)` pair stored on every fee record
///
/// Teachers and admins live in separate directories, so the id alone does
/// not identify a collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectorRef {
    pub role: CollectorRole,
    pub id: CollectorId,
}

impl CollectorRef {
    pub fn new(role: CollectorRole, id: CollectorId) -> Self {
        Self { role, id }
    }

    pub fn teacher(id: CollectorId) -> Self {
        Self::new(CollectorRole::Teacher, id)
    }

    pub fn admin(id: CollectorId) -> Self {
        Self::new(CollectorRole::Admin, id)
    }
}

/// A staff member as listed by the collector directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collector {
    pub id: CollectorId,
    pub name: String,
    pub role: CollectorRole,
}

impl Collector {
    pub fn reference(&self) -> CollectorRef {
        CollectorRef::new(self.role, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_role_roundtrip() {
        for role in [CollectorRole::Teacher, CollectorRole::Admin] {
            assert_eq!(role.as_str().parse::<CollectorRole>(), Ok(role));
        }
        assert!("janitor".parse::<CollectorRole>().is_err());
    }

    #[test]
    fn test_same_id_different_role_is_different_ref() {
        let id = CollectorId::new();
        assert_ne!(CollectorRef::teacher(id), CollectorRef::admin(id));
    }
}
