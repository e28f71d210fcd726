use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A faculty groups careers.
#[derive(Clone, Debug)]
pub struct Faculty {
    pub id: i32,
    pub name: String,
}

/// A career offered by a faculty.
#[derive(Clone, Debug)]
pub struct Career {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub semesters: i32,
    pub credits: i32,
    pub faculty_id: i32,
}

/// A declarable skill.
#[derive(Clone, Debug)]
pub struct Skill {
    pub id: i32,
    pub name: String,
}

/// The cohort label of a student within a career. Status transitions are
/// not versioned; only the current enrollment row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareerStatus {
    Pursuing,
    Graduated,
    Expelled,
    Withdrawn,
}

impl CareerStatus {
    /// Every cohort label, in the order the comparison pages present them.
    /// The per-status aggregation pipelines iterate over this.
    pub const ALL: [CareerStatus; 4] = [
        CareerStatus::Pursuing,
        CareerStatus::Graduated,
        CareerStatus::Expelled,
        CareerStatus::Withdrawn,
    ];

    /// The storage representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CareerStatus::Pursuing => "pursuing",
            CareerStatus::Graduated => "graduated",
            CareerStatus::Expelled => "expelled",
            CareerStatus::Withdrawn => "withdrawn",
        }
    }

    /// Parses a status from its storage or form representation.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "pursuing" => Ok(CareerStatus::Pursuing),
            "graduated" => Ok(CareerStatus::Graduated),
            "expelled" => Ok(CareerStatus::Expelled),
            "withdrawn" => Ok(CareerStatus::Withdrawn),
            other => Err(AppError::Validation(format!("Unknown career status: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for status in CareerStatus::ALL {
            assert_eq!(CareerStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert!(matches!(
            CareerStatus::parse("enrolled"),
            Err(AppError::Validation(_))
        ));
    }
}
