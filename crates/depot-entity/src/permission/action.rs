//! Permission action definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions that can be checked against a folder permission grant.
///
/// The three capabilities are independent: granting write implies
/// nothing about read or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    /// List or download folder contents.
    Read,
    /// Upload into, copy into, or move into the folder.
    Write,
    /// Delete folder contents or the folder itself.
    Delete,
}

impl PermissionAction {
    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for PermissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionAction {
    type Err = depot_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "delete" => Ok(Self::Delete),
            _ => Err(depot_core::AppError::validation(format!(
                "Invalid permission action: '{s}'. Expected one of: read, write, delete"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(
            "read".parse::<PermissionAction>().unwrap(),
            PermissionAction::Read
        );
        assert_eq!(
            "DELETE".parse::<PermissionAction>().unwrap(),
            PermissionAction::Delete
        );
        assert!("execute".parse::<PermissionAction>().is_err());
    }
}
