//! Position strings used by `move_to`
//!
//! ```text
//! ""               append to the default container
//! "top:{id}"       first child of a tab or palette
//! "bottom:{id}"    last child of a tab or palette
//! "before:{id}"    directly before a sibling
//! "after:{id}"     directly after a sibling
//! ```

use crate::error::TcaError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    Default,
    Top(String),
    Bottom(String),
    Before(String),
    After(String),
}

impl Position {
    /// Id referenced by the position, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Position::Default => None,
            Position::Top(id) | Position::Bottom(id) | Position::Before(id) | Position::After(id) => {
                Some(id)
            }
        }
    }
}

impl FromStr for Position {
    type Err = TcaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Position::Default);
        }

        let (prefix, target) = trimmed.split_once(':').ok_or_else(|| {
            TcaError::invalid_position(s, "expected '<top|bottom|before|after>:<id>'")
        })?;
        let target = target.trim();
        if target.is_empty() {
            return Err(TcaError::invalid_position(s, "missing target id"));
        }

        match prefix.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Position::Top(target.to_string())),
            "bottom" => Ok(Position::Bottom(target.to_string())),
            "before" => Ok(Position::Before(target.to_string())),
            "after" => Ok(Position::After(target.to_string())),
            other => Err(TcaError::invalid_position(
                s,
                format!("unknown prefix '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Default => Ok(()),
            Position::Top(id) => write!(f, "top:{id}"),
            Position::Bottom(id) => write!(f, "bottom:{id}"),
            Position::Before(id) => write!(f, "before:{id}"),
            Position::After(id) => write!(f, "after:{id}"),
        }
    }
}
