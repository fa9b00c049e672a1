//! Result alias used across tree edits and table compilation

use crate::error::TcaError;

pub type Result<T> = std::result::Result<T, TcaError>;

/// Helpers for callers that compile many tables or apply many tree edits
pub trait ResultExt<T> {
    /// Turn a missing node or a bad position into `Ok(None)`
    ///
    /// Lets a batch of moves skip an edit whose target is gone while layout
    /// grammar errors and id collisions still abort.
    fn recoverable(self) -> Result<Option<T>>;

    /// Log the failure of one table and drop it from the batch
    fn log_and_continue(self) -> Option<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn log_and_continue(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                if err.is_recoverable() {
                    tracing::warn!("Continuing after error: {}", err);
                } else {
                    tracing::error!("Fatal error: {}", err);
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_swallows_position_errors() {
        let result: Result<u32> = Err(TcaError::node_not_found("gone"));
        assert!(matches!(result.recoverable(), Ok(None)));
    }

    #[test]
    fn test_recoverable_skips_move_to_missing_node() {
        let mut tree = crate::tree::FormTree::new();
        tree.field("title").unwrap();

        let moved = tree.move_to("title", "after:gone").recoverable();
        assert!(matches!(moved, Ok(None)));
        assert!(tree.find_field("title").is_some());
    }

    #[test]
    fn test_recoverable_keeps_grammar_errors() {
        let result: Result<u32> = Err(TcaError::unknown_special_item("x", "--x--"));
        assert!(result.recoverable().is_err());
    }
}
