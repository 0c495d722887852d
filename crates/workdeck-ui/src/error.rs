//! Error types for view navigation.

use workdeck_core::error::WorkdeckError;

use crate::navigation::View;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("Card not in the current collection: {0}")]
    UnknownCard(String),
    #[error("Invalid view transition: {0} -> {1}")]
    InvalidTransition(View, View),
}

impl From<NavigationError> for WorkdeckError {
    fn from(err: NavigationError) -> Self {
        WorkdeckError::Navigation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_error_display() {
        let err = NavigationError::UnknownCard("gone-001".into());
        assert_eq!(err.to_string(), "Card not in the current collection: gone-001");

        let err = NavigationError::InvalidTransition(View::Analytics, View::Analytics);
        assert_eq!(err.to_string(), "Invalid view transition: analytics -> analytics");
    }

    #[test]
    fn test_into_workdeck_error() {
        let err: WorkdeckError = NavigationError::UnknownCard("x".into()).into();
        assert!(matches!(err, WorkdeckError::Navigation(_)));
    }
}
