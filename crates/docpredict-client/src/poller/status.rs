//! Remote operation status values.

use serde::Deserialize;

/// Status reported by a status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Accepted but not yet picked up.
    NotStarted,
    /// In progress.
    Running,
    /// Finished; the result is ready to fetch.
    Succeeded,
    /// Failed, or any status this client does not know.
    Failed(String),
}

impl OperationStatus {
    /// Parses a status string, ignoring ASCII case.
    pub fn parse(status: &str) -> Self {
        if status.eq_ignore_ascii_case("notstarted") {
            Self::NotStarted
        } else if status.eq_ignore_ascii_case("running") {
            Self::Running
        } else if status.eq_ignore_ascii_case("succeeded") {
            Self::Succeeded
        } else {
            Self::Failed(status.to_owned())
        }
    }

    /// Returns `true` while the operation should keep being polled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Running)
    }
}

/// Body of a status poll response.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(OperationStatus::parse("NotStarted"), OperationStatus::NotStarted);
        assert_eq!(OperationStatus::parse("RUNNING"), OperationStatus::Running);
        assert_eq!(OperationStatus::parse("succeeded"), OperationStatus::Succeeded);
    }

    #[test]
    fn test_unknown_status_is_failed() {
        for status in ["Failed", "Cancelled", "", "not started"] {
            assert_eq!(
                OperationStatus::parse(status),
                OperationStatus::Failed(status.to_owned())
            );
        }
    }

    #[test]
    fn test_is_pending() {
        assert!(OperationStatus::NotStarted.is_pending());
        assert!(OperationStatus::Running.is_pending());
        assert!(!OperationStatus::Succeeded.is_pending());
        assert!(!OperationStatus::Failed("Failed".into()).is_pending());
    }
}
