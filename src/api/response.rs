//! Submission response body

use serde::{Deserialize, Serialize};

/// What the backend says about one submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SubmitResult {
    Success,
    Error {
        #[serde(default)]
        reason: String,
    },
    /// Resubmit after `timeout` milliseconds
    Progress { timeout: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_success() {
        let parsed: SubmitResult = serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert_eq!(parsed, SubmitResult::Success);
    }

    #[test]
    fn test_parse_error_with_reason() {
        let parsed: SubmitResult =
            serde_json::from_str(r#"{"status": "error", "reason": "Number is taken"}"#).unwrap();
        assert_eq!(
            parsed,
            SubmitResult::Error {
                reason: "Number is taken".to_string()
            }
        );
    }

    #[test]
    fn test_parse_error_without_reason() {
        let parsed: SubmitResult = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(
            parsed,
            SubmitResult::Error {
                reason: String::new()
            }
        );
    }

    #[test]
    fn test_parse_progress() {
        let parsed: SubmitResult =
            serde_json::from_str(r#"{"status": "progress", "timeout": 1500}"#).unwrap();
        assert_eq!(parsed, SubmitResult::Progress { timeout: 1500 });
    }

    #[test]
    fn test_progress_requires_timeout() {
        assert!(serde_json::from_str::<SubmitResult>(r#"{"status": "progress"}"#).is_err());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<SubmitResult>(r#"{"status": "pending"}"#).is_err());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let parsed: SubmitResult =
            serde_json::from_str(r#"{"status": "success", "id": 42}"#).unwrap();
        assert_eq!(parsed, SubmitResult::Success);
    }

    #[test]
    fn test_bundled_fixtures_parse() {
        let success: SubmitResult =
            serde_json::from_str(include_str!("../../api/success.json")).unwrap();
        assert_eq!(success, SubmitResult::Success);

        let error: SubmitResult =
            serde_json::from_str(include_str!("../../api/error.json")).unwrap();
        assert!(matches!(error, SubmitResult::Error { ref reason } if !reason.is_empty()));

        let progress: SubmitResult =
            serde_json::from_str(include_str!("../../api/progress.json")).unwrap();
        assert_eq!(progress, SubmitResult::Progress { timeout: 1000 });
    }
}
