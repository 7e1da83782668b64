//! Turning several rejected edits into one message for the person editing.

use hexforge_options::OptionKey;
use serde::{Deserialize, Serialize};

use crate::EditFailure;

/// Which rejected edit a [`ValidationReport`] leads with.
///
/// Every edit is validated regardless of policy; the policy only picks
/// what gets shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportPolicy {
    /// Message and key of the first failure, in edit order.
    First,
    /// Message and key of the last failure, in edit order.
    #[default]
    Last,
    /// Every message joined with `"; "`, keyed to the first failure.
    All,
}

impl ReportPolicy {
    /// Builds the report for `failures`, or `None` if there were none.
    pub fn report(self, failures: Vec<EditFailure>) -> Option<ValidationReport> {
        let (message, key) = match self {
            Self::First => {
                let f = failures.first()?;
                (f.message.clone(), f.key.clone())
            }
            Self::Last => {
                let f = failures.last()?;
                (f.message.clone(), f.key.clone())
            }
            Self::All => {
                let f = failures.first()?;
                let joined = failures
                    .iter()
                    .map(|f| f.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ");
                (joined, f.key.clone())
            }
        };
        Some(ValidationReport {
            message,
            key,
            failures,
        })
    }
}

/// The outcome of a batch of edits that didn't all validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Text to show.
    pub message: String,
    /// The option the UI should point at.
    pub key: OptionKey,
    /// Every failure, in edit order.
    pub failures: Vec<EditFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failures() -> Vec<EditFailure> {
        [("PL", "first"), ("DS", "second"), ("N7", "third")]
            .into_iter()
            .map(|(k, m)| EditFailure {
                key: OptionKey::new(k).unwrap(),
                message: m.into(),
            })
            .collect()
    }

    #[test]
    fn test_report_first_policy() {
        let report = ReportPolicy::First.report(failures()).unwrap();
        assert_eq!(report.message, "first");
        assert_eq!(report.key.as_str(), "PL");
        assert_eq!(report.failures.len(), 3);
    }

    #[test]
    fn test_report_last_policy() {
        let report = ReportPolicy::Last.report(failures()).unwrap();
        assert_eq!(report.message, "third");
        assert_eq!(report.key.as_str(), "N7");
    }

    #[test]
    fn test_report_all_policy_joins_messages() {
        let report = ReportPolicy::All.report(failures()).unwrap();
        assert_eq!(report.message, "first; second; third");
        assert_eq!(report.key.as_str(), "PL");
    }

    #[test]
    fn test_report_no_failures_is_none() {
        for policy in [ReportPolicy::First, ReportPolicy::Last, ReportPolicy::All] {
            assert!(policy.report(Vec::new()).is_none());
        }
    }

    #[test]
    fn test_default_policy_is_last() {
        assert_eq!(ReportPolicy::default(), ReportPolicy::Last);
        assert_eq!(serde_json::to_string(&ReportPolicy::All).unwrap(), "\"All\"");
    }
}
