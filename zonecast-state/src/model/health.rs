//! Grouping health classification

use serde::{Deserialize, Serialize};

/// Overall health of the installation's grouping
///
/// Always derived by comparing desired membership against an observed
/// snapshot; never stored as ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum GroupingHealth {
    /// Every zone's members share a single actual group
    Healthy,
    /// At least one zone is split across actual groups
    Degraded,
    /// The external system could not be observed (transient; not a
    /// topology fault)
    Unknown,
}

impl GroupingHealth {
    /// Whether the installation needs corrective action
    pub fn is_degraded(&self) -> bool {
        matches!(self, GroupingHealth::Degraded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_classification() {
        assert!(GroupingHealth::Degraded.is_degraded());
        assert!(!GroupingHealth::Healthy.is_degraded());
        assert!(!GroupingHealth::Unknown.is_degraded());
    }

    #[test]
    fn test_serde_rename() {
        assert_eq!(
            serde_json::to_string(&GroupingHealth::Healthy).unwrap(),
            "\"healthy\""
        );
    }
}
