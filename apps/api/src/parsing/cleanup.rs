//! Cleanup rules applied by the response parser before records are assembled.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::parsing::models::{TrialIdentity, NA};

/// Marker of the generator echoing the prompt template instead of real data.
const TEMPLATE_ECHO_MARKER: &str = "Group Questions";

/// Candidate lines discarded after the marker line.
const TEMPLATE_ECHO_TRAILING: usize = 2;

/// Which identity fields must all be "NA" for a trial to count as an extraction failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateFilter {
    /// registry id, name and patient count are all "NA".
    #[default]
    AllFields,
    /// The registry id alone is "NA".
    RegistryId,
}

impl DegenerateFilter {
    pub fn is_degenerate(self, identity: &TrialIdentity) -> bool {
        match self {
            DegenerateFilter::AllFields => {
                identity.registry_id == NA && identity.name == NA && identity.patient_count == NA
            }
            DegenerateFilter::RegistryId => identity.registry_id == NA,
        }
    }
}

impl FromStr for DegenerateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all_fields" | "all" => Ok(DegenerateFilter::AllFields),
            "registry_id" | "registry" => Ok(DegenerateFilter::RegistryId),
            other => Err(format!(
                "unknown degenerate filter '{other}' (expected 'all_fields' or 'registry_id')"
            )),
        }
    }
}

/// Drops every candidate line containing "Group Questions" together with the two
/// candidate lines that follow it.
pub fn strip_template_echo<'a>(candidates: &[&'a str]) -> Vec<&'a str> {
    let mut kept = Vec::with_capacity(candidates.len());
    let mut skip = 0;

    for line in candidates {
        if line.contains(TEMPLATE_ECHO_MARKER) {
            skip = TEMPLATE_ECHO_TRAILING;
            continue;
        }
        if skip > 0 {
            skip -= 1;
            continue;
        }
        kept.push(*line);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(registry: &str, name: &str, patients: &str) -> TrialIdentity {
        TrialIdentity {
            trial_number: 1,
            registry_id: registry.to_string(),
            name: name.to_string(),
            patient_count: patients.to_string(),
        }
    }

    #[test]
    fn test_all_fields_filter_only_drops_fully_blank_identity() {
        let filter = DegenerateFilter::AllFields;
        assert!(filter.is_degenerate(&identity(NA, NA, NA)));
        assert!(!filter.is_degenerate(&identity(NA, "Some Trial", NA)));
        assert!(!filter.is_degenerate(&identity("NCT1", NA, NA)));
    }

    #[test]
    fn test_registry_filter_drops_missing_registry() {
        let filter = DegenerateFilter::RegistryId;
        assert!(filter.is_degenerate(&identity(NA, "Some Trial", "40")));
        assert!(!filter.is_degenerate(&identity("NCT1", NA, NA)));
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("all_fields".parse(), Ok(DegenerateFilter::AllFields));
        assert_eq!(" Registry_ID ".parse(), Ok(DegenerateFilter::RegistryId));
        assert!("sometimes".parse::<DegenerateFilter>().is_err());
    }

    #[test]
    fn test_filter_serde_names() {
        let json = serde_json::to_string(&DegenerateFilter::RegistryId).unwrap();
        assert_eq!(json, "\"registry_id\"");
        assert_eq!(DegenerateFilter::default(), DegenerateFilter::AllFields);
    }

    #[test]
    fn test_strip_removes_marker_and_two_following_lines() {
        let candidates = vec![
            "Group1:Control:Placebo:None",
            "Group Questions: Maintain this exact format",
            "Group1:ControlGroup:DrugNames(s):UniqueCharacteristics",
            "Group2:InterventionGroup:DrugName(s):UniqueCharacteristics",
            "Group2:Intervention:Drug A:Arm",
        ];
        assert_eq!(
            strip_template_echo(&candidates),
            vec!["Group1:Control:Placebo:None", "Group2:Intervention:Drug A:Arm"]
        );
    }

    #[test]
    fn test_strip_marker_at_end_is_safe() {
        let candidates = vec!["Group1:Control:Placebo:None", "Group Questions:"];
        assert_eq!(
            strip_template_echo(&candidates),
            vec!["Group1:Control:Placebo:None"]
        );
    }

    #[test]
    fn test_strip_without_marker_keeps_everything() {
        let candidates = vec!["Group1:A:B:C", "Group2:D:E:F"];
        assert_eq!(strip_template_echo(&candidates), candidates);
    }
}
