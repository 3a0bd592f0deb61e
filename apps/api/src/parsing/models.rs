use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parsing::questions::{GroupQuestion, TrialQuestion};

/// Placeholder for any field the generated text did not supply.
pub const NA: &str = "NA";

/// Maps empty or whitespace-only text to `"NA"`.
pub fn or_na(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NA.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Identity line of a trial (`TrialK-Info:<registry>:<name>:<patients>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialIdentity {
    pub trial_number: u32,
    pub registry_id: String,
    pub name: String,
    pub patient_count: String,
}

impl TrialIdentity {
    pub fn unknown(trial_number: u32) -> Self {
        Self {
            trial_number,
            registry_id: NA.to_string(),
            name: NA.to_string(),
            patient_count: NA.to_string(),
        }
    }
}

/// Answers to the fixed trial-level questions. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialAnswers {
    pub trial_number: u32,
    pub registry_id: String,
    pub answers: BTreeMap<TrialQuestion, String>,
}

impl TrialAnswers {
    pub fn new(trial_number: u32, registry_id: &str) -> Self {
        Self {
            trial_number,
            registry_id: registry_id.to_string(),
            answers: TrialQuestion::ALL
                .iter()
                .map(|q| (*q, NA.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, question: TrialQuestion) -> &str {
        self.answers.get(&question).map(String::as_str).unwrap_or(NA)
    }

    pub fn is_answered(&self, question: TrialQuestion) -> bool {
        self.get(question) != NA
    }
}

/// A treatment arm or subgroup (`GroupN:<type>:<drug>:<description>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub group_number: u32,
    pub group_type: String,
    pub drug: String,
    pub description: String,
}

/// Answers to the 24 fixed group-level questions. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAnswers {
    pub group_number: u32,
    pub answers: BTreeMap<GroupQuestion, String>,
}

impl GroupAnswers {
    pub fn new(group_number: u32) -> Self {
        Self {
            group_number,
            answers: GroupQuestion::ALL
                .iter()
                .map(|q| (*q, NA.to_string()))
                .collect(),
        }
    }

    pub fn get(&self, question: GroupQuestion) -> &str {
        self.answers.get(&question).map(String::as_str).unwrap_or(NA)
    }
}

/// A group definition together with its answers; the two share `group_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub definition: GroupDefinition,
    pub answers: GroupAnswers,
}

/// Everything extracted from one parser run.
///
/// `identities` and `trial_answers` are parallel (same trial numbers, same order).
/// `groups` has one entry per surviving trial, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResultSet {
    pub identities: Vec<TrialIdentity>,
    pub trial_answers: Vec<TrialAnswers>,
    pub groups: BTreeMap<u32, Vec<GroupRecord>>,
}

impl ParsedResultSet {
    /// Number of distinct trials, counting those that only contribute groups.
    pub fn trial_count(&self) -> usize {
        self.groups.len().max(self.identities.len())
    }

    pub fn group_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn groups_for(&self, trial_number: u32) -> &[GroupRecord] {
        self.groups
            .get(&trial_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_na_defaults_blank_values() {
        assert_eq!(or_na(""), "NA");
        assert_eq!(or_na("   "), "NA");
        assert_eq!(or_na(" NCT1 "), "NCT1");
    }

    #[test]
    fn test_new_answers_default_every_key_to_na() {
        let trial = TrialAnswers::new(1, "NCT1");
        assert_eq!(trial.answers.len(), TrialQuestion::ALL.len());
        assert!(trial.answers.values().all(|v| v == NA));

        let group = GroupAnswers::new(2);
        assert_eq!(group.answers.len(), GroupQuestion::COUNT);
        assert_eq!(group.get(GroupQuestion::DrugApproved), NA);
    }

    #[test]
    fn test_result_set_serializes_question_keys_as_snake_case() {
        let mut answers = TrialAnswers::new(1, "NCT1");
        answers
            .answers
            .insert(TrialQuestion::Phase, "Phase 2".to_string());
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json["answers"]["phase"], "Phase 2");
        assert_eq!(json["answers"]["heightened_subgroups"], "NA");
    }

    #[test]
    fn test_result_set_json_roundtrip() {
        let mut set = ParsedResultSet::default();
        set.identities.push(TrialIdentity::unknown(1));
        set.trial_answers.push(TrialAnswers::new(1, NA));
        set.groups.insert(
            1,
            vec![GroupRecord {
                definition: GroupDefinition {
                    group_number: 1,
                    group_type: "Control".to_string(),
                    drug: "Placebo".to_string(),
                    description: NA.to_string(),
                },
                answers: GroupAnswers::new(1),
            }],
        );
        let json = serde_json::to_string(&set).unwrap();
        let back: ParsedResultSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert_eq!(back.group_count(), 1);
        assert_eq!(back.trial_count(), 1);
    }
}
