//! Fixed question tables: the closed set of trial-level and group-level fields
//! the parser extracts. Never extended at runtime.

use serde::{Deserialize, Serialize};

/// Trial-level fields, matched by keyword against the restated question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialQuestion {
    Phase,
    CancerType,
    CancerDescription,
    Sponsor,
    NovelFindings,
    Conclusions,
    UniqueInformation,
    HeightenedSubgroups,
}

/// Keyword table, in match priority order.
///
/// `CancerDescription` sits ahead of `CancerType` because "Describe the Cancer Type?"
/// also contains "cancer type".
const TRIAL_KEYWORDS: &[(TrialQuestion, &[&str])] = &[
    (TrialQuestion::Phase, &["phase"]),
    (TrialQuestion::CancerDescription, &["describe"]),
    (TrialQuestion::CancerType, &["type of cancer", "cancer type"]),
    (TrialQuestion::Sponsor, &["sponsor"]),
    (TrialQuestion::NovelFindings, &["novel"]),
    (TrialQuestion::Conclusions, &["conclusion"]),
    (TrialQuestion::UniqueInformation, &["unique"]),
    (TrialQuestion::HeightenedSubgroups, &["subgroup", "heightened"]),
];

impl TrialQuestion {
    /// Column order used by the tabular export.
    pub const ALL: [TrialQuestion; 8] = [
        TrialQuestion::Phase,
        TrialQuestion::CancerType,
        TrialQuestion::CancerDescription,
        TrialQuestion::Sponsor,
        TrialQuestion::NovelFindings,
        TrialQuestion::Conclusions,
        TrialQuestion::UniqueInformation,
        TrialQuestion::HeightenedSubgroups,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TrialQuestion::Phase => "phase",
            TrialQuestion::CancerType => "cancer_type",
            TrialQuestion::CancerDescription => "cancer_description",
            TrialQuestion::Sponsor => "sponsor",
            TrialQuestion::NovelFindings => "novel_findings",
            TrialQuestion::Conclusions => "conclusions",
            TrialQuestion::UniqueInformation => "unique_information",
            TrialQuestion::HeightenedSubgroups => "heightened_subgroups",
        }
    }

    /// Returns every field whose keyword occurs in `question`, in priority order.
    /// Matching is case-insensitive.
    pub fn candidates(question: &str) -> impl Iterator<Item = TrialQuestion> {
        let lowered = question.to_lowercase();
        TRIAL_KEYWORDS
            .iter()
            .filter(move |(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(q, _)| *q)
    }
}

/// Group-level fields, addressed by their 1-based index in `GroupN-<i>` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupQuestion {
    ControlOrIntervention,
    DrugsStudied,
    TreatmentOrr,
    TreatmentPfs,
    TreatmentOs,
    DiscontinuationRate,
    MetEndpoints,
    CancerStages,
    PatientTargets,
    PriorDrugTypes,
    ResistanceToDrugs,
    ResistanceToDrugTypes,
    BrainMetastases,
    PreviousSurgery,
    AdvancedCancer,
    MetastaticCancer,
    PreviouslyUntreated,
    PreviouslyTakenDrugs,
    NotPreviouslyTakenDrugs,
    LineOfTherapy,
    WellTolerated,
    AdverseReactions,
    DrugApproved,
    OtherEfficacyData,
}

impl GroupQuestion {
    pub const COUNT: usize = 24;

    /// Index order: `ALL[i - 1]` answers `GroupN-<i>`.
    pub const ALL: [GroupQuestion; GroupQuestion::COUNT] = [
        GroupQuestion::ControlOrIntervention,
        GroupQuestion::DrugsStudied,
        GroupQuestion::TreatmentOrr,
        GroupQuestion::TreatmentPfs,
        GroupQuestion::TreatmentOs,
        GroupQuestion::DiscontinuationRate,
        GroupQuestion::MetEndpoints,
        GroupQuestion::CancerStages,
        GroupQuestion::PatientTargets,
        GroupQuestion::PriorDrugTypes,
        GroupQuestion::ResistanceToDrugs,
        GroupQuestion::ResistanceToDrugTypes,
        GroupQuestion::BrainMetastases,
        GroupQuestion::PreviousSurgery,
        GroupQuestion::AdvancedCancer,
        GroupQuestion::MetastaticCancer,
        GroupQuestion::PreviouslyUntreated,
        GroupQuestion::PreviouslyTakenDrugs,
        GroupQuestion::NotPreviouslyTakenDrugs,
        GroupQuestion::LineOfTherapy,
        GroupQuestion::WellTolerated,
        GroupQuestion::AdverseReactions,
        GroupQuestion::DrugApproved,
        GroupQuestion::OtherEfficacyData,
    ];

    /// Maps a 1-based question index to its field. Out-of-range indices map to `None`.
    pub fn from_index(index: usize) -> Option<GroupQuestion> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    pub fn key(self) -> &'static str {
        match self {
            GroupQuestion::ControlOrIntervention => "control_or_intervention",
            GroupQuestion::DrugsStudied => "drugs_studied",
            GroupQuestion::TreatmentOrr => "treatment_orr",
            GroupQuestion::TreatmentPfs => "treatment_pfs",
            GroupQuestion::TreatmentOs => "treatment_os",
            GroupQuestion::DiscontinuationRate => "discontinuation_rate",
            GroupQuestion::MetEndpoints => "met_endpoints",
            GroupQuestion::CancerStages => "cancer_stages",
            GroupQuestion::PatientTargets => "patient_targets",
            GroupQuestion::PriorDrugTypes => "prior_drug_types",
            GroupQuestion::ResistanceToDrugs => "resistance_to_drugs",
            GroupQuestion::ResistanceToDrugTypes => "resistance_to_drug_types",
            GroupQuestion::BrainMetastases => "brain_metastases",
            GroupQuestion::PreviousSurgery => "previous_surgery",
            GroupQuestion::AdvancedCancer => "advanced_cancer",
            GroupQuestion::MetastaticCancer => "metastatic_cancer",
            GroupQuestion::PreviouslyUntreated => "previously_untreated",
            GroupQuestion::PreviouslyTakenDrugs => "previously_taken_drugs",
            GroupQuestion::NotPreviouslyTakenDrugs => "not_previously_taken_drugs",
            GroupQuestion::LineOfTherapy => "line_of_therapy",
            GroupQuestion::WellTolerated => "well_tolerated",
            GroupQuestion::AdverseReactions => "adverse_reactions",
            GroupQuestion::DrugApproved => "drug_approved",
            GroupQuestion::OtherEfficacyData => "other_efficacy_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_candidate(question: &str) -> Option<TrialQuestion> {
        TrialQuestion::candidates(question).next()
    }

    #[test]
    fn test_prompt_questions_map_to_expected_fields() {
        let cases = [
            ("What Phase is the clinical trial in? Phase 1, Phase 2, Phase 3, or Phase 4?", TrialQuestion::Phase),
            ("What type of cancer(s) was this trial studying? ie- NSCLC, SCLC, Melanoma", TrialQuestion::CancerType),
            ("Describe the Cancer Type?", TrialQuestion::CancerDescription),
            ("Who sponsored the clinical trial?", TrialQuestion::Sponsor),
            ("What were the novel findings of this trial?", TrialQuestion::NovelFindings),
            ("What conclusions were reached regarding this clinical trial?", TrialQuestion::Conclusions),
            ("Is there any other relevant information that might make this clinical trial unique?", TrialQuestion::UniqueInformation),
            ("Were there any subgroups in this study that had heightened responses?", TrialQuestion::HeightenedSubgroups),
        ];
        for (question, expected) in cases {
            assert_eq!(first_candidate(question), Some(expected), "question: {question}");
        }
    }

    #[test]
    fn test_registry_question_matches_nothing() {
        assert_eq!(
            first_candidate("What is the NCT# Associated with this clinical trial? (If there is one)"),
            None
        );
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert_eq!(first_candidate("PHASE"), Some(TrialQuestion::Phase));
        assert_eq!(first_candidate("SpOnSoR"), Some(TrialQuestion::Sponsor));
    }

    #[test]
    fn test_group_question_index_bounds() {
        assert_eq!(GroupQuestion::from_index(0), None);
        assert_eq!(
            GroupQuestion::from_index(1),
            Some(GroupQuestion::ControlOrIntervention)
        );
        assert_eq!(
            GroupQuestion::from_index(24),
            Some(GroupQuestion::OtherEfficacyData)
        );
        assert_eq!(GroupQuestion::from_index(25), None);
    }

    #[test]
    fn test_keys_match_serde_names() {
        for q in TrialQuestion::ALL {
            let json = serde_json::to_string(&q).unwrap();
            assert_eq!(json, format!("\"{}\"", q.key()));
        }
        for q in GroupQuestion::ALL {
            let json = serde_json::to_string(&q).unwrap();
            assert_eq!(json, format!("\"{}\"", q.key()));
        }
    }
}
