//! Prompt for one batch of scraped trials.
//!
//! The answer layout requested here is exactly what `parsing` reads back:
//! `TrialK-Info:` identity lines, numbered trial questions answered with `NA.`,
//! `GroupN:` definitions and `GroupN-i.` / `GroupN-iA.` group answers. Trial
//! questions are matched by keyword, group questions by index, so the order of
//! `GROUP_QUESTIONS` must follow `GroupQuestion::ALL`.

use crate::llm_client::prompts::EXACT_FORMAT_INSTRUCTION;
use crate::retrieval::TrialRecord;

/// Restated trial-level questions. Each one carries the keyword its answer is
/// filed under (phase, type of cancer, describe, sponsor, novel, conclusion,
/// unique, subgroup).
pub const TRIAL_QUESTIONS: [&str; 9] = [
    "What registry number (NCT#) is associated with this trial, if any?",
    "Which phase is the trial in? Phase 1, Phase 2, Phase 3 or Phase 4?",
    "What type of cancer(s) did the trial study? e.g. NSCLC, SCLC, melanoma, leukemia, colon",
    "Describe the cancer type.",
    "Who sponsored the trial?",
    "What were the novel findings of the trial?",
    "What conclusions were reached?",
    "Is there any other relevant information that makes this trial unique? Keep it short.",
    "Were there any subgroups with a heightened response to the intervention?",
];

/// Group-level questions, in answer-index order (`GroupX-1` .. `GroupX-24`).
pub const GROUP_QUESTIONS: [&str; 24] = [
    "Is this the control group or the intervention group?",
    "Which drug(s) did the trial study in this group?",
    "What was the treatment ORR in this group?",
    "What was the intervention treatment PFS in this group?",
    "What was the intervention treatment OS in this group?",
    "What percentage of patients in this group discontinued?",
    "Did the group meet its endpoints? Yes, No or NA",
    "Did the group only include specific cancer stages? If so, which?",
    "Did the group include patients with targets (mutations, biomarkers, genes)?",
    "Did the group include patients who had previously taken a specific drug type?",
    "Did the group include patients resistant to specific drugs? If so, list the drugs",
    "Did the group include patients resistant to specific drug types? If so, list the drug types",
    "Did the group include patients with brain metastases? Yes or No",
    "Did the group include patients with previous surgery? Yes or No",
    "Did the group include patients with advanced cancer? Yes or No",
    "Did the group include patients with metastatic cancer? Yes or No",
    "Did the group include previously untreated patients?",
    "Did the group include patients who had previously taken a specific drug? If so, list the drugs",
    "Did the group include patients who had NOT previously taken a specific drug? If so, list the drugs",
    "Which line of therapy (1st, 2nd, 3rd ...) were patients in this group receiving?",
    "Was the treatment well tolerated in this group?",
    "Which adverse reactions were associated with this group?",
    "Has the intervention drug(s) for this group been approved? Yes, No or NA",
    "What other efficacy data points were measured (TTP, DoR, CR, PR, SD, CBR, pCR ...)? Give them as TTP:X, DoR:X, CR:X",
];

const INSTRUCTIONS: &str = "\
Read every instruction and follow it exactly.

The text below contains the results of one or more clinical trials. Answer the \
questions for ALL of them in a single response, one block per trial. \
Be concise but complete. Give drug names without brand names. Give mutations, targets \
and biomarkers as their acronyms, and never list the ones a group did NOT have \
(no \"No EGFR\" style answers). For secondary or sensitizing mutations list only those \
mutations.

Restate each question on its numbered line, then give the answer on the next line \
numbered with an A, for example:
2.Which phase is the trial in?
2A.Phase 3
";

/// The fixed template sent ahead of every batch of trials.
///
/// Asks for one self-contained block per trial: its `Trial1-Info:` line, its
/// trial questions, then its own groups and group answers. Every block uses the
/// label `Trial1-Info` and restarts group numbers at 1.
pub fn clinical_trial_template() -> String {
    let mut out = String::from(INSTRUCTIONS);

    out.push_str(
        "\nWrite one block per trial, in the order the trials are given, and repeat the \
         whole block below for every trial. Begin each block with that trial's identity \
         line, labelled Trial1-Info exactly as shown, even for the second or later trial. \
         Use a short trial name without commas or colons, and NA when the registry number \
         or patient count is not stated. Do not list the identity lines together anywhere \
         else.\n\n\
         Trial1-Info:NCT#:Trial Name:#ofPatients\n\n\
         Trial Questions:\n",
    );
    for (i, question) in TRIAL_QUESTIONS.iter().enumerate() {
        out.push_str(&format!("{}.{question}\n{}A.[Answer]\n", i + 1, i + 1));
    }

    out.push_str(
        "\nStudy Groups:\n\
         Define every study group of this trial, including subgroups analysed separately \
         (by target, mutation, prior treatment ...), one per line, starting again from \
         Group1 in each block:\n\
         Group1:ControlGroup:DrugName(s):UniqueCharacteristics\n\
         Group2:InterventionGroup:DrugName(s):UniqueCharacteristics\n\n\
         Group Questions:\n\
         Answer every question for every group of this trial, replacing X with the group number:\n",
    );
    for (i, question) in GROUP_QUESTIONS.iter().enumerate() {
        out.push_str(&format!("GroupX-{}.{question}\nGroupX-{}A.[Answer]\n", i + 1, i + 1));
    }

    out.push_str("\nEnd of block. Start the next trial's block on a new line.\n\n");
    out.push_str(EXACT_FORMAT_INSTRUCTION);
    out
}

/// Template followed by the numbered trials of one batch.
pub fn build_prompt(records: &[TrialRecord]) -> String {
    let trials = records
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Trial {}:\nHeadline: {}\nBody: {}", i + 1, r.title, r.abstract_text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\nAnalyze the following clinical trials:\n\n{trials}",
        clinical_trial_template()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::questions::{GroupQuestion, TrialQuestion};

    #[test]
    fn test_trial_questions_map_to_fields_in_order() {
        let mapped: Vec<Option<TrialQuestion>> = TRIAL_QUESTIONS
            .iter()
            .map(|q| TrialQuestion::candidates(q).next())
            .collect();
        assert_eq!(
            mapped,
            vec![
                None,
                Some(TrialQuestion::Phase),
                Some(TrialQuestion::CancerType),
                Some(TrialQuestion::CancerDescription),
                Some(TrialQuestion::Sponsor),
                Some(TrialQuestion::NovelFindings),
                Some(TrialQuestion::Conclusions),
                Some(TrialQuestion::UniqueInformation),
                Some(TrialQuestion::HeightenedSubgroups),
            ]
        );
    }

    #[test]
    fn test_one_group_question_per_answer_field() {
        assert_eq!(GROUP_QUESTIONS.len(), GroupQuestion::COUNT);
    }

    #[test]
    fn test_template_lists_every_group_question_index() {
        let template = clinical_trial_template();
        for i in 1..=GroupQuestion::COUNT {
            assert!(template.contains(&format!("GroupX-{i}A.[Answer]")), "missing {i}");
        }
        assert!(template.contains("Trial1-Info:NCT#:Trial Name:#ofPatients"));
    }

    #[test]
    fn test_template_is_a_single_trial_block() {
        let template = clinical_trial_template();
        let lines: Vec<&str> = template.lines().collect();
        let position = |prefix: &str| lines.iter().position(|l| l.starts_with(prefix));

        let info_lines: Vec<&&str> = lines
            .iter()
            .filter(|l| crate::parsing::grammar::trial_info_index(l).is_some())
            .collect();
        assert_eq!(info_lines, vec![&"Trial1-Info:NCT#:Trial Name:#ofPatients"]);

        let info = position("Trial1-Info:").unwrap();
        let first_question = position("1.").unwrap();
        let groups = position("Group1:").unwrap();
        let group_answers = position("GroupX-1.").unwrap();
        assert!(info < first_question);
        assert!(first_question < groups);
        assert!(groups < group_answers);
        assert!(!template.contains("How many clinical trials"));
    }

    #[test]
    fn test_build_prompt_numbers_trials() {
        let records = vec![
            TrialRecord {
                title: "First".to_string(),
                abstract_text: "Alpha".to_string(),
                url: "u1".to_string(),
            },
            TrialRecord {
                title: "Second".to_string(),
                abstract_text: "Beta".to_string(),
                url: "u2".to_string(),
            },
        ];
        let prompt = build_prompt(&records);
        assert!(prompt.ends_with(
            "Analyze the following clinical trials:\n\n\
             Trial 1:\nHeadline: First\nBody: Alpha\n\n\
             Trial 2:\nHeadline: Second\nBody: Beta"
        ));
    }
}
