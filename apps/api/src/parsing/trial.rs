//! Trial Record Extractor: identity line plus the keyword-matched trial questions.

use crate::parsing::grammar::{first_line_with_prefix, paired_captures, trial_info_index, QaPair};
use crate::parsing::models::{or_na, TrialAnswers, TrialIdentity};
use crate::parsing::questions::TrialQuestion;

/// The generator always labels the identity line of the trial it is answering as
/// `Trial1-Info`, whatever the trial's position in the batch.
const INFO_PREFIX: &str = "Trial1-Info:";

/// Trial-level question tokens are the bare integers 1–9.
const TRIAL_TOKENS: std::ops::RangeInclusive<u32> = 1..=9;

/// Extracts the identity and trial-level answers from one trial sub-block.
pub fn extract_trial(block: &str, trial_number: u32) -> (TrialIdentity, TrialAnswers) {
    let identity = extract_identity(block, trial_number);
    let answers = extract_answers(block, trial_number, &identity.registry_id);
    (identity, answers)
}

/// Reads the `Trial1-Info:` line, falling back to the first `Trial<k>-Info:` line.
///
/// With three or more `:`-separated parts: first is the registry id, last is the
/// patient count, the middle is rejoined as the name. Anything shorter is all "NA".
pub fn extract_identity(block: &str, trial_number: u32) -> TrialIdentity {
    let lines: Vec<&str> = block.lines().collect();
    let info_line = first_line_with_prefix(&lines, INFO_PREFIX).or_else(|| {
        lines
            .iter()
            .copied()
            .map(str::trim_start)
            .find(|l| trial_info_index(l).is_some())
    });

    let Some(line) = info_line else {
        return TrialIdentity::unknown(trial_number);
    };
    let Some((_, fields)) = line.split_once(':') else {
        return TrialIdentity::unknown(trial_number);
    };

    let parts: Vec<&str> = fields.split(':').collect();
    if parts.len() < 3 {
        return TrialIdentity::unknown(trial_number);
    }

    let last = parts.len() - 1;
    TrialIdentity {
        trial_number,
        registry_id: or_na(parts[0]),
        name: or_na(&parts[1..last].join(":")),
        patient_count: or_na(parts[last]),
    }
}

/// Assigns each question/answer pair to the first unfilled field whose keyword
/// appears in the restated question. Only tokens 1–9 are considered.
pub fn extract_answers(block: &str, trial_number: u32, registry_id: &str) -> TrialAnswers {
    let mut answers = TrialAnswers::new(trial_number, registry_id);

    for pair in paired_captures(block).iter().filter(|p| is_trial_token(p)) {
        let target = TrialQuestion::candidates(&pair.question).find(|q| !answers.is_answered(*q));
        if let Some(question) = target {
            answers.answers.insert(question, or_na(&pair.answer));
        }
    }

    answers
}

fn is_trial_token(pair: &QaPair<'_>) -> bool {
    pair.token
        .parse::<u32>()
        .map(|n| TRIAL_TOKENS.contains(&n))
        .unwrap_or(false)
}
