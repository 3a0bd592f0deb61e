//! Response Parser: turns raw generated responses into a `ParsedResultSet`.
//!
//! Flow: split each response into trial sub-blocks → number them in order →
//! extract trial + group records per sub-block → strip template echoes →
//! drop degenerate trials → renumber survivors from 1.
//!
//! Pure and synchronous: no I/O, no shared state, never fails.

use tracing::debug;

use crate::parsing::cleanup::{strip_template_echo, DegenerateFilter};
use crate::parsing::grammar::trial_info_index;
use crate::parsing::groups::{candidate_lines, extract_groups};
use crate::parsing::models::{GroupRecord, ParsedResultSet, TrialAnswers, TrialIdentity};
use crate::parsing::trial::extract_trial;

/// Records extracted from one sub-block, before cleanup.
struct ExtractedTrial {
    identity: TrialIdentity,
    answers: TrialAnswers,
    groups: Vec<GroupRecord>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser {
    filter: DegenerateFilter,
}

impl ResponseParser {
    pub fn new(filter: DegenerateFilter) -> Self {
        Self { filter }
    }

    /// Parses every response, in order, into one result set.
    ///
    /// Trial numbers are assigned across all responses by order of appearance;
    /// `TrialK-Info` labels are response-local and never used for numbering.
    pub fn parse<S: AsRef<str>>(&self, responses: &[S]) -> ParsedResultSet {
        let sub_blocks: Vec<String> = responses
            .iter()
            .flat_map(|r| split_trial_blocks(r.as_ref()))
            .collect();
        debug!(
            "Split {} response(s) into {} trial sub-block(s)",
            responses.len(),
            sub_blocks.len()
        );

        let extracted = sub_blocks
            .iter()
            .zip(1u32..)
            .map(|(block, trial_number)| extract_sub_block(block, trial_number));

        self.assemble(extracted)
    }

    /// Drops degenerate trials and renumbers the survivors contiguously.
    ///
    /// A degenerate identity takes its trial answers with it. The trial itself
    /// survives only if it still defines at least one group.
    fn assemble(&self, extracted: impl Iterator<Item = ExtractedTrial>) -> ParsedResultSet {
        let mut set = ParsedResultSet::default();
        let mut next_number = 1u32;

        for trial in extracted {
            let keep_identity = !self.filter.is_degenerate(&trial.identity);
            if !keep_identity && trial.groups.is_empty() {
                debug!(
                    "Discarding degenerate trial at position {}",
                    trial.identity.trial_number
                );
                continue;
            }

            let trial_number = next_number;
            next_number += 1;

            if keep_identity {
                let ExtractedTrial {
                    mut identity,
                    mut answers,
                    ..
                } = trial;
                identity.trial_number = trial_number;
                answers.trial_number = trial_number;
                set.identities.push(identity);
                set.trial_answers.push(answers);
                set.groups.insert(trial_number, trial.groups);
            } else {
                debug!(
                    "Trial at position {} has no usable identity; keeping its {} group(s)",
                    trial.identity.trial_number,
                    trial.groups.len()
                );
                set.groups.insert(trial_number, trial.groups);
            }
        }

        set
    }
}

/// Parses `responses` with the given degenerate-record policy.
pub fn parse_responses<S: AsRef<str>>(responses: &[S], filter: DegenerateFilter) -> ParsedResultSet {
    ResponseParser::new(filter).parse(responses)
}

fn extract_sub_block(block: &str, trial_number: u32) -> ExtractedTrial {
    let (identity, answers) = extract_trial(block, trial_number);

    let candidates = candidate_lines(block);
    let definitions = strip_template_echo(&candidates);
    if definitions.len() < candidates.len() {
        debug!(
            "Removed {} template echo line(s) from trial {}",
            candidates.len() - definitions.len(),
            trial_number
        );
    }
    let groups = extract_groups(block, &definitions);

    ExtractedTrial {
        identity,
        answers,
        groups,
    }
}

/// Splits one response into per-trial sub-blocks at every `TrialK-Info:` line.
///
/// Text before the first info line belongs to the first sub-block. A run of info
/// lines separated only by blank lines, with strictly increasing `K`, is a roster:
/// each entry becomes its own identity-only sub-block, except the first, which
/// also takes the text that follows the run. Repeated labels (every trial headed
/// `Trial1-Info:`) always split. A response without any info line is a single
/// sub-block.
pub fn split_trial_blocks(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let info: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| trial_info_index(l).is_some())
        .map(|(i, _)| i)
        .collect();

    if info.is_empty() {
        return vec![text.to_string()];
    }

    let mut blocks = Vec::with_capacity(info.len());
    let mut k = 0;

    while k < info.len() {
        let mut run_end = k;
        while run_end + 1 < info.len()
            && lines[info[run_end] + 1..info[run_end + 1]]
                .iter()
                .all(|l| l.trim().is_empty())
            && trial_info_index(lines[info[run_end + 1]])
                > trial_info_index(lines[info[run_end]])
        {
            run_end += 1;
        }

        let start = if k == 0 { 0 } else { info[k] };
        let end = info.get(run_end + 1).copied().unwrap_or(lines.len());

        let mut first: Vec<&str> = lines[start..=info[k]].to_vec();
        first.extend_from_slice(&lines[info[run_end] + 1..end]);
        blocks.push(first.join("\n"));

        for &idx in &info[k + 1..=run_end] {
            blocks.push(lines[idx].to_string());
        }

        k = run_end + 1;
    }

    blocks
}
