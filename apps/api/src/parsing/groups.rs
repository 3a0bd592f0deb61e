//! Group Record Extractor: treatment-arm definitions and their indexed answers.

use crate::parsing::grammar::{group_label_number, group_question_token, paired_captures};
use crate::parsing::models::{or_na, GroupAnswers, GroupDefinition, GroupRecord, NA};
use crate::parsing::questions::GroupQuestion;

/// Lines that may define a group: they start with `Group` and contain a `:`.
///
/// This is deliberately loose; the template-echo cleanup runs over this list
/// before any definition is parsed from it.
pub fn candidate_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("Group") && l.contains(':'))
        .collect()
}

/// Parses `GroupN:<type>:<drug>:<description...>`.
///
/// Returns `None` unless the label is exactly `Group<N>`. With fewer than three
/// parts every field except the number is "NA".
pub fn parse_definition(line: &str) -> Option<GroupDefinition> {
    let parts: Vec<&str> = line.split(':').collect();
    let group_number = group_label_number(parts[0])?;

    if parts.len() < 3 {
        return Some(GroupDefinition {
            group_number,
            group_type: NA.to_string(),
            drug: NA.to_string(),
            description: NA.to_string(),
        });
    }

    Some(GroupDefinition {
        group_number,
        group_type: or_na(parts[1]),
        drug: or_na(parts[2]),
        description: or_na(&parts[3..].join(":")),
    })
}

/// Builds one `GroupRecord` per distinct group defined in `definition_lines`, then
/// fills each record from the `GroupN-<i>.` / `GroupN-<i>A.` pairs in `block`.
///
/// Answers addressed to undefined groups or to indices outside 1–24 are ignored.
pub fn extract_groups(block: &str, definition_lines: &[&str]) -> Vec<GroupRecord> {
    let mut records: Vec<GroupRecord> = Vec::new();

    for definition in definition_lines.iter().filter_map(|l| parse_definition(l)) {
        if records
            .iter()
            .any(|r| r.definition.group_number == definition.group_number)
        {
            continue;
        }
        records.push(GroupRecord {
            answers: GroupAnswers::new(definition.group_number),
            definition,
        });
    }

    if records.is_empty() {
        return records;
    }

    for pair in paired_captures(block) {
        let Some((group_number, index)) = group_question_token(pair.token) else {
            continue;
        };
        let Some(question) = GroupQuestion::from_index(index) else {
            continue;
        };
        let Some(record) = records
            .iter_mut()
            .find(|r| r.definition.group_number == group_number)
        else {
            continue;
        };
        if record.answers.get(question) == NA {
            record.answers.answers.insert(question, or_na(&pair.answer));
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(block: &str) -> Vec<GroupRecord> {
        let lines = candidate_lines(block);
        extract_groups(block, &lines)
    }

    #[test]
    fn test_single_group_with_answer() {
        let block = "Group1:Control:Placebo:None\nGroup1-1.Control or intervention\nGroup1-1A.Control\n";
        let groups = extract(block);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.definition.group_number, 1);
        assert_eq!(group.definition.group_type, "Control");
        assert_eq!(group.definition.drug, "Placebo");
        assert_eq!(group.definition.description, "None");
        assert_eq!(group.answers.group_number, 1);
        assert_eq!(
            group.answers.get(GroupQuestion::ControlOrIntervention),
            "Control"
        );
        assert_eq!(group.answers.get(GroupQuestion::DrugsStudied), NA);
    }

    #[test]
    fn test_description_keeps_remaining_colons() {
        let def = parse_definition("Group2:Intervention:Osimertinib:EGFR+: exon 19").unwrap();
        assert_eq!(def.description, "EGFR+: exon 19");
    }

    #[test]
    fn test_definition_without_description_is_na() {
        let def = parse_definition("Group3:Intervention:Drug X").unwrap();
        assert_eq!(def.group_number, 3);
        assert_eq!(def.drug, "Drug X");
        assert_eq!(def.description, NA);
    }

    #[test]
    fn test_short_definition_keeps_number_only() {
        let def = parse_definition("Group4:ControlGroup—Placebo—None").unwrap();
        assert_eq!(def.group_number, 4);
        assert_eq!(def.group_type, NA);
        assert_eq!(def.drug, NA);
        assert_eq!(def.description, NA);
    }

    #[test]
    fn test_question_lines_with_colons_are_not_definitions() {
        let block = "Group1:Control:Placebo:None\n\
                     Group1-24. Give in the format TTP:X, DoR:X\n\
                     Group1-24A. TTP:5 months, DoR:NA\n";
        let groups = extract(block);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].answers.get(GroupQuestion::OtherEfficacyData),
            "TTP:5 months, DoR:NA"
        );
    }

    #[test]
    fn test_numbering_follows_labels_not_position() {
        let block = "Group2:Intervention:Drug A:Arm A\nGroup5:Intervention:Drug B:Arm B\n\
                     Group5-7.Met endpoints?\nGroup5-7A.Yes\n";
        let groups = extract(block);
        let numbers: Vec<u32> = groups.iter().map(|g| g.definition.group_number).collect();
        assert_eq!(numbers, vec![2, 5]);
        assert_eq!(groups[1].answers.get(GroupQuestion::MetEndpoints), "Yes");
        assert_eq!(groups[0].answers.get(GroupQuestion::MetEndpoints), NA);
    }

    #[test]
    fn test_duplicate_group_keeps_first_definition() {
        let block = "Group1:Control:Placebo:None\nGroup1:Intervention:Drug:Other\n";
        let groups = extract(block);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].definition.group_type, "Control");
    }

    #[test]
    fn test_answers_for_undefined_groups_and_bad_indices_are_ignored() {
        let block = "Group1:Control:Placebo:None\n\
                     Group9-1.Control?\nGroup9-1A.Control\n\
                     Group1-25.Extra?\nGroup1-25A.Something\n\
                     Group1-0.Zero?\nGroup1-0A.Nothing\n";
        let groups = extract(block);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].answers.answers.values().all(|v| v == NA));
    }

    #[test]
    fn test_every_index_maps_to_its_field() {
        let mut block = String::from("Group1:Intervention:Drug:Desc\n");
        for i in 1..=GroupQuestion::COUNT {
            block.push_str(&format!("Group1-{i}.Question {i}\nGroup1-{i}A.Answer {i}\n"));
        }
        let groups = extract(&block);
        for (i, question) in GroupQuestion::ALL.iter().enumerate() {
            assert_eq!(groups[0].answers.get(*question), format!("Answer {}", i + 1));
        }
    }

    #[test]
    fn test_no_definitions_yields_no_groups() {
        assert!(extract("").is_empty());
        assert!(extract("Group1-1.Control?\nGroup1-1A.Control").is_empty());
        assert!(extract("Group Questions:").is_empty());
    }
}
