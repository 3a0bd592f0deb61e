//! Tabular Formatter: renders a `ParsedResultSet` as one sectioned CSV document.
//!
//! Layout: "Trial Identification", "Trial Questions", then one
//! "Group Questions (Trial K)" section per trial. Each section is a title row,
//! a header row and its data rows, all of the section's width. Sections are
//! separated by a blank line. Values are quoted when they contain the delimiter,
//! quotes or line breaks.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::export::ExportError;
use crate::parsing::models::ParsedResultSet;
use crate::parsing::questions::{GroupQuestion, TrialQuestion};

pub const TRIAL_IDENTIFICATION_TITLE: &str = "Trial Identification";
pub const TRIAL_QUESTIONS_TITLE: &str = "Trial Questions";

const IDENTITY_COLUMNS: [&str; 4] = ["trial_number", "registry_id", "name", "patient_count"];
const GROUP_DEFINITION_COLUMNS: [&str; 4] = ["group_number", "group_type", "drug", "description"];

struct Section {
    title: String,
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

/// Renders the full document.
pub fn format_csv(set: &ParsedResultSet) -> Result<String, ExportError> {
    let mut sections = vec![identity_section(set), trial_questions_section(set)];
    sections.extend(
        set.groups
            .keys()
            .map(|&trial_number| group_section(set, trial_number)),
    );

    let rendered = sections
        .iter()
        .map(render_section)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join("\n"))
}

pub fn group_section_title(trial_number: u32) -> String {
    format!("Group Questions (Trial {trial_number})")
}

fn identity_section(set: &ParsedResultSet) -> Section {
    Section {
        title: TRIAL_IDENTIFICATION_TITLE.to_string(),
        header: IDENTITY_COLUMNS.to_vec(),
        rows: set
            .identities
            .iter()
            .map(|i| {
                vec![
                    i.trial_number.to_string(),
                    i.registry_id.clone(),
                    i.name.clone(),
                    i.patient_count.clone(),
                ]
            })
            .collect(),
    }
}

fn trial_questions_section(set: &ParsedResultSet) -> Section {
    let mut header = vec!["trial_number", "registry_id"];
    header.extend(TrialQuestion::ALL.iter().map(|q| q.key()));

    Section {
        title: TRIAL_QUESTIONS_TITLE.to_string(),
        header,
        rows: set
            .trial_answers
            .iter()
            .map(|a| {
                let mut row = vec![a.trial_number.to_string(), a.registry_id.clone()];
                row.extend(TrialQuestion::ALL.iter().map(|q| a.get(*q).to_string()));
                row
            })
            .collect(),
    }
}

fn group_section(set: &ParsedResultSet, trial_number: u32) -> Section {
    let mut header = GROUP_DEFINITION_COLUMNS.to_vec();
    header.extend(GroupQuestion::ALL.iter().map(|q| q.key()));

    Section {
        title: group_section_title(trial_number),
        header,
        rows: set
            .groups_for(trial_number)
            .iter()
            .map(|record| {
                let d = &record.definition;
                let mut row = vec![
                    d.group_number.to_string(),
                    d.group_type.clone(),
                    d.drug.clone(),
                    d.description.clone(),
                ];
                row.extend(
                    GroupQuestion::ALL
                        .iter()
                        .map(|q| record.answers.get(*q).to_string()),
                );
                row
            })
            .collect(),
    }
}

fn render_section(section: &Section) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .flexible(false)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut title_row = vec![String::new(); section.header.len()];
    title_row[0] = section.title.clone();
    writer.write_record(&title_row)?;
    writer.write_record(&section.header)?;
    for row in &section.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}
