//! Line grammar: prefix recognition over loosely formatted generated text.
//!
//! Recognised shapes: `<n>.` / `<n>A.`, `Trial<k>-Info:`, `Group<k>:`,
//! `Group<k>-<i>.` / `Group<k>-<i>A.`. Everything here is total: malformed input
//! yields "no match", never an error.

/// Section headings echoed by the generator. They end any open question/answer span.
pub const SECTION_HEADINGS: &[&str] = &[
    "Trial Identification",
    "Trial Questions",
    "Study Groups",
    "Group Questions",
];

/// A question restated on a `token.` line and answered on the following `tokenA.` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair<'a> {
    pub token: &'a str,
    pub question: String,
    pub answer: String,
}

/// Splits a line into its leading token, the separator after it (`.` or `:`),
/// and the remaining text.
///
/// A token is a run of ASCII alphanumerics and hyphens containing at least one digit.
/// A purely numeric token whose `.` is followed by a digit is a decimal
/// (`12.5 months`), not a prefix.
pub fn leading_token(line: &str) -> Option<(&str, char, &str)> {
    let line = line.trim_start();
    let end = line.find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))?;
    let (token, rest) = line.split_at(end);
    if token.is_empty() || !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut chars = rest.chars();
    let sep = chars.next()?;
    let rest = chars.as_str();
    match sep {
        '.' if token.bytes().all(|b| b.is_ascii_digit())
            && rest.starts_with(|c: char| c.is_ascii_digit()) =>
        {
            None
        }
        '.' | ':' => Some((token, sep, rest)),
        _ => None,
    }
}

/// True when `line` starts a new prefixed unit.
pub fn is_boundary(line: &str) -> bool {
    if leading_token(line).is_some() {
        return true;
    }
    let trimmed = line.trim_start();
    SECTION_HEADINGS.iter().any(|h| trimmed.starts_with(h))
}

/// Returns the first line starting with `prefix` (leading whitespace ignored).
pub fn first_line_with_prefix<'a>(lines: &[&'a str], prefix: &str) -> Option<&'a str> {
    lines
        .iter()
        .copied()
        .map(str::trim_start)
        .find(|l| l.starts_with(prefix))
}

/// Returns `Some(k)` when `line` is a `Trial<k>-Info:` line.
pub fn trial_info_index(line: &str) -> Option<u32> {
    let (token, sep, _) = leading_token(line)?;
    if sep != ':' {
        return None;
    }
    token
        .strip_prefix("Trial")?
        .strip_suffix("-Info")?
        .parse()
        .ok()
}

/// Returns `Some(n)` when `label` is exactly `Group<n>`.
pub fn group_label_number(label: &str) -> Option<u32> {
    let digits = label.trim().strip_prefix("Group")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Returns `(group, index)` for a `Group<n>-<i>` question token.
pub fn group_question_token(token: &str) -> Option<(u32, usize)> {
    let (group, index) = token.strip_prefix("Group")?.split_once('-')?;
    if group.is_empty()
        || index.is_empty()
        || !group.bytes().all(|b| b.is_ascii_digit())
        || !index.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some((group.parse().ok()?, index.parse().ok()?))
}

/// Extracts every `token.` / `tokenA.` pair from `text`, in order of appearance.
///
/// The question runs from its `token.` line up to the next boundary line; that
/// boundary must be the matching `tokenA.` line or the question is dropped. The
/// answer runs to the following boundary or end of text. Both are trimmed.
pub fn paired_captures(text: &str) -> Vec<QaPair<'_>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some((token, '.', first)) = leading_token(lines[i]) else {
            i += 1;
            continue;
        };

        let question_end = next_boundary(&lines, i + 1);
        let answer = lines.get(question_end).and_then(|line| match leading_token(line) {
            Some((answer_token, '.', rest)) if answer_token.strip_suffix('A') == Some(token) => {
                Some(rest)
            }
            _ => None,
        });

        match answer {
            Some(answer_first) => {
                let answer_end = next_boundary(&lines, question_end + 1);
                pairs.push(QaPair {
                    token,
                    question: span_text(first, &lines[i + 1..question_end]),
                    answer: span_text(answer_first, &lines[question_end + 1..answer_end]),
                });
                i = answer_end;
            }
            None => i = question_end,
        }
    }

    pairs
}

fn next_boundary(lines: &[&str], from: usize) -> usize {
    (from..lines.len())
        .find(|&j| is_boundary(lines[j]))
        .unwrap_or(lines.len())
}

fn span_text(first: &str, continuation: &[&str]) -> String {
    let mut text = first.to_string();
    for line in continuation {
        text.push('\n');
        text.push_str(line);
    }
    text.trim().to_string()
}
