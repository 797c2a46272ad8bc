use crate::ansi::strip_ansi_codes;

/// Substrings that mark a log line as a failure indicator. Matched
/// case-insensitively against each line.
pub const FAILURE_INDICATORS: [&str; 5] = ["error", "failed", "failure", "exception", "panic"];

/// Context lines kept on each side of a matching line.
pub const CONTEXT_BEFORE: usize = 2;
pub const CONTEXT_AFTER: usize = 2;

/// Hard cap on excerpt length; keeps comment bodies bounded for
/// arbitrarily large logs.
pub const MAX_EXCERPT_LINES: usize = 50;

/// Tail length returned when no line matches any indicator.
pub const FALLBACK_TAIL_LINES: usize = 30;

/// Extract the most relevant failure excerpt from raw CI log output.
///
/// ANSI sequences are stripped first. Every line containing a failure
/// indicator contributes itself plus two lines of context on each side;
/// overlapping windows merge, original order is preserved. With no match
/// at all the last [`FALLBACK_TAIL_LINES`] lines are returned instead.
/// Either way the result is capped at the earliest [`MAX_EXCERPT_LINES`]
/// lines of the computed set.
pub fn extract_error_lines(raw_logs: &str) -> String {
    let clean = strip_ansi_codes(raw_logs);
    let lines: Vec<&str> = clean.split('\n').collect();

    let mut include = vec![false; lines.len()];
    let mut matched_any = false;
    for (i, line) in lines.iter().enumerate() {
        if !line_indicates_failure(line) {
            continue;
        }
        matched_any = true;
        let start = i.saturating_sub(CONTEXT_BEFORE);
        let end = (i + CONTEXT_AFTER).min(lines.len().saturating_sub(1));
        for flag in include.iter_mut().take(end + 1).skip(start) {
            *flag = true;
        }
    }

    let selected: Vec<&str> = if matched_any {
        lines
            .iter()
            .zip(include.iter())
            .filter(|(_, keep)| **keep)
            .map(|(line, _)| *line)
            .collect()
    } else {
        let skip = lines.len().saturating_sub(FALLBACK_TAIL_LINES);
        lines.iter().skip(skip).copied().collect()
    };

    selected
        .iter()
        .take(MAX_EXCERPT_LINES)
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

fn line_indicates_failure(line: &str) -> bool {
    let lowered = line.to_ascii_lowercase();
    FAILURE_INDICATORS
        .iter()
        .any(|indicator| lowered.contains(indicator))
}
