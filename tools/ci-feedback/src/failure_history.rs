use crate::report::{JOB_HEADING_PREFIX, REPORT_MARKER};
use crate::types::{FailureCountMap, HistoricalComment};

/// Fold the full PR comment history into per-job cumulative failure counts.
///
/// Only comments authored by a bot identity AND carrying the hidden
/// [`REPORT_MARKER`] qualify; everything else is ignored, including
/// human-written text that happens to look like a report. Counts accumulate
/// across every qualifying comment, so the map reflects the PR's whole
/// lifetime. A marked comment with no parseable job headings contributes
/// nothing, which is valid.
pub fn count_previous_failures(comments: &[HistoricalComment]) -> FailureCountMap {
    let mut counts = FailureCountMap::new();
    for comment in comments {
        if !comment.user.is_bot() || !comment.body.contains(REPORT_MARKER) {
            continue;
        }
        for name in job_names_in_body(&comment.body) {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    counts
}

fn job_names_in_body(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.strip_prefix(JOB_HEADING_PREFIX))
        .filter_map(|rest| rest.split('`').next())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::count_previous_failures;
    use crate::report::{JOB_HEADING_PREFIX, REPORT_MARKER};
    use crate::types::{CommentUser, HistoricalComment};

    fn comment(user_type: &str, body: &str) -> HistoricalComment {
        HistoricalComment {
            body: body.to_string(),
            user: CommentUser {
                user_type: user_type.to_string(),
            },
        }
    }

    fn report_body(jobs: &[&str]) -> String {
        let mut body = format!("{REPORT_MARKER}\n\n## CI failed\n");
        for job in jobs {
            body.push_str(&format!("{JOB_HEADING_PREFIX}{job}`\n\nlogs here\n"));
        }
        body
    }

    #[test]
    fn empty_history_yields_empty_map() {
        assert!(count_previous_failures(&[]).is_empty());
    }

    #[test]
    fn counts_accumulate_across_all_qualifying_comments() {
        let comments = vec![
            comment("Bot", &report_body(&["build"])),
            comment("Bot", &report_body(&["build", "test"])),
        ];
        let counts = count_previous_failures(&comments);
        assert_eq!(counts.get("build"), Some(&2));
        assert_eq!(counts.get("test"), Some(&1));
    }

    #[test]
    fn unmentioned_jobs_are_absent_not_zero() {
        let counts = count_previous_failures(&[comment("Bot", &report_body(&["build"]))]);
        assert_eq!(counts.get("deploy"), None);
    }

    #[test]
    fn comment_without_marker_is_ignored_even_with_job_headings() {
        let mut body = report_body(&["build"]);
        body = body.replace(REPORT_MARKER, "");
        let counts = count_previous_failures(&[comment("Bot", &body)]);
        assert!(counts.is_empty());
    }

    #[test]
    fn non_bot_comment_is_ignored_even_with_marker() {
        let counts = count_previous_failures(&[comment("User", &report_body(&["build"]))]);
        assert!(counts.is_empty());
    }

    #[test]
    fn marked_comment_with_malformed_headings_contributes_nothing() {
        let body = format!("{REPORT_MARKER}\n\n### Job build went wrong\n");
        let counts = count_previous_failures(&[comment("Bot", &body)]);
        assert!(counts.is_empty());
    }
}
