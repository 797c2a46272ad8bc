use crate::error_window::extract_error_lines;
use crate::types::{FailureCountMap, JobFailure, RunContext, SkippedJob};

/// Hidden marker identifying a comment as machine-generated by this
/// reporter. Must stay byte-identical to what the failure-history counter
/// searches for; it is the only wire-format contract in the pipeline.
pub const REPORT_MARKER: &str = "<!-- ci-feedback-report -->";

/// Per-job section heading prefix. A job heading is this prefix followed by
/// the job name and a closing backtick. The counter parses job names out of
/// prior comments with the same constant.
pub const JOB_HEADING_PREFIX: &str = "### \u{274c} Job: `";

/// Reviewer handle mentioned at the end of every report. Cosmetic; nothing
/// parses it.
pub const REVIEWER_MENTION: &str = "@ci-feedback-reviewer";

/// Prior-failure count at which a job stops receiving full log excerpts.
pub const SKIP_THRESHOLD: u32 = 3;

/// Split the current run's failed jobs into fully-reported failures and
/// suppressed jobs. A job that has already been reported [`SKIP_THRESHOLD`]
/// or more times moves to the skip list; input order is preserved on both
/// sides.
pub fn partition_jobs(
    jobs: Vec<JobFailure>,
    prior_counts: &FailureCountMap,
) -> (Vec<JobFailure>, Vec<SkippedJob>) {
    let mut failures = Vec::new();
    let mut skipped = Vec::new();
    for job in jobs {
        let prior = prior_counts.get(&job.name).copied().unwrap_or(0);
        if prior >= SKIP_THRESHOLD {
            skipped.push(SkippedJob::from(job));
        } else {
            failures.push(job);
        }
    }
    (failures, skipped)
}

/// Render the complete Markdown comment body for one CI run.
///
/// Deterministic for identical inputs: no timestamps, no randomness. The
/// leading [`REPORT_MARKER`] line and the [`JOB_HEADING_PREFIX`] headings
/// are what future invocations of the counter key on.
pub fn build_comment_body(
    run: &RunContext,
    failures: &[JobFailure],
    skipped: &[SkippedJob],
    prior_counts: &FailureCountMap,
) -> String {
    let mut body = String::new();
    body.push_str(REPORT_MARKER);
    body.push_str("\n\n");
    body.push_str(&format!(
        "## \u{1f6a8} CI failed for run #{} (`{}`)\n\n",
        run.run_id,
        run.short_sha()
    ));
    body.push_str(&format!("[View run]({})\n", run.run_url));

    for job in failures {
        let prior = prior_counts.get(&job.name).copied().unwrap_or(0);
        let ordinal = (prior + 1).min(SKIP_THRESHOLD);
        body.push('\n');
        body.push_str(&format!("{}{}`\n\n", JOB_HEADING_PREFIX, job.name));
        body.push_str(&format!(
            "[Job details]({}) \u{2014} **Failure #{}/{}**\n\n",
            job.url, ordinal, SKIP_THRESHOLD
        ));
        body.push_str("```\n");
        let excerpt = extract_error_lines(&job.logs);
        body.push_str(&excerpt);
        if !excerpt.ends_with('\n') {
            body.push('\n');
        }
        body.push_str("```\n");
    }

    if !skipped.is_empty() {
        body.push('\n');
        body.push_str(&format!(
            "> **Note:** the following jobs have failed {SKIP_THRESHOLD} or more times and are no longer reported in full:\n"
        ));
        for job in skipped {
            body.push_str(&format!("> - [`{}`]({})\n", job.name, job.url));
        }
    }

    body.push('\n');
    body.push_str(&format!(
        "cc {REVIEWER_MENTION} \u{2014} please take a look.\n"
    ));
    body
}
