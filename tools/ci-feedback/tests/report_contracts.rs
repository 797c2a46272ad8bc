use ci_feedback::failure_history::count_previous_failures;
use ci_feedback::report::{build_comment_body, partition_jobs, REPORT_MARKER, SKIP_THRESHOLD};
use ci_feedback::types::{CommentUser, FailureCountMap, HistoricalComment, JobFailure, RunContext};

fn run(run_id: u64) -> RunContext {
    RunContext {
        run_id,
        run_url: format!("https://ci.example.test/runs/{run_id}"),
        commit_sha: "4f2a9c81d7e6b035".to_string(),
    }
}

fn job(name: &str) -> JobFailure {
    JobFailure {
        name: name.to_string(),
        url: format!("https://ci.example.test/jobs/{name}"),
        logs: format!("checkout\nsetup\ncompile\nerror: {name} broke\nteardown\ncleanup\ndone"),
    }
}

fn bot_comment(body: &str) -> HistoricalComment {
    HistoricalComment {
        body: body.to_string(),
        user: CommentUser {
            user_type: "Bot".to_string(),
        },
    }
}

#[test]
fn counter_recognizes_every_job_in_the_assemblers_own_output() {
    let failures = vec![job("build"), job("test"), job("lint")];
    let body = build_comment_body(&run(1), &failures, &[], &FailureCountMap::new());

    let counts = count_previous_failures(&[bot_comment(&body)]);
    assert_eq!(counts.get("build"), Some(&1));
    assert_eq!(counts.get("test"), Some(&1));
    assert_eq!(counts.get("lint"), Some(&1));
    assert_eq!(counts.len(), 3);
}

#[test]
fn human_echo_of_a_report_body_is_not_counted() {
    let body = build_comment_body(&run(1), &[job("build")], &[], &FailureCountMap::new());
    let echo = HistoricalComment {
        body,
        user: CommentUser {
            user_type: "User".to_string(),
        },
    };
    assert!(count_previous_failures(&[echo]).is_empty());
}

#[test]
fn repeatedly_failing_job_is_suppressed_on_the_fourth_run() {
    // Simulate a PR where "flaky" fails on every run and each report is
    // posted back as a bot comment.
    let mut history: Vec<HistoricalComment> = Vec::new();
    let mut last_body = String::new();
    for run_id in 1..=4 {
        let counts = count_previous_failures(&history);
        let (failures, skipped) = partition_jobs(vec![job("flaky")], &counts);
        last_body = build_comment_body(&run(run_id), &failures, &skipped, &counts);
        assert!(last_body.contains(REPORT_MARKER));
        history.push(bot_comment(&last_body));
    }

    // Runs 1-3 report in full; by run 4 the prior count reached the
    // threshold and the job moves to the skip list.
    assert!(last_body.contains("failed 3 or more times"));
    assert!(!last_body.contains("error: flaky broke"));

    // The skipped run posted no job heading, so the count stays at the
    // threshold instead of growing forever.
    let final_counts = count_previous_failures(&history);
    assert_eq!(final_counts.get("flaky"), Some(&SKIP_THRESHOLD));
}

#[test]
fn excerpt_in_the_body_carries_context_around_the_error_line() {
    let body = build_comment_body(&run(9), &[job("build")], &[], &FailureCountMap::new());
    assert!(body.contains("setup\ncompile\nerror: build broke\nteardown\ncleanup"));
    assert!(!body.contains("checkout\nsetup"));
}

#[test]
fn empty_failure_list_still_produces_a_marked_body() {
    let body = build_comment_body(&run(5), &[], &[], &FailureCountMap::new());
    assert!(body.starts_with(REPORT_MARKER));
    assert!(body.contains("#5"));
    assert!(body.contains("`4f2a9c8`"));
}
