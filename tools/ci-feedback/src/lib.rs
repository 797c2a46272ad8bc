pub mod ansi;
pub mod config;
pub mod error_window;
pub mod errors;
pub mod failure_history;
pub mod logging;
pub mod report;
pub mod types;

use clap::{error::ErrorKind, Parser};
use config::{load_manifest, RunManifest};
use errors::CiFeedbackError;
use failure_history::count_previous_failures;
use logging::append_run_log;
use report::{build_comment_body, partition_jobs};
use serde_json::json;
use std::path::{Path, PathBuf};
use types::{HistoricalComment, JobFailure, RunContext};

#[derive(Debug, Clone, Parser)]
#[command(name = "ci-feedback")]
#[command(about = "Build a CI failure report comment from run logs and PR comment history")]
pub struct Cli {
    /// TOML run manifest describing the failed run and its job logs.
    #[arg(long)]
    pub manifest: PathBuf,
    /// Override the manifest's comments file (JSON array of PR comments).
    #[arg(long)]
    pub comments: Option<PathBuf>,
    /// Write the report body here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run() -> Result<i32, CiFeedbackError> {
    let args = std::env::args_os().collect::<Vec<_>>();
    run_with_args(&args)
}

pub fn run_with_args(args: &[std::ffi::OsString]) -> Result<i32, CiFeedbackError> {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => match error.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{error}");
                return Ok(0);
            }
            _ => return Err(CiFeedbackError::Cli(error.to_string())),
        },
    };

    let body = build_report(&cli)?;
    match &cli.out {
        Some(path) => {
            std::fs::write(path, &body).map_err(|e| {
                CiFeedbackError::Io(format!("write report {}: {e}", path.display()))
            })?;
        }
        None => print!("{body}"),
    }
    Ok(0)
}

fn build_report(cli: &Cli) -> Result<String, CiFeedbackError> {
    let manifest = load_manifest(&cli.manifest)?;
    let manifest_dir = cli
        .manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    append_run_log(
        "info",
        "manifest.loaded",
        json!({
            "run_id": manifest.run_id,
            "job_count": manifest.jobs.len()
        }),
    );

    let comments = load_comments(cli, &manifest, &manifest_dir)?;
    let prior_counts = count_previous_failures(&comments);
    append_run_log(
        "info",
        "history.counted",
        json!({
            "comments": comments.len(),
            "jobs_with_history": prior_counts.len()
        }),
    );

    let jobs = read_job_logs(&manifest, &manifest_dir)?;
    let (failures, skipped) = partition_jobs(jobs, &prior_counts);
    let run = RunContext {
        run_id: manifest.run_id,
        run_url: manifest.run_url.clone(),
        commit_sha: manifest.commit_sha.clone(),
    };
    let body = build_comment_body(&run, &failures, &skipped, &prior_counts);
    append_run_log(
        "info",
        "report.built",
        json!({
            "run_id": manifest.run_id,
            "reported": failures.len(),
            "skipped": skipped.len(),
            "body_bytes": body.len()
        }),
    );
    Ok(body)
}

fn load_comments(
    cli: &Cli,
    manifest: &RunManifest,
    manifest_dir: &Path,
) -> Result<Vec<HistoricalComment>, CiFeedbackError> {
    let path = match (&cli.comments, &manifest.comments_file) {
        (Some(override_path), _) => override_path.clone(),
        (None, Some(manifest_path)) => resolve(manifest_dir, manifest_path),
        // First failing run of a PR: no history yet.
        (None, None) => return Ok(Vec::new()),
    };
    let text = std::fs::read_to_string(&path)
        .map_err(|e| CiFeedbackError::Io(format!("read comments {}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| CiFeedbackError::CommentsParse(e.to_string()))
}

fn read_job_logs(
    manifest: &RunManifest,
    manifest_dir: &Path,
) -> Result<Vec<JobFailure>, CiFeedbackError> {
    manifest
        .jobs
        .iter()
        .map(|job| {
            let path = resolve(manifest_dir, &job.log_file);
            let logs = std::fs::read_to_string(&path).map_err(|e| {
                CiFeedbackError::Io(format!("read job log {}: {e}", path.display()))
            })?;
            Ok(JobFailure {
                name: job.name.clone(),
                url: job.url.clone(),
                logs,
            })
        })
        .collect()
}

fn resolve(manifest_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        manifest_dir.join(path)
    }
}
