use serde::Deserialize;
use std::collections::BTreeMap;

/// Cumulative prior-report count per job name. Jobs never reported are
/// absent keys, not zero values.
pub type FailureCountMap = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub run_id: u64,
    pub run_url: String,
    pub commit_sha: String,
}

impl RunContext {
    pub fn short_sha(&self) -> String {
        self.commit_sha.chars().take(7).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub name: String,
    pub url: String,
    pub logs: String,
}

/// A job suppressed from full reporting because it already hit the skip
/// threshold. Keeps its last-seen logs for traceability but renders as a
/// name/link only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedJob {
    pub name: String,
    pub url: String,
    pub logs: String,
}

impl From<JobFailure> for SkippedJob {
    fn from(job: JobFailure) -> Self {
        Self {
            name: job.name,
            url: job.url,
            logs: job.logs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalComment {
    pub body: String,
    pub user: CommentUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentUser {
    #[serde(rename = "type")]
    pub user_type: String,
}

impl CommentUser {
    pub fn is_bot(&self) -> bool {
        self.user_type.eq_ignore_ascii_case("bot")
    }
}
