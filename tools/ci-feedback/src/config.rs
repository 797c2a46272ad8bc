use crate::errors::CiFeedbackError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Description of one CI run, written by the workflow step that gathers
/// job results. Points at local files only; fetching logs and comment
/// history from the forge is the workflow's job, not this tool's.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RunManifest {
    pub run_id: u64,
    pub run_url: String,
    pub commit_sha: String,
    /// JSON array of prior PR comments, GitHub API shape. Absent on the
    /// first failing run of a PR.
    pub comments_file: Option<PathBuf>,
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JobEntry {
    pub name: String,
    pub url: String,
    pub log_file: PathBuf,
}

pub fn load_manifest(path: &Path) -> Result<RunManifest, CiFeedbackError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CiFeedbackError::Io(format!("read manifest {}: {e}", path.display()))
    })?;
    let manifest: RunManifest =
        toml::from_str(&text).map_err(|e| CiFeedbackError::ManifestParse(e.to_string()))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

fn validate_manifest(manifest: &RunManifest) -> Result<(), CiFeedbackError> {
    if manifest.run_id == 0 {
        return Err(CiFeedbackError::InvalidManifest(
            "run_id must be positive".to_string(),
        ));
    }
    if manifest.commit_sha.trim().is_empty() {
        return Err(CiFeedbackError::InvalidManifest(
            "commit_sha must not be empty".to_string(),
        ));
    }
    let mut seen = BTreeSet::new();
    for job in &manifest.jobs {
        if job.name.trim().is_empty() {
            return Err(CiFeedbackError::InvalidManifest(
                "job name must not be empty".to_string(),
            ));
        }
        if !seen.insert(job.name.as_str()) {
            return Err(CiFeedbackError::InvalidManifest(format!(
                "duplicate job name: {}",
                job.name
            )));
        }
    }
    Ok(())
}
