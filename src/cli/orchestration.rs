//! Main refresh workflow orchestration logic
//!
//! Splits a refresh into planning, where every new file content is computed
//! in memory, and applying, where the results are written. The binary shows
//! the plan (and asks for confirmation on ambiguous history) in between.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::boundary::BoundaryWarning;
use crate::changelog::{ChangeEntryRenderer, ChangelogRecordParser, CommitDiffer};
use crate::clock::Clock;
use crate::domain::{extract_upstream_version, CommitRecord, PackageVersion, PackagingState};
use crate::error::Result;
use crate::files;
use crate::spec_file;
use crate::tarball::{self, TarballProvider};

/// Where the upstream tarball comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TarballSource {
    /// Already on disk
    Local(PathBuf),
    /// Downloaded into the package directory first
    Remote(String),
}

/// Arguments for the refresh workflow
///
/// Mirrors the CLI Args after config defaults have been applied, so the
/// workflow can be called programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshWorkflowArgs {
    /// Package directory; downloads land here
    pub dir: PathBuf,

    pub spec_path: PathBuf,

    pub changes_path: PathBuf,

    pub tarball: TarballSource,

    /// Email written into the changes entry
    pub author_email: String,

    /// Pattern extracting the upstream version from the tarball directory
    pub version_regex: String,
}

/// Everything a refresh will write, computed up front
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshPlan {
    pub spec_path: PathBuf,
    pub changes_path: PathBuf,
    pub state: PackagingState,
    pub previous_version: String,
    pub new_version: PackageVersion,
    /// Commits newer than the packaged one, newest first
    pub new_commits: Vec<CommitRecord>,
    pub spec_text: String,
    pub changes_entry: Option<String>,
    /// Full changes-file text with the entry prepended
    pub changes_text: Option<String>,
    pub warnings: Vec<BoundaryWarning>,
}

impl RefreshPlan {
    /// Whether every ChangeLog commit got listed because the packaged commit was missing.
    pub fn is_ambiguous(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, BoundaryWarning::PackagedCommitNotFound { .. }))
    }
}

/// Result of a successful refresh
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The version written into the spec
    pub version: String,

    pub spec_path: PathBuf,

    /// Whether a changes entry was prepended
    pub changes_written: bool,
}

/// Resolve the tarball to a local path, downloading it if needed.
pub fn fetch_tarball(source: &TarballSource, dir: &Path) -> Result<PathBuf> {
    match source {
        TarballSource::Local(path) => Ok(path.clone()),
        TarballSource::Remote(url) => tarball::download(url, dir),
    }
}

/// Parse the ChangeLog, downgrading "no commits at all" to `None`.
fn parse_changelog(text: &str, warnings: &mut Vec<BoundaryWarning>) -> Result<Option<Vec<CommitRecord>>> {
    match ChangelogRecordParser::parse_report(text) {
        Ok(parsed) => {
            if let Some(first) = parsed.skipped.first() {
                warn!("skipped {} malformed ChangeLog records", parsed.skipped.len());
                warnings.push(BoundaryWarning::MalformedRecordsSkipped {
                    count: parsed.skipped.len(),
                    first_commit: first.commit.clone(),
                });
            }
            Ok(Some(parsed.records))
        }
        Err(e) if e.is_recoverable() => {
            warn!("no change list available: {}", e);
            warnings.push(BoundaryWarning::ChangelogUnavailable {
                reason: e.to_string(),
            });
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Select the commits that go into the changes entry.
fn select_new_commits(
    state: &PackagingState,
    records: Option<&[CommitRecord]>,
    warnings: &mut Vec<BoundaryWarning>,
) -> Vec<CommitRecord> {
    let (prefix, records) = match (state, records) {
        (PackagingState::FirstRun, _) => {
            warnings.push(BoundaryWarning::FirstRun);
            return Vec::new();
        }
        (PackagingState::Incremental { .. }, None) => return Vec::new(),
        (PackagingState::Incremental { commit_prefix }, Some(records)) => (commit_prefix, records),
    };

    // Nothing to search when every block was malformed.
    if !records.is_empty() && CommitDiffer::find(records, prefix).is_none() {
        warnings.push(BoundaryWarning::PackagedCommitNotFound {
            packaged_commit: prefix.clone(),
        });
    }

    let new_commits = CommitDiffer::diff(records, prefix);
    if new_commits.is_empty() {
        warnings.push(BoundaryWarning::NoNewCommits {
            packaged_commit: prefix.clone(),
        });
    }
    new_commits
}

/// Compute the refresh without writing the spec or changes file.
///
/// # Arguments
///
/// * `args` - Workflow arguments
/// * `provider` - Reads the tarball's directory name and ChangeLog
/// * `clock` - Supplies the version epoch and the entry timestamp
pub fn plan_refresh<P: TarballProvider, C: Clock>(
    args: &RefreshWorkflowArgs,
    provider: &P,
    clock: &C,
) -> Result<RefreshPlan> {
    let spec = std::fs::read_to_string(&args.spec_path)?;
    let state = spec_file::read_packaging_state(&spec)?;
    let previous_version = spec_file::version_field(&spec)?;
    debug!("packaging state: {:?}", state);

    let archive = fetch_tarball(&args.tarball, &args.dir)?;
    let contents = provider.open(&archive)?;
    let upstream = extract_upstream_version(&args.version_regex, &contents.top_level_dir)?;
    info!(
        "upstream version {} from {}",
        upstream, contents.top_level_dir
    );

    let mut warnings = Vec::new();
    let records = parse_changelog(&contents.changelog_text(), &mut warnings)?;

    let now = clock.now();
    let newest = records
        .as_deref()
        .and_then(|r| r.first())
        .map(|record| record.commit.as_str())
        .or_else(|| state.commit_prefix());
    let new_version = PackageVersion::new(upstream, now.timestamp(), newest);

    let spec_text = spec_file::update_spec(&spec, &new_version, &contents.top_level_dir)?;

    let new_commits = select_new_commits(&state, records.as_deref(), &mut warnings);
    let changes_entry = ChangeEntryRenderer::render(
        &new_commits,
        &new_version.to_string(),
        &args.author_email,
        now,
    );
    let changes_text = match &changes_entry {
        Some(entry) => Some(files::prepend_entry(
            &files::read_or_empty(&args.changes_path)?,
            entry,
        )),
        None => None,
    };

    Ok(RefreshPlan {
        spec_path: args.spec_path.clone(),
        changes_path: args.changes_path.clone(),
        state,
        previous_version,
        new_version,
        new_commits,
        spec_text,
        changes_entry,
        changes_text,
        warnings,
    })
}

/// Write a plan's spec and changes text.
pub fn apply_plan(plan: &RefreshPlan) -> Result<WorkflowResult> {
    files::write_atomic(&plan.spec_path, &plan.spec_text)?;
    if let Some(changes) = &plan.changes_text {
        files::write_atomic(&plan.changes_path, changes)?;
    }
    info!("refreshed {} to {}", plan.spec_path.display(), plan.new_version);

    Ok(WorkflowResult {
        version: plan.new_version.to_string(),
        spec_path: plan.spec_path.clone(),
        changes_written: plan.changes_text.is_some(),
    })
}

/// Plan and apply a refresh in one go.
pub fn run_refresh_workflow<P: TarballProvider, C: Clock>(
    args: &RefreshWorkflowArgs,
    provider: &P,
    clock: &C,
) -> Result<WorkflowResult> {
    let plan = plan_refresh(args, provider, clock)?;
    apply_plan(&plan)
}
