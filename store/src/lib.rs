//! Project-local metadata store for MLS provenance records.
//!
//! The store is the persistence collaborator of [`mls_schema`]: it decides
//! where a serialized record lands and whether writing should happen at
//! all. The layout under a metadata root is fixed:
//!
//! ```text
//! <root>/
//!   ml/
//!     latest/
//!       <identifier>.jsonld
//! ```
//!
//! Whether a recognized host workflow is active is an explicit
//! [`HostContext`] parameter resolved once at the process edge — the store
//! never sniffs environment variables or process ancestry itself. Without
//! an active host context, persistence is a deliberate no-op
//! ([`Persisted::Skipped`], not an error) unless the caller forces the
//! write.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use mls_schema::{identity_hash, CustomTypeHook, Estimator, ScorerRef, Session};

/// Metadata-store subdirectory holding MLS records.
pub const MLS_DIR: &str = "ml";

/// Common subdirectory inside [`MLS_DIR`]; always points at the current
/// record layout.
pub const COMMON_DIR: &str = "latest";

/// Whether a recognized host workflow (a run recorder) is active.
///
/// Resolved once at the process edge by whatever launched this process;
/// the core stays free of ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostContext {
    /// The process runs inside a recognized host workflow; records are
    /// persisted.
    Active,
    /// No host workflow was detected; records are only written when
    /// explicitly forced.
    Inactive,
}

/// Outcome of a persistence attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    /// The record was written to the given path.
    Written(PathBuf),
    /// Persistence was deliberately skipped: no host workflow, no force.
    Skipped,
}

/// Destination path of a record inside the metadata store.
#[must_use]
pub fn record_path(root: &Path, identifier: &str) -> PathBuf {
    root.join(MLS_DIR)
        .join(COMMON_DIR)
        .join(format!("{identifier}.jsonld"))
}

/// Persists a serialized MLS document under `root`.
///
/// Skips (without error) when `ctx` is [`HostContext::Inactive`] and
/// `force` is not set. Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the record
/// cannot be written.
pub fn persist(
    root: &Path,
    ctx: HostContext,
    force: bool,
    identifier: &str,
    document: &str,
) -> Result<Persisted> {
    if ctx != HostContext::Active && !force {
        debug!(identifier, "no host workflow active, skipping MLS record");
        return Ok(Persisted::Skipped);
    }

    let path = record_path(root, identifier);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, document)
        .with_context(|| format!("Failed to write MLS record: {}", path.display()))?;
    info!(identifier, path = %path.display(), "MLS record written");
    Ok(Persisted::Written(path))
}

/// Converts `model` and persists the record under its identity hash.
///
/// # Errors
///
/// Returns conversion errors from [`mls_schema::to_mls`] and I/O errors
/// from [`persist`].
pub fn export(
    root: &Path,
    ctx: HostContext,
    force: bool,
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
) -> Result<Persisted> {
    let document = mls_schema::to_mls(model, evaluation)?;
    let identifier = identity_hash(model).to_string();
    persist(root, ctx, force, &identifier, &document)
}

/// Same as [`export`] with a custom-type hook threaded through extraction.
///
/// # Errors
///
/// Same conditions as [`export`].
pub fn export_with(
    root: &Path,
    ctx: HostContext,
    force: bool,
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
    hook: Option<CustomTypeHook<'_>>,
) -> Result<Persisted> {
    let document = mls_schema::to_mls_with(model, evaluation, hook)?;
    let identifier = identity_hash(model).to_string();
    persist(root, ctx, force, &identifier, &document)
}

/// Converts `model` and writes the record to an explicit path, bypassing
/// the store layout and the host-context decision.
///
/// # Errors
///
/// Returns conversion errors from [`mls_schema::to_mls`] and I/O errors
/// for the write.
pub fn export_to_file(
    path: &Path,
    model: &dyn Estimator,
    evaluation: Option<(&ScorerRef, f64)>,
) -> Result<()> {
    let document = mls_schema::to_mls(model, evaluation)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, document)
        .with_context(|| format!("Failed to write MLS record: {}", path.display()))?;
    Ok(())
}

/// Finishes `session` and persists its record under `root`.
///
/// Session records come from an explicitly registered training hook, so
/// they are always written regardless of host context.
///
/// # Errors
///
/// Returns serialization errors from [`Session::finish`] and I/O errors
/// from [`persist`].
pub fn export_session(root: &Path, session: Session) -> Result<Persisted> {
    let (run_id, document) = session.finish()?;
    persist(root, HostContext::Active, true, &run_id, &document)
}
