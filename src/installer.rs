//! Recursive dependency installation
//!
//! The installer walks a mod's dependency graph depth-first, installing each
//! distinct mod id at most once per session. Dependency graphs from the
//! catalog are not trees and not guaranteed acyclic; the session's visited
//! set is both the de-duplication and the cycle guard. Failures below the
//! root are reported and skipped, never fatal to the rest of the walk.

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::catalog::{ArtifactRecord, CatalogClient, ModRecord};
use crate::{matcher, output, sanitize, select, store};

/// What happened to a single mod during an install run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The artifact was placed (or, under [`OverwritePolicy::Keep`], already
    /// present) at this path.
    Installed(PathBuf),
    /// The mod resolved but has no artifact for the requested
    /// version/loader. The id stays marked so it is not retried.
    SkippedNoCompatibleFile,
    /// The id was already installed or in progress in this session.
    SkippedAlreadyInSession,
    /// Catalog or transfer failure at this node; siblings continue.
    Failed(String),
}

/// What to do when the destination file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwritePolicy {
    /// Remove the existing file and transfer fresh (interactive download
    /// flow, used to repair a broken file).
    Replace,
    /// Treat the existing file as already-satisfied and skip the transfer
    /// (batch install flow).
    Keep,
}

/// De-duplication state for one install command invocation.
///
/// An id enters the visited set at most once and is never removed; any
/// dependency resolving to a visited id is skipped without a fetch. The
/// session spans all roots of a batch and is discarded when the command
/// completes.
#[derive(Debug, Default)]
pub struct InstallSession {
    installed: HashSet<u64>,
    report: Vec<(u64, InstallOutcome)>,
}

impl InstallSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this id was already installed or in progress this session
    pub fn contains(&self, id: u64) -> bool {
        self.installed.contains(&id)
    }

    /// One entry per distinct mod id, in the order outcomes were decided
    pub fn report(&self) -> &[(u64, InstallOutcome)] {
        &self.report
    }

    fn mark(&mut self, id: u64) {
        self.installed.insert(id);
    }

    fn record(&mut self, id: u64, outcome: InstallOutcome) -> InstallOutcome {
        self.report.push((id, outcome.clone()));
        outcome
    }
}

/// Depth-first dependency installer for one game version and mods directory
pub struct Installer<'a> {
    catalog: &'a CatalogClient,
    mods_dir: &'a Path,
    game_version: String,
    policy: OverwritePolicy,
}

impl<'a> Installer<'a> {
    pub fn new(
        catalog: &'a CatalogClient,
        mods_dir: &'a Path,
        game_version: &str,
        policy: OverwritePolicy,
    ) -> Self {
        Self {
            catalog,
            mods_dir,
            game_version: game_version.to_string(),
            policy,
        }
    }

    /// Install a mod and, recursively, its declared dependencies.
    ///
    /// The newest compatible artifact is selected automatically. All
    /// failures below this node are reported and converted to skip/continue
    /// outcomes; the return value describes this node only.
    pub fn install(&self, mod_rec: &ModRecord, session: &mut InstallSession) -> InstallOutcome {
        if session.contains(mod_rec.id) {
            output::skip(&format!(
                "{} ({}) already handled in this session",
                mod_rec.name, mod_rec.id
            ));
            return InstallOutcome::SkippedAlreadyInSession;
        }
        // Mark before recursing so a cycle back into this node is caught
        session.mark(mod_rec.id);

        output::action(&format!("Installing {} ({})...", mod_rec.name, mod_rec.id));

        let files = match self.catalog.files(mod_rec.id) {
            Ok(files) => files,
            Err(e) => {
                let reason = format!("{:#}", e);
                output::error(&format!("failed to install {}: {}", mod_rec.name, reason));
                return session.record(mod_rec.id, InstallOutcome::Failed(reason));
            }
        };

        let Some(artifact) = select::select_latest(&files, &self.game_version) else {
            output::warning(&format!(
                "failed to download {}: no version available",
                mod_rec.name
            ));
            return session.record(mod_rec.id, InstallOutcome::SkippedNoCompatibleFile);
        };

        self.place_and_recurse(mod_rec, &artifact, session)
    }

    /// Install a specific, caller-chosen artifact for this mod, then walk
    /// its dependency chain with the automatic policy. Supports the
    /// interactive download flow where a human picks the root artifact.
    pub fn install_chosen(
        &self,
        mod_rec: &ModRecord,
        artifact: &ArtifactRecord,
        session: &mut InstallSession,
    ) -> InstallOutcome {
        if session.contains(mod_rec.id) {
            return InstallOutcome::SkippedAlreadyInSession;
        }
        session.mark(mod_rec.id);
        output::action(&format!("Installing {} ({})...", mod_rec.name, mod_rec.id));
        self.place_and_recurse(mod_rec, artifact, session)
    }

    /// Place one artifact in the mods directory, then install dependencies
    fn place_and_recurse(
        &self,
        mod_rec: &ModRecord,
        artifact: &ArtifactRecord,
        session: &mut InstallSession,
    ) -> InstallOutcome {
        let file_name = sanitize::artifact_file_name(artifact, &mod_rec.name);
        let dest = self.mods_dir.join(&file_name);

        output::detail(&format!(
            "downloading {} ({} bytes)",
            file_name, artifact.file_length
        ));

        if dest.exists() {
            match self.policy {
                OverwritePolicy::Replace => {
                    if let Err(e) = store::remove_if_exists(&dest) {
                        let reason = format!("{:#}", e);
                        output::error(&reason);
                        return session.record(mod_rec.id, InstallOutcome::Failed(reason));
                    }
                }
                OverwritePolicy::Keep => {
                    output::skip(&format!("file exists: {}", dest.display()));
                    return session.record(mod_rec.id, InstallOutcome::Installed(dest));
                }
            }
        }

        if let Err(e) = store::transfer(&artifact.download_url, self.mods_dir, &file_name) {
            let reason = format!("{:#}", e);
            output::error(&format!("failed to download {}: {}", mod_rec.name, reason));
            return session.record(mod_rec.id, InstallOutcome::Failed(reason));
        }
        output::success(&format!("file downloaded: {}", dest.display()));

        let outcome = session.record(mod_rec.id, InstallOutcome::Installed(dest));

        let pending = artifact
            .dependencies
            .iter()
            .filter(|d| !session.contains(d.mod_id))
            .count();
        if pending > 0 {
            output::info(&format!(
                "installing {} dependencies of {}",
                pending, mod_rec.name
            ));
        }
        for dep_id in artifact.dependencies.iter().map(|d| d.mod_id) {
            // Covers ids visited before this node and ids pulled in by an
            // earlier sibling in this loop; either way, no fetch
            if session.contains(dep_id) {
                output::skip(&format!("dependency already satisfied: {}", dep_id));
                continue;
            }
            match self.catalog.lookup_by_id(dep_id) {
                Ok(Some(dep_mod)) => {
                    self.install(&dep_mod, session);
                }
                Ok(None) => {
                    output::warning(&format!("dependency {} not found in catalog", dep_id));
                }
                Err(e) => {
                    output::error(&format!(
                        "failed to resolve dependency {}: {:#}",
                        dep_id, e
                    ));
                }
            }
        }

        outcome
    }
}

/// Resolve a user-supplied mod reference to a catalog record.
///
/// A reference that parses as a non-negative integer is a direct id lookup;
/// anything else is a version-scoped catalog search post-filtered with
/// [`matcher::matches`], first survivor wins (catalog ordering, no local
/// ranking). `Ok(None)` means the catalog has no such mod.
pub fn resolve_reference(
    catalog: &CatalogClient,
    game_version: &str,
    reference: &str,
) -> Result<Option<ModRecord>> {
    if let Ok(id) = reference.parse::<u64>() {
        return catalog.lookup_by_id(id);
    }
    let mods = catalog.search(game_version, reference)?;
    Ok(mods.into_iter().find(|m| matcher::matches(&m.name, reference)))
}
