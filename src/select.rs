//! Artifact selection for a target game version and loader
//!
//! Given a mod's full file list, keep only the artifacts a Fabric server on
//! the requested game version can actually run, newest first.

use crate::catalog::ArtifactRecord;

/// Loader ecosystem this installer targets. The catalog tags artifacts with
/// the loader name inside the same `gameVersions` set as version strings, so
/// compatibility is a plain membership test on both.
pub const LOADER_TAG: &str = "Fabric";

/// All compatible artifacts for a game version, most recently published
/// first. Used by the interactive flow, which exposes the whole list for a
/// human choice.
pub fn select_all(files: &[ArtifactRecord], game_version: &str) -> Vec<ArtifactRecord> {
    let mut compatible: Vec<ArtifactRecord> = files
        .iter()
        .filter(|a| a.game_versions.iter().any(|v| v == game_version))
        .filter(|a| a.game_versions.iter().any(|v| v == LOADER_TAG))
        .filter(|a| a.is_available)
        .cloned()
        .collect();
    compatible.sort_by(|a, b| b.file_date.cmp(&a.file_date));
    compatible
}

/// The newest compatible artifact, if any. Used by the non-interactive
/// install flow.
pub fn select_latest(files: &[ArtifactRecord], game_version: &str) -> Option<ArtifactRecord> {
    select_all(files, game_version).into_iter().next()
}

/// Human-readable name for an artifact in the interactive listing.
///
/// Prefers the catalog file name, falls back to the trailing path segment of
/// the download URL, then to the mod's own name. Display only; never used
/// for filtering or for the on-disk name.
pub fn display_name(artifact: &ArtifactRecord, mod_name: &str) -> String {
    if let Some(name) = &artifact.file_name {
        if !name.is_empty() {
            return name.clone();
        }
    }
    artifact
        .download_url
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| mod_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::{artifact, artifact_at};

    #[test]
    fn test_requires_game_version() {
        let files = vec![artifact(Some("a.jar"), "http://x/a.jar", &["1.16.5", "Fabric"], true)];
        assert!(select_latest(&files, "1.17.1").is_none());
        assert!(select_latest(&files, "1.16.5").is_some());
    }

    #[test]
    fn test_version_membership_is_exact() {
        // "1.17" must not match "1.17.1" and vice versa
        let files = vec![artifact(Some("a.jar"), "http://x/a.jar", &["1.17", "Fabric"], true)];
        assert!(select_latest(&files, "1.17.1").is_none());
    }

    #[test]
    fn test_requires_loader_tag() {
        let files = vec![
            artifact(Some("forge.jar"), "http://x/forge.jar", &["1.17.1", "Forge"], true),
            artifact(Some("fabric.jar"), "http://x/fabric.jar", &["1.17.1", "Fabric"], true),
        ];
        let selected = select_latest(&files, "1.17.1").unwrap();
        assert_eq!(selected.file_name.as_deref(), Some("fabric.jar"));
    }

    #[test]
    fn test_excludes_unavailable() {
        let files = vec![artifact(Some("a.jar"), "http://x/a.jar", &["1.17.1", "Fabric"], false)];
        assert!(select_latest(&files, "1.17.1").is_none());
    }

    #[test]
    fn test_newest_first() {
        let files = vec![
            artifact_at(Some("old.jar"), "http://x/old.jar", &["1.17.1", "Fabric"], true, 100),
            artifact_at(Some("new.jar"), "http://x/new.jar", &["1.17.1", "Fabric"], true, 300),
            artifact_at(Some("mid.jar"), "http://x/mid.jar", &["1.17.1", "Fabric"], true, 200),
        ];
        let all = select_all(&files, "1.17.1");
        let names: Vec<_> = all.iter().map(|a| a.file_name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["new.jar", "mid.jar", "old.jar"]);
        assert_eq!(
            select_latest(&files, "1.17.1").unwrap().file_name.as_deref(),
            Some("new.jar")
        );
    }

    #[test]
    fn test_selected_always_passes_filters() {
        let files = vec![
            artifact_at(Some("bad.jar"), "http://x/bad.jar", &["1.16.5", "Fabric"], true, 900),
            artifact_at(None, "", &["1.17.1", "Fabric"], false, 800),
            artifact_at(Some("ok.jar"), "http://x/ok.jar", &["1.17.1", "Fabric"], true, 100),
        ];
        for selected in select_all(&files, "1.17.1") {
            assert!(selected.game_versions.iter().any(|v| v == "1.17.1"));
            assert!(selected.game_versions.iter().any(|v| v == LOADER_TAG));
            assert!(selected.is_available);
        }
        assert_eq!(select_all(&files, "1.17.1").len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_all(&[], "1.17.1").is_empty());
        assert!(select_latest(&[], "1.17.1").is_none());
    }

    #[test]
    fn test_display_name_prefers_file_name() {
        let a = artifact(Some("sodium-0.3.jar"), "http://x/dl/other.jar", &[], true);
        assert_eq!(display_name(&a, "Sodium"), "sodium-0.3.jar");
    }

    #[test]
    fn test_display_name_falls_back_to_url_segment() {
        let a = artifact(None, "http://x/dl/sodium-0.3.jar", &[], true);
        assert_eq!(display_name(&a, "Sodium"), "sodium-0.3.jar");
        let trailing_slash = artifact(None, "http://x/dl/sodium-0.3.jar/", &[], true);
        assert_eq!(display_name(&trailing_slash, "Sodium"), "sodium-0.3.jar");
    }

    #[test]
    fn test_display_name_falls_back_to_mod_name() {
        let a = artifact(None, "", &[], true);
        assert_eq!(display_name(&a, "Sodium"), "Sodium");
    }
}
