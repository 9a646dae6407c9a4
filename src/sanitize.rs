//! Deterministic local file names for downloaded artifacts
//!
//! Catalog file names are free-form; everything the tool writes into the mods
//! directory goes through [`sanitize`] first so the result is always a single
//! safe path segment.

use crate::catalog::ArtifactRecord;
use crate::matcher::strip_parenthetical;

/// Derive a safe, deterministic file name from a raw catalog name.
///
/// Lower-cases, strips any parenthesized suffix, replaces every character
/// outside `[a-z0-9._]` with `-`, and collapses runs of `-` into one.
/// Idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
///
/// Collisions are not this function's problem; the installer's overwrite
/// policy decides what happens when the name already exists on disk.
pub fn sanitize(raw_name: &str) -> String {
    let stripped = strip_parenthetical(raw_name).to_lowercase();
    let mut out = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        let c = match c {
            'a'..='z' | '0'..='9' | '.' | '_' => c,
            _ => '-',
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}

/// The local file name for an artifact, sanitized.
///
/// Prefers the catalog-supplied file name; an artifact without one gets a
/// synthetic `<modName>-<firstVersionToken>.jar` name built from the mod name
/// and the artifact's first compatibility token.
pub fn artifact_file_name(artifact: &ArtifactRecord, mod_name: &str) -> String {
    let raw = match &artifact.file_name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => match artifact.game_versions.first() {
            Some(version) => format!("{}-{}.jar", mod_name, version),
            None => format!("{}.jar", mod_name),
        },
    };
    sanitize(&raw)
}
