use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "go.mod";

/// Locate the project's `go.mod`, if there is one.
pub fn detect_manifest(path: &Path) -> Option<PathBuf> {
    let manifest = path.join(MANIFEST_FILE);
    manifest.is_file().then_some(manifest)
}
