use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::error::ScanError;
use crate::models::Repository;

pub const LICENSES_DIR: &str = "licenses";

/// Write every captured license text to
/// `<root>/licenses/<author>-<project>-license.MD`.
///
/// Stops at the first decode or write failure. Returns how many files were
/// written.
pub fn write_license_files(root: &Path, repos: &[Repository]) -> Result<usize, ScanError> {
    let dir = root.join(LICENSES_DIR);
    let mut written = 0;

    for repo in repos {
        let Some(text) = repo.text.as_deref() else {
            continue;
        };

        // GitHub wraps base64 content at 60 columns.
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let decoded = STANDARD
            .decode(compact)
            .map_err(|source| ScanError::LicenseDecode {
                name: repo.name.clone(),
                source,
            })?;

        if written == 0 {
            std::fs::create_dir_all(&dir).map_err(|source| ScanError::LicenseWrite {
                path: dir.clone(),
                source,
            })?;
        }

        let path = dir.join(format!("{}-{}-license.MD", repo.author, repo.project));
        std::fs::write(&path, decoded).map_err(|source| ScanError::LicenseWrite {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "wrote license file");
        written += 1;
    }

    Ok(written)
}
