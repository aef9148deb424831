use std::path::PathBuf;

use thiserror::Error;

/// Fatal and side-output failures of a scan.
///
/// Per-repository enrichment failures are not represented here: they are
/// absorbed by the enrichment layer and only logged.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no go.mod file present in {}", .dir.display())]
    ManifestNotFound { dir: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed go.mod at line {line}: {reason}")]
    ManifestMalformed { line: usize, reason: String },

    #[error("cannot use thanks feature without a GitHub API key ({env} is not set)")]
    MissingCredential { env: String },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to decode license text for {name}: {source}")]
    LicenseDecode {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to write license file {}: {source}", .path.display())]
    LicenseWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
