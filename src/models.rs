use serde::Serialize;

use crate::license::display::LicenseDisplay;

/// One `require` entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRef {
    pub path: String,
    pub version: String,
    pub indirect: bool,
}

impl ModuleRef {
    pub fn new(path: impl Into<String>, version: impl Into<String>, indirect: bool) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            indirect,
        }
    }
}

/// A dependency's source location plus whatever license data enrichment found.
///
/// `name` is the module path and never changes. `host`, `author`, `project`
/// and `url` come from resolution; enrichment may only correct `project` (on
/// the pkg.go.dev path), annotate `version`, and fill the license fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Repository {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Colored short form shown in the table report.
    #[serde(skip)]
    pub shortname: Option<LicenseDisplay>,
    /// Base64 license body as returned by the host API.
    #[serde(skip)]
    pub text: Option<String>,
}

impl Repository {
    /// A repository whose path could not be mapped to any host. Only the
    /// module path is kept.
    pub fn unresolved(module: &ModuleRef) -> Self {
        Self {
            name: module.path.clone(),
            ..Default::default()
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.host.is_empty()
    }

    /// Record a version seen upstream, keeping the declared one visible.
    pub fn note_upstream_version(&mut self, discovered: &str) {
        if discovered.is_empty() || self.version.eq_ignore_ascii_case(discovered) {
            return;
        }
        self.version = format!("{} (!new:{})", self.version, discovered);
    }
}
