//! Module path → [`Repository`] resolution.
//!
//! Rules, first match wins:
//! 1. `github.com`, `gitlab.com`, `bitbucket.org` with at least three segments
//!    map straight to `https://<host>/<author>/<project>`.
//! 2. `gopkg.in` paths are rewritten to GitHub, dropping the `.vN` suffix of the
//!    package segment.
//! 3. Anything else is looked up on pkg.go.dev during enrichment.
//!
//! A known-host path that is too short to name a project resolves to a bare,
//! host-less repository (see [`Repository::is_resolved`]).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::models::{ModuleRef, Repository};

pub const GITHUB_HOST: &str = "github.com";
pub const KNOWN_HOSTS: [&str; 3] = [GITHUB_HOST, "gitlab.com", "bitbucket.org"];
pub const REDIRECTOR_HOST: &str = "gopkg.in";
pub const METADATA_HOST: &str = "pkg.go.dev";

/// Resolves module paths for one run, remembering every path it has seen.
#[derive(Debug, Default)]
pub struct Resolver {
    cache: HashMap<String, Arc<Repository>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a module, returning the cached descriptor when the path was
    /// already resolved during this run.
    pub fn resolve(&mut self, module: &ModuleRef) -> Arc<Repository> {
        if let Some(hit) = self.cache.get(&module.path) {
            debug!(module = %module.path, "resolution cache hit");
            return Arc::clone(hit);
        }

        let repo = Arc::new(resolve_module(module));
        self.cache.insert(module.path.clone(), Arc::clone(&repo));
        repo
    }

    /// Resolve every module in manifest order into owned repositories ready
    /// for enrichment.
    pub fn resolve_all(&mut self, modules: &[ModuleRef]) -> Vec<Repository> {
        modules
            .iter()
            .map(|m| Repository::clone(&self.resolve(m)))
            .collect()
    }
}

fn resolve_module(module: &ModuleRef) -> Repository {
    let segments: Vec<&str> = module.path.split('/').collect();

    match segments[0] {
        host if KNOWN_HOSTS.contains(&host) => {
            if segments.len() < 3 {
                return Repository::unresolved(module);
            }
            known_host(module, host, segments[1], segments[2])
        }
        REDIRECTOR_HOST => match segments.len() {
            // gopkg.in/pkg.v3
            2 => {
                let pkg = strip_version_suffix(segments[1]);
                known_host(module, GITHUB_HOST, pkg, pkg)
            }
            // gopkg.in/user/pkg.v3
            n if n >= 3 => known_host(
                module,
                GITHUB_HOST,
                segments[1],
                strip_version_suffix(segments[2]),
            ),
            _ => Repository::unresolved(module),
        },
        _ => Repository {
            name: module.path.clone(),
            url: format!("https://{}/{}", METADATA_HOST, module.path),
            host: METADATA_HOST.to_string(),
            version: module.version.clone(),
            ..Default::default()
        },
    }
}

fn known_host(module: &ModuleRef, host: &str, author: &str, project: &str) -> Repository {
    Repository {
        name: module.path.clone(),
        url: format!("https://{}/{}/{}", host, author, project),
        host: host.to_string(),
        author: author.to_string(),
        project: project.to_string(),
        version: module.version.clone(),
        ..Default::default()
    }
}

fn strip_version_suffix(segment: &str) -> &str {
    segment.split('.').next().unwrap_or(segment)
}
