//! Async HTTP clients that fill in license data for resolved repositories.
//!
//! - [`github`]: GitHub REST license lookup (and optional starring).
//! - [`pkgsite`]: pkg.go.dev page scrape for modules outside the known hosts.
//!
//! [`LicenseClient`] dispatches on [`Repository::host`] and implements
//! [`Enricher`], the seam the enrichment pool works against.

pub mod github;
pub mod pkgsite;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::license::display::{from_github_key, from_page_name};
use crate::models::Repository;
use crate::resolver::{GITHUB_HOST, METADATA_HOST};
use github::GithubClient;
use pkgsite::PkgsiteClient;

/// Fills one repository's license fields in place.
///
/// An `Err` means this repository stays (partly) unenriched; it never affects
/// other repositories.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, repo: &mut Repository) -> Result<()>;
}

pub struct LicenseClient {
    github: GithubClient,
    pkgsite: PkgsiteClient,
    thanks: bool,
}

impl LicenseClient {
    pub fn new(config: &Config, token: Option<String>, thanks: bool) -> Result<Self> {
        Ok(Self {
            github: GithubClient::new(&config.github, token)?,
            pkgsite: PkgsiteClient::new(&config.pkgsite)?,
            thanks,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.github.is_authenticated()
    }

    async fn enrich_github(&self, repo: &mut Repository) -> Result<()> {
        let found = self
            .github
            .fetch_license(&repo.author, &repo.project)
            .await
            .with_context(|| format!("license lookup failed for {}", repo.url))?;

        let key = found
            .license
            .map(|l| l.key)
            .ok_or_else(|| anyhow!("no license detected for {}", repo.url))?;

        let display = from_github_key(&key);
        repo.license = Some(display.name.clone());
        repo.shortname = Some(display);
        repo.text = found.content.filter(|c| !c.is_empty());

        if self.thanks && self.github.is_authenticated() {
            if let Err(e) = self.github.star(&repo.author, &repo.project).await {
                debug!(repo = %repo.url, error = %e, "star request failed");
            }
        }

        Ok(())
    }

    async fn enrich_pkgsite(&self, repo: &mut Repository) -> Result<()> {
        let facts = self
            .pkgsite
            .fetch(&repo.name)
            .await
            .with_context(|| format!("fetching {} failed", repo.url))?;

        if let Some(version) = facts.version {
            repo.note_upstream_version(&version);
        }
        if let Some(license) = facts.license {
            let display = from_page_name(&license);
            repo.license = Some(display.name.clone());
            repo.shortname = Some(display);
        }
        if let Some(project) = facts.repository {
            repo.project = project;
        }

        Ok(())
    }
}

#[async_trait]
impl Enricher for LicenseClient {
    async fn enrich(&self, repo: &mut Repository) -> Result<()> {
        if !repo.is_resolved() {
            debug!(module = %repo.name, "unresolved module, skipping license lookup");
            return Ok(());
        }

        match repo.host.as_str() {
            GITHUB_HOST => self.enrich_github(repo).await,
            METADATA_HOST => self.enrich_pkgsite(repo).await,
            host => {
                debug!(module = %repo.name, host, "no license lookup for host");
                Ok(())
            }
        }
    }
}
