use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;

use crate::config::GithubConfig;

const USER_AGENT: &str = concat!("modlicense/", env!("CARGO_PKG_VERSION"));

/// Body of `GET /repos/{owner}/{repo}/license`.
#[derive(Debug, Deserialize)]
pub struct RepositoryLicense {
    /// Base64-encoded license file.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub license: Option<LicenseInfo>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseInfo {
    pub key: String,
}

/// Minimal GitHub REST client: license lookup and starring.
pub struct GithubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(config: &GithubConfig, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self
            .client
            .request(method, format!("{}{}", self.api_url, path))
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");

        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Fetch the detected license of `owner/repo`.
    pub async fn fetch_license(&self, owner: &str, repo: &str) -> Result<RepositoryLicense> {
        let response = self
            .request(Method::GET, &format!("/repos/{}/{}/license", owner, repo))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("GitHub API returned {} for {}/{}", status, owner, repo);
        }

        Ok(response.json().await?)
    }

    /// Star `owner/repo` for the authenticated user.
    pub async fn star(&self, owner: &str, repo: &str) -> Result<()> {
        let response = self
            .request(Method::PUT, &format!("/user/starred/{}/{}", owner, repo))
            .header("Content-Length", "0")
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("starring {}/{} returned {}", owner, repo, response.status());
        }
        Ok(())
    }
}
