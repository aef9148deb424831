use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::config::PkgsiteConfig;

const VERSION_MARKER: &str = r#"span[data-test-id="UnitHeader-version"]"#;
const LICENSE_MARKER: &str = r#"span[data-test-id="UnitHeader-licenses"]"#;
const REPO_MARKER: &str = ".UnitMeta-repo";

/// What a pkg.go.dev module page says about a module.
#[derive(Debug, Default, PartialEq)]
pub struct PageFacts {
    pub version: Option<String>,
    pub license: Option<String>,
    pub repository: Option<String>,
}

/// Fetches single pkg.go.dev pages. Links are never followed.
pub struct PkgsiteClient {
    client: Client,
    base_url: String,
}

impl PkgsiteClient {
    pub fn new(config: &PkgsiteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch(&self, module_path: &str) -> Result<PageFacts> {
        let url = format!("{}/{}", self.base_url, module_path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            bail!("{} returned {}", url, response.status());
        }

        let body = response.text().await?;
        extract_page(&body)
    }
}

/// Pull the version, license and repository markers out of a module page.
///
/// A page carrying none of the three markers is an error.
pub fn extract_page(html: &str) -> Result<PageFacts> {
    let doc = Html::parse_document(html);
    let anchor = selector("a")?;

    let marker_text = |css: &str| -> Result<Option<String>> {
        let container = selector(css)?;
        Ok(doc
            .select(&container)
            .next()
            .and_then(|el| first_anchor_text(el, &anchor))
            .filter(|t| !t.is_empty()))
    };

    // Only the first link counts: older versions also carry a "Go to latest" link.
    let version = marker_text(VERSION_MARKER)?.and_then(|text| {
        text.trim_start_matches("Version:")
            .split_whitespace()
            .next()
            .map(str::to_string)
    });

    let facts = PageFacts {
        version,
        license: marker_text(LICENSE_MARKER)?,
        repository: marker_text(REPO_MARKER)?,
    };

    if facts == PageFacts::default() {
        bail!("no module details found on page");
    }
    Ok(facts)
}

fn first_anchor_text(el: ElementRef<'_>, anchor: &Selector) -> Option<String> {
    el.select(anchor).next().map(|a| {
        let raw: String = a.text().collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {}: {:?}", css, e))
}
