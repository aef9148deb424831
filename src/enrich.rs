//! Bounded, failure-isolated enrichment of resolved repositories.
//!
//! Each repository is moved into its own task, enriched there, and moved back
//! into its original slot. At most [`MAX_CONCURRENT_ENRICHMENTS`] tasks hold a
//! permit at once; a failed or panicked task only costs its own repository.

use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::error::ScanError;
use crate::models::Repository;
use crate::registry::Enricher;

pub const MAX_CONCURRENT_ENRICHMENTS: usize = 5;

pub struct Orchestrator {
    enricher: Arc<dyn Enricher>,
    progress: Option<ProgressBar>,
}

impl Orchestrator {
    /// Fails with [`ScanError::MissingCredential`] when starring was requested
    /// without a token; nothing has been dispatched at that point.
    pub fn new(
        enricher: Arc<dyn Enricher>,
        thanks: bool,
        has_credential: bool,
        token_env: &str,
    ) -> Result<Self, ScanError> {
        if thanks && !has_credential {
            return Err(ScanError::MissingCredential {
                env: token_env.to_string(),
            });
        }

        Ok(Self {
            enricher,
            progress: None,
        })
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Enrich every repository and return them in input order, whatever order
    /// the tasks finished in.
    pub async fn run(&self, repos: Vec<Repository>) -> Vec<Repository> {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_ENRICHMENTS));
        let mut join_set: JoinSet<(usize, Repository)> = JoinSet::new();
        let mut enriched = repos.clone();

        for (idx, mut repo) in repos.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let enricher = Arc::clone(&self.enricher);
            let progress = self.progress.clone();

            join_set.spawn(async move {
                // The semaphore is never closed, so acquiring only waits.
                let _permit = semaphore.acquire_owned().await.ok();
                debug!(repo = %repo.url, "fetching license");

                if let Err(e) = enricher.enrich(&mut repo).await {
                    warn!(module = %repo.name, "{:#}", e);
                }
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                (idx, repo)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, repo)) => enriched[idx] = repo,
                Err(e) => error!("enrichment task failed: {}", e),
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_with_message("Done");
        }

        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::{bail, Result};
    use async_trait::async_trait;

    fn repos(n: usize) -> Vec<Repository> {
        (0..n)
            .map(|i| Repository {
                name: format!("example.com/mod{}", i),
                host: "pkg.go.dev".to_string(),
                version: "v1.0.0".to_string(),
                ..Default::default()
            })
            .collect()
    }

    /// Counts calls and in-flight enrichments; fails for `example.com/mod3`.
    #[derive(Default)]
    struct Gate {
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl Enricher for Gate {
        async fn enrich(&self, repo: &mut Repository) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            // Later repositories finish first.
            let idx: u64 = repo.name.trim_start_matches("example.com/mod").parse()?;
            tokio::time::sleep(Duration::from_millis(40u64.saturating_sub(idx * 2))).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if repo.name == "example.com/mod3" {
                bail!("simulated API error");
            }
            repo.license = Some("MIT".to_string());
            Ok(())
        }
    }

    struct Panicky;

    #[async_trait]
    impl Enricher for Panicky {
        async fn enrich(&self, repo: &mut Repository) -> Result<()> {
            if repo.name == "example.com/mod1" {
                panic!("boom");
            }
            repo.license = Some("MIT".to_string());
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let gate = Arc::new(Gate::default());
        let orchestrator =
            Orchestrator::new(gate.clone(), false, false, "GITHUB_API_KEY").unwrap();

        let out = orchestrator.run(repos(20)).await;

        assert_eq!(out.len(), 20);
        assert_eq!(gate.calls.load(Ordering::SeqCst), 20);
        let max = gate.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= MAX_CONCURRENT_ENRICHMENTS, "saw {} in flight", max);
        assert!(max > 1);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_order_kept() {
        let gate = Arc::new(Gate::default());
        let orchestrator = Orchestrator::new(gate, false, false, "GITHUB_API_KEY").unwrap();

        let out = orchestrator.run(repos(8)).await;

        for (i, repo) in out.iter().enumerate() {
            assert_eq!(repo.name, format!("example.com/mod{}", i));
            if i == 3 {
                assert!(repo.license.is_none());
            } else {
                assert_eq!(repo.license.as_deref(), Some("MIT"));
            }
        }
    }

    #[tokio::test]
    async fn test_panicked_task_keeps_its_slot() {
        let orchestrator =
            Orchestrator::new(Arc::new(Panicky), false, false, "GITHUB_API_KEY").unwrap();

        let out = orchestrator.run(repos(3)).await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[1].name, "example.com/mod1");
        assert!(out[1].license.is_none());
        assert_eq!(out[2].license.as_deref(), Some("MIT"));
    }

    #[tokio::test]
    async fn test_thanks_without_credential_fails_before_dispatch() {
        let gate = Arc::new(Gate::default());
        let err = Orchestrator::new(gate.clone(), true, false, "GITHUB_API_KEY")
            .err()
            .unwrap();

        assert!(matches!(
            err,
            ScanError::MissingCredential { ref env } if env == "GITHUB_API_KEY"
        ));
        assert_eq!(gate.calls.load(Ordering::SeqCst), 0);

        assert!(Orchestrator::new(gate, true, true, "GITHUB_API_KEY").is_ok());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let orchestrator =
            Orchestrator::new(Arc::new(Gate::default()), false, false, "X").unwrap();
        assert!(orchestrator.run(Vec::new()).await.is_empty());
    }
}
