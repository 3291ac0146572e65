//! Batched license lookup and classification.
//!
//! [`Classifier::classify`] resolves every unique valid id against a
//! [`ClearanceSource`] and merges the answers with a local fallback:
//!
//! 1. authoritative approved
//! 2. authoritative restricted
//! 3. declared license judged `pass` by the local policy (heuristic approved)
//! 4. needs review
//!
//! Invalid ids are never sent. Batches that still fail after their retries,
//! and batches outstanding when the global timeout fires, leave their ids in
//! "needs review".

pub mod client;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::config::{apply_policy, ClearanceConfig, PolicyConfig};
use crate::content_id::ContentId;
use crate::error::TransportError;
use crate::license::spdx::normalize;
use crate::models::{LicenseData, PolicyVerdict, Provenance, Status};

pub use client::{Answer, ClearanceRecord, ClearanceResponse, ClearanceSource, HttpClearanceSource};

/// Upper bound on the backoff exponent so the delay cannot overflow.
const MAX_BACKOFF_SHIFT: u8 = 16;

#[derive(Debug, Clone)]
pub struct LookupSettings {
    /// Maximum ids per request.
    pub batch_size: usize,
    /// Maximum requests in flight.
    pub max_concurrent: usize,
    /// Retries per batch after the first attempt.
    pub max_retries: u8,
    /// Delay before the first retry; doubled for each further one.
    pub backoff: Duration,
    /// Bound on the whole lookup phase.
    pub timeout: Duration,
}

impl From<&ClearanceConfig> for LookupSettings {
    fn from(config: &ClearanceConfig) -> Self {
        LookupSettings {
            batch_size: config.batch_size,
            max_concurrent: config.max_concurrent,
            max_retries: config.max_retries,
            backoff: config.backoff(),
            timeout: config.timeout(),
        }
    }
}

pub struct Classifier<S> {
    source: S,
    policy: PolicyConfig,
    settings: LookupSettings,
    show_progress: bool,
}

impl<S: ClearanceSource> Classifier<S> {
    pub fn new(source: S, policy: PolicyConfig, settings: LookupSettings) -> Self {
        Classifier {
            source,
            policy,
            settings,
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while batches are in flight.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Classify every unique id. `declared` holds licenses the manifests
    /// declared, used only when the clearance service has no record.
    pub async fn classify(
        &self,
        ids: &[ContentId],
        declared: &HashMap<ContentId, String>,
    ) -> BTreeMap<ContentId, LicenseData> {
        let unique: BTreeSet<&ContentId> = ids.iter().collect();
        let mut results = BTreeMap::new();
        let mut pending = Vec::new();

        for id in unique {
            if id.is_valid() {
                pending.push(id);
            } else {
                debug!(id = %id, "invalid id, not looked up");
                results.insert(
                    id.clone(),
                    LicenseData::needs_review(id.clone(), None, Provenance::Unresolved),
                );
            }
        }

        let answers = self.query(&pending).await;

        for id in pending {
            let data = match answers.get(&id.to_string()) {
                Some(Answer::Approved(record)) => LicenseData::resolved(
                    id.clone(),
                    record.license.clone(),
                    Status::Approved,
                    Provenance::Authoritative {
                        authority: record.authority.clone(),
                    },
                ),
                Some(Answer::Restricted(record)) => LicenseData::resolved(
                    id.clone(),
                    record.license.clone(),
                    Status::Restricted,
                    Provenance::Authoritative {
                        authority: record.authority.clone(),
                    },
                ),
                Some(Answer::NoRecord) => self.fallback(id, declared.get(id)),
                None => LicenseData::needs_review(
                    id.clone(),
                    declared.get(id).cloned(),
                    Provenance::Unresolved,
                ),
            };
            results.insert(id.clone(), data);
        }

        info!(
            total = results.len(),
            approved = results.values().filter(|d| d.status == Status::Approved).count(),
            restricted = results.values().filter(|d| d.status == Status::Restricted).count(),
            "classification finished"
        );

        results
    }

    /// Query the source for all ids. Ids missing from the returned map were
    /// not answered (failed batch or timeout).
    async fn query(&self, ids: &[&ContentId]) -> HashMap<String, Answer> {
        let mut answers: HashMap<String, Answer> = HashMap::new();
        if ids.is_empty() {
            return answers;
        }

        let keys: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        let batches: Vec<Vec<String>> = keys
            .chunks(self.settings.batch_size.max(1))
            .map(<[String]>::to_vec)
            .collect();
        debug!(ids = keys.len(), batches = batches.len(), "querying clearance service");

        let progress = self.progress_bar(keys.len() as u64);
        let mut outcomes = stream::iter(batches)
            .map(|batch| self.query_batch(batch))
            .buffer_unordered(self.settings.max_concurrent.max(1));

        let drain = async {
            while let Some((batch, outcome)) = outcomes.next().await {
                match outcome {
                    Ok(response) => {
                        for id in &batch {
                            answers
                                .entry(id.clone())
                                .or_insert_with(|| response.answer_for(id));
                        }
                    }
                    Err(e) => {
                        warn!(ids = batch.len(), error = %e, "lookup failed, batch left for review");
                    }
                }
                progress.inc(batch.len() as u64);
            }
        };

        let finished = tokio::time::timeout(self.settings.timeout, drain).await.is_ok();
        progress.finish_and_clear();

        if !finished {
            warn!(
                answered = answers.len(),
                total = keys.len(),
                "lookup timed out, outstanding ids left for review"
            );
        }

        answers
    }

    /// Send one batch, retrying with exponential backoff.
    async fn query_batch(
        &self,
        batch: Vec<String>,
    ) -> (Vec<String>, Result<ClearanceResponse, TransportError>) {
        let mut attempt: u8 = 0;
        loop {
            match self.source.lookup(&batch).await {
                Ok(response) => return (batch, Ok(response)),
                Err(e) if attempt < self.settings.max_retries => {
                    attempt += 1;
                    let delay = backoff_delay(self.settings.backoff, attempt);
                    debug!(attempt, error = %e, "batch request failed, retrying after {:?}", delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return (batch, Err(e)),
            }
        }
    }

    /// No authoritative record: fall back to the license the manifest declared.
    fn fallback(&self, id: &ContentId, declared: Option<&String>) -> LicenseData {
        let Some(license) = declared else {
            return LicenseData::needs_review(id.clone(), None, Provenance::Unresolved);
        };

        let license = normalize(license);
        if apply_policy(&self.policy, Some(&license)) == PolicyVerdict::Pass {
            LicenseData::resolved(id.clone(), Some(license), Status::Approved, Provenance::Declared)
        } else {
            LicenseData::needs_review(id.clone(), Some(license), Provenance::Declared)
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// saturating at `Duration::MAX`.
fn backoff_delay(base: Duration, attempt: u8) -> Duration {
    let factor = 1u32 << attempt.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
    base.checked_mul(factor).unwrap_or(Duration::MAX)
}
