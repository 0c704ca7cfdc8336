//! In-process [`DataSource`] backed by a fixed list of entries.
//!
//! The catalog stands in for a remote search service: it answers both lookup
//! kinds with simple case-insensitive text matching, can be slowed down to
//! emulate network latency, and honours cancellation while it waits.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::SourceError;
use crate::source::{DataSource, cancellable};
use crate::types::{GeoPoint, ResultsRequest, SearchResult, Suggestion};

const DEFAULT_MAX_SUGGESTIONS: usize = 8;

/// One searchable record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub location: Option<GeoPoint>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || self
                .summary
                .as_deref()
                .is_some_and(|summary| contains_folded(summary, needle))
            || self.tags.iter().any(|tag| contains_folded(tag, needle))
    }
}

/// Behavioural knobs for a [`Catalog`].
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub suggest_latency: Duration,
    pub results_latency: Duration,
    pub max_suggestions: usize,
    /// When set, every lookup fails with this transport message.
    pub failure: Option<String>,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            suggest_latency: Duration::ZERO,
            results_latency: Duration::ZERO,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            failure: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    options: CatalogOptions,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            options: CatalogOptions::default(),
        }
    }

    /// Parse a JSON array of entries.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(text)?;
        Ok(Self::new(entries))
    }

    #[must_use]
    pub fn with_options(mut self, options: CatalogOptions) -> Self {
        self.options = options;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct titles and tags for `query`; prefix matches come before infix ones.
    pub fn suggest(&self, query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let candidates = self.entries.iter().flat_map(|entry| {
            std::iter::once((entry.title.as_str(), "title"))
                .chain(entry.tags.iter().map(|tag| (tag.as_str(), "tag")))
        });

        let mut prefix = Vec::new();
        let mut infix = Vec::new();
        let mut seen = HashSet::new();
        for (text, kind) in candidates {
            let folded = text.to_lowercase();
            if !folded.contains(&needle) || !seen.insert(folded.clone()) {
                continue;
            }
            let suggestion = Suggestion::new(text).with_kind(kind);
            if folded.starts_with(&needle) {
                prefix.push(suggestion);
            } else {
                infix.push(suggestion);
            }
        }

        prefix
            .into_iter()
            .chain(infix)
            .take(self.options.max_suggestions)
            .collect()
    }

    /// Entries mentioning the query that satisfy the request filters, ordered by
    /// `request.sort_key`.
    pub fn search(&self, request: &ResultsRequest) -> Vec<SearchResult> {
        let needle = request.query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(&CatalogEntry, Option<f64>)> = self
            .entries
            .iter()
            .filter(|entry| entry.mentions(&needle))
            .filter(|entry| request.filters.matches(&entry.attributes))
            .map(|entry| {
                let distance = request
                    .location
                    .zip(entry.location)
                    .map(|(origin, at)| origin.distance_km(&at));
                (entry, distance)
            })
            .collect();

        match request.sort_key.as_str() {
            "title" => hits.sort_by(|a, b| compare_titles(a.0, b.0)),
            "distance" if request.location.is_some() => {
                hits.sort_by(|a, b| {
                    compare_distance(a.1, b.1).then_with(|| compare_titles(a.0, b.0))
                })
            }
            "relevance" | "distance" => hits.sort_by(|a, b| compare_relevance(&needle, a.0, b.0)),
            other => {
                tracing::debug!(sort_key = other, "unknown sort key, using relevance");
                hits.sort_by(|a, b| compare_relevance(&needle, a.0, b.0));
            }
        }

        hits.into_iter()
            .map(|(entry, distance_km)| SearchResult {
                id: entry.id.clone(),
                title: entry.title.clone(),
                summary: entry.summary.clone(),
                distance_km,
            })
            .collect()
    }

    fn check_failure(&self) -> Result<(), SourceError> {
        match &self.options.failure {
            Some(message) => Err(SourceError::transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataSource for Catalog {
    async fn fetch_suggestions(
        &self,
        query: &str,
        _lang: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<Suggestion>, SourceError> {
        cancellable(&cancel, async {
            tokio::time::sleep(self.options.suggest_latency).await;
            self.check_failure()?;
            Ok(self.suggest(query))
        })
        .await
    }

    async fn fetch_results(
        &self,
        request: &ResultsRequest,
        cancel: CancellationToken,
    ) -> Result<Vec<SearchResult>, SourceError> {
        cancellable(&cancel, async {
            tokio::time::sleep(self.options.results_latency).await;
            self.check_failure()?;
            Ok(self.search(request))
        })
        .await
    }
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

fn compare_titles(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_relevance(needle: &str, a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    let rank = |entry: &CatalogEntry| {
        let title = entry.title.to_lowercase();
        if title.starts_with(needle) {
            0
        } else if title.contains(needle) {
            1
        } else {
            2
        }
    };
    rank(a).cmp(&rank(b)).then_with(|| compare_titles(a, b))
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
