// Test mocks for the pipeline.
//
// One mock per trait boundary:
// - MockScraper (Scraper): fixed records or a fixed failure
// - MockEnricher (Enricher): URL to scripted replies, tracks concurrency
// - MockDelivery (DeliveryBackend): optional bulk failure, per-email rejects
// - MockNotifier (Notifier): records every message
// - RecordingThrottle (Throttle): records pauses, never sleeps
//
// Plus helpers for building engagement records and lookups.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::stats::RunStatistics;
use crate::traits::{DeliveryBackend, EnrichError, Enricher, Notifier, Scraper, Throttle};
use crate::types::{BulkCounts, EnrichedContact, EnrichmentLookup, ThreadRef};

// ---------------------------------------------------------------------------
// MockScraper
// ---------------------------------------------------------------------------

pub struct MockScraper {
    records: Vec<Value>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockScraper {
    pub fn returning(records: Vec<Value>) -> Self {
        Self {
            records,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            records: Vec::new(),
            failure: Some(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn post_engagers(&self, _post_url: &str) -> Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(reason) => bail!("{reason}"),
            None => Ok(self.records.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// MockEnricher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Reply {
    Found(EnrichmentLookup),
    Missing,
    RateLimited,
    Fail(String),
}

/// Scripted enricher. Each URL has a queue of replies; the last reply
/// repeats once the queue is down to one. Unknown URLs are a miss.
#[derive(Default)]
pub struct MockEnricher {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, profile_url: &str, replies: Vec<Reply>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(profile_url.to_string(), replies.into());
        self
    }

    /// Answer `profile_url` with a verified email.
    pub fn verified(self, profile_url: &str, email: &str) -> Self {
        self.on(profile_url, vec![Reply::Found(lookup(email, "verified"))])
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, profile_url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == profile_url).count()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn next_reply(&self, profile_url: &str) -> Reply {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(profile_url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Missing),
            Some(queue) => queue.front().cloned().unwrap_or(Reply::Missing),
            None => Reply::Missing,
        }
    }
}

#[async_trait]
impl Enricher for MockEnricher {
    async fn enrich_one(&self, profile_url: &str) -> Result<Option<EnrichmentLookup>, EnrichError> {
        self.calls.lock().unwrap().push(profile_url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        // Let sibling lookups in the same wave start before this one settles.
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.next_reply(profile_url) {
            Reply::Found(lookup) => Ok(Some(lookup)),
            Reply::Missing => Ok(None),
            Reply::RateLimited => Err(EnrichError::RateLimited),
            Reply::Fail(reason) => Err(EnrichError::Failed(reason)),
        }
    }
}

// ---------------------------------------------------------------------------
// MockDelivery
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockDelivery {
    bulk_failure: Option<String>,
    bulk_counts: Option<BulkCounts>,
    rejected: HashSet<String>,
    bulk_calls: Mutex<Vec<Vec<String>>>,
    single_calls: Mutex<Vec<String>>,
}

impl MockDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk uploads fail with `reason`.
    pub fn bulk_fails(mut self, reason: &str) -> Self {
        self.bulk_failure = Some(reason.to_string());
        self
    }

    /// Bulk uploads report these counts.
    pub fn bulk_reports(mut self, counts: BulkCounts) -> Self {
        self.bulk_counts = Some(counts);
        self
    }

    /// Single uploads for `email` are rejected.
    pub fn rejects(mut self, email: &str) -> Self {
        self.rejected.insert(email.to_string());
        self
    }

    pub fn bulk_calls(&self) -> Vec<Vec<String>> {
        self.bulk_calls.lock().unwrap().clone()
    }

    pub fn single_calls(&self) -> Vec<String> {
        self.single_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryBackend for MockDelivery {
    async fn submit_bulk(&self, contacts: &[EnrichedContact]) -> Result<BulkCounts> {
        self.bulk_calls
            .lock()
            .unwrap()
            .push(contacts.iter().map(|c| c.email.clone()).collect());
        if let Some(reason) = &self.bulk_failure {
            bail!("{reason}");
        }
        Ok(self.bulk_counts.unwrap_or_default())
    }

    async fn submit_one(&self, contact: &EnrichedContact) -> Result<()> {
        self.single_calls.lock().unwrap().push(contact.email.clone());
        if self.rejected.contains(&contact.email) {
            bail!("lead rejected: {}", contact.email);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockNotifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Status(String),
    Summary(RunStatistics),
    Error(String),
}

#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Status(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<RunStatistics> {
        self.sent()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Summary(stats) => Some(stats),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|n| match n {
                Notification::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_status(&self, _thread: &ThreadRef, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Notification::Status(text.to_string()));
        Ok(())
    }

    async fn send_summary(&self, _thread: &ThreadRef, stats: &RunStatistics) -> Result<()> {
        self.sent.lock().unwrap().push(Notification::Summary(*stats));
        Ok(())
    }

    async fn send_error(&self, _thread: &ThreadRef, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(Notification::Error(text.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RecordingThrottle
// ---------------------------------------------------------------------------

/// Records requested pauses and returns immediately.
#[derive(Default)]
pub struct RecordingThrottle {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn count_of(&self, duration: Duration) -> usize {
        self.pauses().iter().filter(|d| **d == duration).count()
    }
}

#[async_trait]
impl Throttle for RecordingThrottle {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn thread() -> ThreadRef {
    ThreadRef::new("C0TEST", Some("1700000000.000100".to_string()))
}

pub fn lookup(email: &str, status: &str) -> EnrichmentLookup {
    let local = email.split('@').next().unwrap_or_default();
    EnrichmentLookup {
        email: Some(email.to_string()),
        email_status: Some(status.to_string()),
        first_name: Some(local.to_string()),
        last_name: Some("Test".to_string()),
        title: Some("Founder".to_string()),
        company_name: Some("Acme".to_string()),
        linkedin_url: None,
    }
}

pub fn contact(email: &str) -> EnrichedContact {
    EnrichedContact::from_lookup(lookup(email, "verified"), "https://www.linkedin.com/in/test")
        .expect("verified lookup always yields a contact")
}

/// Canonical profile URL for a short handle.
pub fn profile(handle: &str) -> String {
    format!("https://www.linkedin.com/in/{handle}")
}

/// A post record with the given reactor and commenter profile URLs.
pub fn post_record(reactors: &[&str], commenters: &[&str]) -> Value {
    let reactions: Vec<Value> = reactors
        .iter()
        .map(|u| json!({ "reactor": { "profileUrl": u } }))
        .collect();
    let comments: Vec<Value> = commenters
        .iter()
        .map(|u| json!({ "text": "nice", "author": { "url": u } }))
        .collect();
    json!({
        "postUrl": "https://www.linkedin.com/posts/foo-activity-123",
        "reactions": reactions,
        "comments": comments,
    })
}

/// A one-engager dataset item, as per-reaction actors emit.
pub fn engager_row(profile_url: &str) -> Value {
    json!({ "reactionType": "LIKE", "actor": { "linkedinUrl": profile_url } })
}
