use serde::{Deserialize, Serialize};

/// A parsed request to process one LinkedIn post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineTrigger {
    pub post_url: String,
}

/// Where status replies for a run are posted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadRef {
    pub channel: String,
    pub thread_ts: Option<String>,
}

impl ThreadRef {
    pub fn new(channel: impl Into<String>, thread_ts: Option<String>) -> Self {
        Self {
            channel: channel.into(),
            thread_ts,
        }
    }
}

/// Raw enrichment backend answer for one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentLookup {
    pub email: Option<String>,
    pub email_status: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Email statuses that never make a contact.
const UNVERIFIED_STATUSES: &[&str] = &["guessed", "unavailable"];

/// A profile resolved to a deliverable email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedContact {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub company_name: String,
    pub linkedin_url: String,
    pub email_status: String,
}

impl EnrichedContact {
    /// Accept a lookup only if it carries a non-empty email with a status
    /// outside the guessed/unavailable classes. `profile_url` fills in the
    /// LinkedIn URL when the backend leaves it out.
    pub fn from_lookup(lookup: EnrichmentLookup, profile_url: &str) -> Option<Self> {
        let email = lookup.email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty())?;
        let status = lookup
            .email_status
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())?;
        if UNVERIFIED_STATUSES.contains(&status.as_str()) {
            return None;
        }

        Some(Self {
            email,
            first_name: lookup.first_name.unwrap_or_default(),
            last_name: lookup.last_name.unwrap_or_default(),
            title: lookup.title.unwrap_or_default(),
            company_name: lookup.company_name.unwrap_or_default(),
            linkedin_url: lookup
                .linkedin_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| profile_url.to_string()),
            email_status: status,
        })
    }
}

/// Outcome of one contact on the per-contact delivery path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub success: bool,
    pub email: String,
    pub error: Option<String>,
}

/// Counts a bulk upload reported. Either may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkCounts {
    pub added: Option<u32>,
    pub failed: Option<u32>,
}

/// What the delivery step achieved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub added: u32,
    pub failed: u32,
    /// Filled only when the bulk upload failed and contacts went one by one.
    pub outcomes: Vec<DeliveryResult>,
}

impl DeliveryReport {
    pub fn used_fallback(&self) -> bool {
        !self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(email: Option<&str>, status: Option<&str>) -> EnrichmentLookup {
        EnrichmentLookup {
            email: email.map(String::from),
            email_status: status.map(String::from),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            ..Default::default()
        }
    }

    #[test]
    fn verified_email_becomes_contact() {
        let found = lookup(Some("ada@example.com"), Some("verified"));
        let contact = EnrichedContact::from_lookup(found, "https://linkedin.com/in/ada").unwrap();
        assert_eq!(contact.email, "ada@example.com");
        assert_eq!(contact.linkedin_url, "https://linkedin.com/in/ada");
        assert_eq!(contact.title, "");
    }

    #[test]
    fn guessed_and_unavailable_are_rejected() {
        for status in ["guessed", "Unavailable"] {
            let found = lookup(Some("a@b.co"), Some(status));
            assert!(EnrichedContact::from_lookup(found, "u").is_none(), "{status}");
        }
    }

    #[test]
    fn missing_email_or_status_is_rejected() {
        assert!(EnrichedContact::from_lookup(lookup(None, Some("verified")), "u").is_none());
        assert!(EnrichedContact::from_lookup(lookup(Some("  "), Some("verified")), "u").is_none());
        assert!(EnrichedContact::from_lookup(lookup(Some("a@b.co"), None), "u").is_none());
    }

    #[test]
    fn backend_linkedin_url_wins_over_input() {
        let mut l = lookup(Some("a@b.co"), Some("verified"));
        l.linkedin_url = Some("http://www.linkedin.com/in/ada".into());
        let contact = EnrichedContact::from_lookup(l, "https://linkedin.com/in/ada").unwrap();
        assert_eq!(contact.linkedin_url, "http://www.linkedin.com/in/ada");
    }
}
