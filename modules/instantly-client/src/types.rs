use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A campaign lead. Anything beyond email and name travels in `custom_variables`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_variables: BTreeMap<String, String>,
}

/// Body for `POST /leads/add`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkLeadsRequest<'a> {
    pub campaign_id: &'a str,
    pub skip_if_in_workspace: bool,
    pub leads: &'a [Lead],
}

/// Body for `POST /leads`.
#[derive(Debug, Clone, Serialize)]
pub struct SingleLeadRequest<'a> {
    pub campaign: &'a str,
    #[serde(flatten)]
    pub lead: &'a Lead,
}

/// Counts reported after a bulk upload. Instantly omits fields it has nothing
/// to report on, so every count is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkLeadsResponse {
    pub status: Option<String>,
    pub total_sent: Option<u32>,
    pub leads_uploaded: Option<u32>,
    pub invalid_email_count: Option<u32>,
    pub duplicate_email_count: Option<u32>,
    pub in_blocklist: Option<u32>,
}

impl BulkLeadsResponse {
    /// Leads the campaign rejected outright.
    pub fn rejected(&self) -> Option<u32> {
        match (self.invalid_email_count, self.in_blocklist) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
        }
    }
}
