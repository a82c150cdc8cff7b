use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use instantly_client::{InstantlyClient, Lead};

use crate::traits::DeliveryBackend;
use crate::types::{BulkCounts, EnrichedContact};

/// Pushes contacts into an Instantly campaign.
pub struct InstantlyDelivery {
    client: InstantlyClient,
}

impl InstantlyDelivery {
    pub fn new(client: InstantlyClient) -> Self {
        Self { client }
    }
}

/// Email and name go top-level; everything else rides in custom variables.
pub fn contact_to_lead(contact: &EnrichedContact) -> Lead {
    let mut custom_variables = BTreeMap::new();
    for (key, value) in [
        ("company", &contact.company_name),
        ("title", &contact.title),
        ("linkedin_url", &contact.linkedin_url),
    ] {
        if !value.is_empty() {
            custom_variables.insert(key.to_string(), value.clone());
        }
    }
    custom_variables.insert("source".to_string(), "linkedin_engagement".to_string());

    Lead {
        email: contact.email.clone(),
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        custom_variables,
    }
}

#[async_trait]
impl DeliveryBackend for InstantlyDelivery {
    async fn submit_bulk(&self, contacts: &[EnrichedContact]) -> Result<BulkCounts> {
        let leads: Vec<Lead> = contacts.iter().map(contact_to_lead).collect();
        let resp = self.client.add_leads(&leads).await?;
        Ok(BulkCounts {
            added: resp.leads_uploaded,
            failed: resp.rejected(),
        })
    }

    async fn submit_one(&self, contact: &EnrichedContact) -> Result<()> {
        Ok(self.client.add_lead(&contact_to_lead(contact)).await?)
    }
}
