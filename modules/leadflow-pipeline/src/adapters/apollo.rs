use apollo_client::{ApolloClient, ApolloError, Person};
use async_trait::async_trait;

use crate::traits::{EnrichError, Enricher};
use crate::types::EnrichmentLookup;

/// Enriches profiles through Apollo's people match endpoint.
pub struct ApolloEnricher {
    client: ApolloClient,
}

impl ApolloEnricher {
    pub fn new(client: ApolloClient) -> Self {
        Self { client }
    }
}

fn lookup_from_person(person: Person) -> EnrichmentLookup {
    let company_name = person.company_name().map(String::from);
    EnrichmentLookup {
        email: person.email,
        email_status: person.email_status,
        first_name: person.first_name,
        last_name: person.last_name,
        title: person.title,
        company_name,
        linkedin_url: person.linkedin_url,
    }
}

#[async_trait]
impl Enricher for ApolloEnricher {
    async fn enrich_one(&self, profile_url: &str) -> Result<Option<EnrichmentLookup>, EnrichError> {
        match self.client.match_by_linkedin(profile_url).await {
            Ok(person) => Ok(person.map(lookup_from_person)),
            Err(ApolloError::RateLimited) => Err(EnrichError::RateLimited),
            Err(e) => Err(EnrichError::Failed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_client::Organization;

    #[test]
    fn person_maps_company_from_organization() {
        let person = Person {
            email: Some("ada@example.com".into()),
            email_status: Some("verified".into()),
            organization: Some(Organization {
                name: Some("Engines Ltd".into()),
            }),
            ..Default::default()
        };
        let lookup = lookup_from_person(person);
        assert_eq!(lookup.company_name.as_deref(), Some("Engines Ltd"));
        assert_eq!(lookup.email_status.as_deref(), Some("verified"));
    }
}
