pub mod error;
pub mod types;

pub use error::{ApolloError, Result};
pub use types::{Organization, PeopleMatchRequest, PeopleMatchResponse, Person};

use std::time::Duration;

const BASE_URL: &str = "https://api.apollo.io/api/v1";

pub struct ApolloClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ApolloClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Look up a person by LinkedIn profile URL.
    ///
    /// Returns `Ok(None)` when Apollo has no match. HTTP 429 is reported as
    /// [`ApolloError::RateLimited`] so callers can back off and retry.
    pub async fn match_by_linkedin(&self, linkedin_url: &str) -> Result<Option<Person>> {
        let url = format!("{}/people/match", self.base_url);
        let body = PeopleMatchRequest {
            linkedin_url: linkedin_url.to_string(),
            reveal_personal_emails: false,
        };

        let resp = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Cache-Control", "no-cache")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::debug!(linkedin_url, "Apollo rate limit hit");
            return Err(ApolloError::RateLimited);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ApolloError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        let parsed: PeopleMatchResponse = serde_json::from_str(&text)?;
        Ok(parsed.person)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> ApolloClient {
        ApolloClient::new("apollo-key".to_string()).with_base_url(&server.base_url())
    }

    #[tokio::test]
    async fn match_returns_person_with_organization() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/people/match")
                .header("x-api-key", "apollo-key")
                .json_body(json!({
                    "linkedin_url": "https://www.linkedin.com/in/ada",
                    "reveal_personal_emails": false
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "person": {
                        "id": "p1",
                        "first_name": "Ada",
                        "last_name": "Lovelace",
                        "email": "ada@engines.io",
                        "email_status": "verified",
                        "organization": { "name": "Engines Ltd" }
                    }
                }));
        });

        let person = client_for(&server)
            .match_by_linkedin("https://www.linkedin.com/in/ada")
            .await
            .expect("match should succeed")
            .expect("person should be present");

        mock.assert();
        assert_eq!(person.email.as_deref(), Some("ada@engines.io"));
        assert_eq!(person.company_name(), Some("Engines Ltd"));
    }

    #[tokio::test]
    async fn no_match_is_none() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/people/match");
            then.status(200).json_body(json!({ "person": null }));
        });

        let person = client_for(&server)
            .match_by_linkedin("https://www.linkedin.com/in/nobody")
            .await
            .expect("match should succeed");
        assert!(person.is_none());
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/people/match");
            then.status(429).body("slow down");
        });

        let err = client_for(&server)
            .match_by_linkedin("https://www.linkedin.com/in/ada")
            .await
            .expect_err("429 should fail");
        assert!(matches!(err, ApolloError::RateLimited));
    }

    #[tokio::test]
    async fn other_failures_carry_status_and_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/people/match");
            then.status(422).body("invalid linkedin_url");
        });

        let err = client_for(&server)
            .match_by_linkedin("not-a-profile")
            .await
            .expect_err("422 should fail");
        assert!(matches!(
            err,
            ApolloError::Api { status: 422, ref message } if message.contains("invalid")
        ));
    }
}
