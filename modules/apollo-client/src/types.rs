use serde::{Deserialize, Serialize};

/// Body for `POST /people/match`.
#[derive(Debug, Clone, Serialize)]
pub struct PeopleMatchRequest {
    pub linkedin_url: String,
    pub reveal_personal_emails: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeopleMatchResponse {
    pub person: Option<Person>,
}

/// The subset of an Apollo person record the pipeline reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    /// "verified", "guessed", "unavailable", "extrapolated", ...
    pub email_status: Option<String>,
    pub linkedin_url: Option<String>,
    pub organization: Option<Organization>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Organization {
    pub name: Option<String>,
}

impl Person {
    pub fn company_name(&self) -> Option<&str> {
        self.organization.as_ref().and_then(|o| o.name.as_deref())
    }
}
