//! Outbound client for a remote team-member API.
//!
//! Not called by the submission pipeline; the in-memory member list is the
//! source of truth. Callers that want to forward a committed record can use
//! this client directly.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;

use crate::errors::NetworkError;

/// Path the member payload is posted to.
pub const TEAM_MEMBERS_PATH: &str = "/api/team-members";

#[derive(Debug, Clone)]
pub struct TeamMemberClient {
    http: Client,
    base_url: String,
}

impl TeamMemberClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// POST a member payload as JSON and return the decoded response body.
    ///
    /// Any non-2xx status is an error.
    pub async fn submit_team_member<T>(&self, member: &T) -> Result<serde_json::Value, NetworkError>
    where
        T: Serialize + ?Sized,
    {
        let result = self.post_member(member).await;
        if let Err(err) = &result {
            tracing::error!("Error submitting team member: {}", err);
        }
        result
    }

    async fn post_member<T>(&self, member: &T) -> Result<serde_json::Value, NetworkError>
    where
        T: Serialize + ?Sized,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, TEAM_MEMBERS_PATH))
            .header(CONTENT_TYPE, "application/json")
            .json(member)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status { status });
        }

        Ok(response.json().await?)
    }
}
