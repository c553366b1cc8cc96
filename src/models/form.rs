//! Request and response bodies for the form endpoints.

use serde::{Deserialize, Serialize};

use super::Draft;

/// Submission state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Validating,
    Failed,
    Pending,
    Committed,
}

impl SubmissionStatus {
    /// Whether a new submission must be refused.
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionStatus::Validating | SubmissionStatus::Pending)
    }
}

/// Everything a UI needs to render the form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub draft: Draft,
    pub status: SubmissionStatus,
    pub is_submitting: bool,
    pub success_visible: bool,
}

/// Request body for setting a single text field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFieldRequest {
    #[serde(default)]
    pub value: String,
}

/// Request body for attaching a profile image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetImageRequest {
    pub file_name: String,
    pub content_type: String,
    /// Base64-encoded file contents.
    pub data: String,
}

/// Values offered in the team and role pickers. Free text is still accepted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSuggestions {
    pub teams: Vec<&'static str>,
    pub roles: Vec<&'static str>,
}

pub const PREDEFINED_TEAMS: [&str; 6] = [
    "Frontend Team",
    "Backend Team",
    "Mobile Team",
    "DevOps Team",
    "Design Team",
    "Data Team",
];

pub const PREDEFINED_ROLES: [&str; 8] = [
    "Developer",
    "Senior Developer",
    "Lead Developer",
    "Designer",
    "UI/UX Designer",
    "Product Manager",
    "DevOps Engineer",
    "Data Scientist",
];

impl Default for FormSuggestions {
    fn default() -> Self {
        Self {
            teams: PREDEFINED_TEAMS.to_vec(),
            roles: PREDEFINED_ROLES.to_vec(),
        }
    }
}
