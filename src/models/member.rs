//! Member record model and its card view.

use serde::{Deserialize, Serialize};

use super::{Draft, ProfilePicture};

/// A finalized submission. Records are created once and never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub id: String,
    pub full_name: String,
    pub team_name: String,
    pub role_tag: String,
    pub github_profile: String,
    pub linkedin_profile: String,
    pub personal_website: String,
    #[serde(flatten)]
    pub picture: Option<ProfilePicture>,
    pub submitted_at: String,
}

impl MemberRecord {
    /// Build a record from a copy of the draft's values.
    pub fn from_draft(id: String, draft: &Draft, submitted_at: String) -> Self {
        Self {
            id,
            full_name: draft.full_name.clone(),
            team_name: draft.team_name.clone(),
            role_tag: draft.role_tag.clone(),
            github_profile: draft.github_profile.clone(),
            linkedin_profile: draft.linkedin_profile.clone(),
            personal_website: draft.personal_website.clone(),
            picture: draft.picture.clone(),
            submitted_at,
        }
    }

    pub fn card(&self) -> MemberCard {
        let links = [
            (LinkKind::Github, &self.github_profile),
            (LinkKind::Linkedin, &self.linkedin_profile),
            (LinkKind::Website, &self.personal_website),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(kind, value)| ProfileLink {
            kind,
            href: normalize_href(value),
        })
        .collect();

        MemberCard {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            team_name: self.team_name.clone(),
            role_tag: self.role_tag.clone(),
            avatar: self
                .picture
                .as_ref()
                .map(|p| p.profile_image_preview.clone()),
            links,
        }
    }
}

/// Kind of social link shown on a card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Github,
    Linkedin,
    Website,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileLink {
    pub kind: LinkKind,
    pub href: String,
}

/// Display model for a submitted member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberCard {
    pub id: String,
    pub full_name: String,
    pub team_name: String,
    pub role_tag: String,
    /// Preview URI when a picture was attached; the UI falls back to a placeholder icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub links: Vec<ProfileLink>,
}

/// Prefix `https://` unless the value already starts with `http`.
pub fn normalize_href(value: &str) -> String {
    if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}
