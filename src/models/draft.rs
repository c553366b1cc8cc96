//! Draft model: the single in-progress form record.

use serde::{Deserialize, Serialize};

/// Named text attributes of a draft.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    FullName,
    TeamName,
    RoleTag,
    GithubProfile,
    LinkedinProfile,
    PersonalWebsite,
}

impl DraftField {
    /// Fields that must be non-empty for a submission to pass validation.
    pub const REQUIRED: [DraftField; 5] = [
        DraftField::FullName,
        DraftField::TeamName,
        DraftField::RoleTag,
        DraftField::GithubProfile,
        DraftField::LinkedinProfile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::FullName => "fullName",
            DraftField::TeamName => "teamName",
            DraftField::RoleTag => "roleTag",
            DraftField::GithubProfile => "githubProfile",
            DraftField::LinkedinProfile => "linkedinProfile",
            DraftField::PersonalWebsite => "personalWebsite",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fullName" => Some(DraftField::FullName),
            "teamName" => Some(DraftField::TeamName),
            "roleTag" => Some(DraftField::RoleTag),
            "githubProfile" => Some(DraftField::GithubProfile),
            "linkedinProfile" => Some(DraftField::LinkedinProfile),
            "personalWebsite" => Some(DraftField::PersonalWebsite),
            _ => None,
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, DraftField::PersonalWebsite)
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded profile image. The raw bytes stay in memory and are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImage {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// An image together with its displayable preview.
///
/// Keeping both in one value means a draft can never hold an image without a
/// preview or the other way around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePicture {
    pub profile_image: ProfileImage,
    /// `data:` URI suitable for an `<img src>`.
    pub profile_image_preview: String,
}

/// The mutable form record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub full_name: String,
    pub team_name: String,
    pub role_tag: String,
    pub github_profile: String,
    pub linkedin_profile: String,
    pub personal_website: String,
    #[serde(flatten)]
    pub picture: Option<ProfilePicture>,
}

impl Draft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::FullName => &self.full_name,
            DraftField::TeamName => &self.team_name,
            DraftField::RoleTag => &self.role_tag,
            DraftField::GithubProfile => &self.github_profile,
            DraftField::LinkedinProfile => &self.linkedin_profile,
            DraftField::PersonalWebsite => &self.personal_website,
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::FullName => &mut self.full_name,
            DraftField::TeamName => &mut self.team_name,
            DraftField::RoleTag => &mut self.role_tag,
            DraftField::GithubProfile => &mut self.github_profile,
            DraftField::LinkedinProfile => &mut self.linkedin_profile,
            DraftField::PersonalWebsite => &mut self.personal_website,
        };
        *slot = value;
    }

    /// Required fields that are empty, in form order. Whitespace counts as a value.
    pub fn missing_required(&self) -> Vec<DraftField> {
        DraftField::REQUIRED
            .into_iter()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }

    pub fn profile_image(&self) -> Option<&ProfileImage> {
        self.picture.as_ref().map(|p| &p.profile_image)
    }

    pub fn profile_image_preview(&self) -> Option<&str> {
        self.picture
            .as_ref()
            .map(|p| p.profile_image_preview.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in DraftField::REQUIRED
            .into_iter()
            .chain([DraftField::PersonalWebsite])
        {
            assert_eq!(DraftField::parse(field.as_str()), Some(field));
        }
        assert_eq!(DraftField::parse("profileImage"), None);
        assert_eq!(DraftField::parse("FullName"), None);
    }

    #[test]
    fn test_personal_website_is_optional() {
        assert!(!DraftField::PersonalWebsite.is_required());
        assert!(DraftField::REQUIRED.iter().all(|f| f.is_required()));
    }

    #[test]
    fn test_missing_required_lists_blank_fields() {
        let mut draft = Draft::default();
        assert_eq!(draft.missing_required(), DraftField::REQUIRED.to_vec());

        draft.set(DraftField::FullName, "Ada".to_string());
        draft.set(DraftField::TeamName, String::new());
        let missing = draft.missing_required();
        assert!(!missing.contains(&DraftField::FullName));
        assert!(missing.contains(&DraftField::TeamName));
    }

    #[test]
    fn test_whitespace_values_are_accepted() {
        let mut draft = Draft::default();
        for field in DraftField::REQUIRED {
            draft.set(field, " ".to_string());
        }
        assert!(draft.missing_required().is_empty());
    }

    #[test]
    fn test_draft_serializes_without_picture_fields_when_absent() {
        let value = serde_json::to_value(Draft::default()).unwrap();
        assert_eq!(value["fullName"], "");
        assert!(value.get("profileImage").is_none());
        assert!(value.get("profileImagePreview").is_none());
    }

    #[test]
    fn test_picture_serializes_metadata_but_not_bytes() {
        let draft = Draft {
            picture: Some(ProfilePicture {
                profile_image: ProfileImage {
                    file_name: "ada.png".to_string(),
                    content_type: "image/png".to_string(),
                    size: 3,
                    bytes: vec![1, 2, 3],
                },
                profile_image_preview: "data:image/png;base64,AQID".to_string(),
            }),
            ..Draft::default()
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["profileImage"]["fileName"], "ada.png");
        assert_eq!(value["profileImage"]["size"], 3);
        assert!(value["profileImage"].get("bytes").is_none());
        assert_eq!(value["profileImagePreview"], "data:image/png;base64,AQID");
        assert_eq!(draft.profile_image_preview(), Some("data:image/png;base64,AQID"));
    }
}
