// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidateEmail, ValidationError};

pub const DEFAULT_USER_IMAGE: &str = "https://res.cloudinary.com/sixty-seconds-idea-training-project/image/upload/v1656157889/users/default-user-image_LYizIFTei_ioicfh.png";
const DEFAULT_IMAGE_ABOUT: &str = "default";

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Profile image embedded in a user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Short description of the image
    #[serde(default)]
    pub about: String,
    #[validate(url)]
    pub url: String,
    /// Asset identifier at the image host, when uploaded through the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl Image {
    pub fn default_image() -> Self {
        Self {
            about: DEFAULT_IMAGE_ABOUT.to_string(),
            url: DEFAULT_USER_IMAGE.to_string(),
            public_id: None,
        }
    }
}

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID (also used as document ID)
    pub id: String,
    /// Firebase account UID
    pub firebase_uid: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update. Omitted or blank text fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(nested, length(max = 20))]
    pub images: Option<Vec<Image>>,
}

fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl User {
    /// Build a new user with the default role and profile image.
    pub fn new(
        id: String,
        firebase_uid: String,
        first_name: String,
        last_name: String,
        email: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            firebase_uid,
            first_name,
            last_name,
            email,
            role: Role::default(),
            images: vec![Image::default_image()],
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch. An explicitly empty image list resets to the default image.
    pub fn apply(&mut self, patch: UserPatch, now: DateTime<Utc>) {
        if let Some(email) = non_blank(patch.email) {
            self.email = email;
        }
        if let Some(first_name) = non_blank(patch.first_name) {
            self.first_name = first_name;
        }
        if let Some(last_name) = non_blank(patch.last_name) {
            self.last_name = last_name;
        }
        if let Some(images) = patch.images {
            self.images = if images.is_empty() {
                vec![Image::default_image()]
            } else {
                images
            };
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_user() -> User {
        User::new(
            "u1".to_string(),
            "fb-uid".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            "ada@example.com".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_user_defaults() {
        let user = test_user();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.images, vec![Image::default_image()]);
        assert_eq!(user.images[0].about, "default");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
    }

    #[test]
    fn test_patch_ignores_blank_fields() {
        let mut user = test_user();
        user.apply(
            UserPatch {
                email: Some(String::new()),
                first_name: Some("Grace".to_string()),
                last_name: Some("   ".to_string()),
                images: None,
            },
            Utc::now(),
        );

        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.first_name, "Grace");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.images.len(), 1);
    }

    #[test]
    fn test_patch_images() {
        let mut user = test_user();
        let image = Image {
            about: "avatar".to_string(),
            url: "https://example.com/a.png".to_string(),
            public_id: Some("users/a".to_string()),
        };
        user.apply(
            UserPatch {
                images: Some(vec![image.clone()]),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(user.images, vec![image]);

        user.apply(
            UserPatch {
                images: Some(vec![]),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(user.images, vec![Image::default_image()]);
    }

    #[test]
    fn test_patch_validation() {
        let patch = UserPatch {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UserPatch {
            email: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());

        let patch = UserPatch {
            images: Some(vec![Image {
                about: "bad".to_string(),
                url: "not a url".to_string(),
                public_id: None,
            }]),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
