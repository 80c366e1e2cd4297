// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idea session model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_TOPIC_TITLE: &str = "Untitled";
pub const DEFAULT_CATEGORY: &str = "Other";

/// Stored idea session in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    /// Idea ID (also used as document ID)
    pub id: String,
    /// Owning user ID
    pub created_by: String,
    pub topic_title: String,
    pub category: String,
    /// Free-text ideas recorded in this session, in order
    #[serde(default)]
    pub ideas: Vec<String>,
    #[serde(default)]
    pub viewed: bool,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an idea session.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewIdea {
    #[validate(length(max = 200))]
    pub topic_title: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub ideas: Option<Vec<String>>,
    pub viewed: Option<bool>,
    pub is_liked: Option<bool>,
    #[validate(length(max = 5000))]
    pub comment: Option<String>,
}

/// Partial update of an idea session. Omitted fields keep their stored value.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IdeaPatch {
    #[validate(length(max = 200))]
    pub topic_title: Option<String>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 500))]
    pub ideas: Option<Vec<String>>,
    pub viewed: Option<bool>,
    pub is_liked: Option<bool>,
    #[validate(length(max = 5000))]
    pub comment: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

impl Idea {
    /// Build a new idea owned by `owner`, filling defaults for empty fields.
    pub fn new(id: String, owner: &str, input: NewIdea, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_by: owner.to_string(),
            topic_title: or_default(input.topic_title, DEFAULT_TOPIC_TITLE),
            category: or_default(input.category, DEFAULT_CATEGORY),
            ideas: input.ideas.unwrap_or_default(),
            viewed: input.viewed.unwrap_or(false),
            is_liked: input.is_liked.unwrap_or(false),
            comment: input.comment.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch. A supplied-but-empty title or category falls back to its default.
    pub fn apply(&mut self, patch: IdeaPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.topic_title {
            self.topic_title = or_default(Some(title), DEFAULT_TOPIC_TITLE);
        }
        if let Some(category) = patch.category {
            self.category = or_default(Some(category), DEFAULT_CATEGORY);
        }
        if let Some(ideas) = patch.ideas {
            self.ideas = ideas;
        }
        if let Some(viewed) = patch.viewed {
            self.viewed = viewed;
        }
        if let Some(is_liked) = patch.is_liked {
            self.is_liked = is_liked;
        }
        if let Some(comment) = patch.comment {
            self.comment = comment;
        }
        self.updated_at = now;
    }

    /// Number of idea strings recorded in this session.
    pub fn idea_count(&self) -> u32 {
        self.ideas.len() as u32
    }
}
