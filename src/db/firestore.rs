// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles, looked up by id or email)
//! - Ideas (journaling sessions and the query shapes behind the stats views)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Idea, IdeaFilter, SortOrder, User};
use chrono::{DateTime, Utc};
use firestore::{FirestoreQueryDirection, FirestoreTimestamp};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

fn db_err(e: impl std::fmt::Display) -> AppError {
    AppError::Database(e.to_string())
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator takes an unauthenticated connection; skip credential lookup.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a new user. Fails if the document already exists.
    pub async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(db_err)
    }

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(db_err)
    }

    /// Get a user by email address.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(db_err)?;

        Ok(users.into_iter().next())
    }

    /// Get a user by the UID of their Firebase account.
    pub async fn get_user_by_firebase_uid(&self, uid: &str) -> Result<Option<User>, AppError> {
        let uid = uid.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("firebaseUid").eq(uid.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(db_err)?;

        Ok(users.into_iter().next())
    }

    /// Overwrite a stored user document.
    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    // ─── Idea Operations ─────────────────────────────────────────

    /// Insert a new idea session.
    pub async fn insert_idea(&self, idea: &Idea) -> Result<Idea, AppError> {
        self.get_client()?
            .fluent()
            .insert()
            .into(collections::IDEAS)
            .document_id(&idea.id)
            .object(idea)
            .execute()
            .await
            .map_err(db_err)
    }

    /// Get an idea by id.
    pub async fn get_idea(&self, idea_id: &str) -> Result<Option<Idea>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::IDEAS)
            .obj()
            .one(idea_id)
            .await
            .map_err(db_err)
    }

    /// Overwrite a stored idea document.
    pub async fn update_idea(&self, idea: &Idea) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::IDEAS)
            .document_id(&idea.id)
            .object(idea)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Delete an idea by id.
    pub async fn delete_idea(&self, idea_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::IDEAS)
            .document_id(idea_id)
            .execute()
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// All ideas owned by a user, newest first.
    pub async fn list_ideas(&self, owner: &str) -> Result<Vec<Idea>, AppError> {
        let owner = owner.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::IDEAS)
            .filter(move |q| q.for_all([q.field("createdBy").eq(owner.clone())]))
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    /// The `limit` most recently created ideas of a user.
    pub async fn recent_ideas(&self, owner: &str, limit: u32) -> Result<Vec<Idea>, AppError> {
        let owner = owner.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::IDEAS)
            .filter(move |q| q.for_all([q.field("createdBy").eq(owner.clone())]))
            .order_by([("createdAt", FirestoreQueryDirection::Descending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    /// Ideas of a user created in `[from, to)`; an open bound is unrestricted.
    pub async fn ideas_created_between(
        &self,
        owner: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Idea>, AppError> {
        let owner = owner.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::IDEAS)
            .filter(move |q| {
                q.for_all([
                    q.field("createdBy").eq(owner.clone()),
                    from.and_then(|from| {
                        q.field("createdAt")
                            .greater_than_or_equal(FirestoreTimestamp(from))
                    }),
                    to.and_then(|to| q.field("createdAt").less_than(FirestoreTimestamp(to))),
                ])
            })
            .order_by([("createdAt", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }

    /// Whether the user created at least one idea in `[from, to)`.
    pub async fn idea_exists_between(
        &self,
        owner: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let owner = owner.to_string();
        let found: Vec<Idea> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::IDEAS)
            .filter(move |q| {
                q.for_all([
                    q.field("createdBy").eq(owner.clone()),
                    q.field("createdAt")
                        .greater_than_or_equal(FirestoreTimestamp(from)),
                    q.field("createdAt").less_than(FirestoreTimestamp(to)),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(db_err)?;

        Ok(!found.is_empty())
    }

    /// Ideas matching the database-side part of a search, sorted by creation time.
    ///
    /// Free-text matching and paging happen in memory on the result.
    pub async fn search_ideas(&self, filter: &IdeaFilter) -> Result<Vec<Idea>, AppError> {
        let IdeaFilter {
            owner,
            category,
            created_from,
            created_to,
            liked_only,
            order,
        } = filter.clone();

        let direction = match order {
            SortOrder::NewestFirst => FirestoreQueryDirection::Descending,
            SortOrder::OldestFirst => FirestoreQueryDirection::Ascending,
        };

        self.get_client()?
            .fluent()
            .select()
            .from(collections::IDEAS)
            .filter(move |q| {
                q.for_all([
                    q.field("createdBy").eq(owner.clone()),
                    category
                        .clone()
                        .and_then(|category| q.field("category").eq(category)),
                    if liked_only {
                        q.field("isLiked").eq(true)
                    } else {
                        None
                    },
                    created_from.and_then(|from| {
                        q.field("createdAt")
                            .greater_than_or_equal(FirestoreTimestamp(from))
                    }),
                    created_to.and_then(|to| {
                        q.field("createdAt")
                            .less_than_or_equal(FirestoreTimestamp(to))
                    }),
                ])
            })
            .order_by([("createdAt", direction)])
            .obj()
            .query()
            .await
            .map_err(db_err)
    }
}
