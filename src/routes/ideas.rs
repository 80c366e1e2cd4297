// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idea session routes: CRUD plus the aggregate views.

use crate::envelope::Envelope;
use crate::error::{AppError, Result};
use crate::extractors::{IdPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::models::search::IdeaSearch;
use crate::models::stats::{self, IdeaTotals, WeeklyRecord};
use crate::models::{Idea, IdeaPatch, NewIdea, PaginatedData, SearchRequest};
use crate::time_utils::{format_utc_rfc3339, last_monday, utc_day_bounds};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Number of ideas returned by the recent view.
const RECENT_IDEAS_LIMIT: u32 = 5;

/// Idea routes (require authentication).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ideas", get(list_ideas).post(create_idea))
        .route("/api/ideas/", get(list_ideas).post(create_idea))
        .route("/api/ideas/total/today", get(total_today))
        .route("/api/ideas/total-today", get(total_today))
        .route("/api/ideas/total/all", get(total_all_time))
        .route("/api/ideas/total/consecutive", get(consecutive_days))
        .route("/api/ideas/recent", get(recent_ideas))
        .route("/api/ideas/weekly", get(weekly_ideas))
        .route("/api/ideas/search", post(search_ideas))
        .route(
            "/api/ideas/{id}",
            get(get_idea).put(update_idea).delete(delete_idea),
        )
}

// ─── Response Types ──────────────────────────────────────────

/// Idea as returned by the API.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct IdeaResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_by: String,
    pub topic_title: String,
    pub category: String,
    pub ideas: Vec<String>,
    pub viewed: bool,
    pub is_liked: bool,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Idea> for IdeaResponse {
    fn from(idea: Idea) -> Self {
        Self {
            id: idea.id,
            created_by: idea.created_by,
            topic_title: idea.topic_title,
            category: idea.category,
            ideas: idea.ideas,
            viewed: idea.viewed,
            is_liked: idea.is_liked,
            comment: idea.comment,
            created_at: format_utc_rfc3339(idea.created_at),
            updated_at: format_utc_rfc3339(idea.updated_at),
        }
    }
}

fn to_responses(ideas: Vec<Idea>) -> Vec<IdeaResponse> {
    ideas.into_iter().map(IdeaResponse::from).collect()
}

/// Weekly view: per-day groups since the most recent Monday.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyResponse {
    pub weekly_records: Vec<WeeklyRecord>,
    pub last_monday: String,
}

/// Search results with pagination metadata.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub ideas: Vec<IdeaResponse>,
    pub paginate_data: PaginatedData,
}

// ─── CRUD ────────────────────────────────────────────────────

/// Load an idea the caller owns; ideas of other users are reported as missing.
async fn load_owned_idea(state: &AppState, user: &AuthUser, idea_id: &str) -> Result<Idea> {
    match state.db.get_idea(idea_id).await? {
        Some(idea) if idea.created_by == user.user_id => Ok(idea),
        Some(_) => {
            tracing::warn!(
                user_id = %user.user_id,
                idea_id,
                "Access to idea owned by another user"
            );
            Err(AppError::NotFound(format!("idea {idea_id} not found")))
        }
        None => Err(AppError::NotFound(format!("idea {idea_id} not found"))),
    }
}

async fn create_idea(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewIdea>,
) -> Result<Envelope<IdeaResponse>> {
    let idea = Idea::new(
        uuid::Uuid::now_v7().to_string(),
        &user.user_id,
        body,
        Utc::now(),
    );

    let idea = state
        .db
        .insert_idea(&idea)
        .await
        .map_err(|e| e.wrap("Error in creating idea"))?;

    tracing::info!(user_id = %user.user_id, idea_id = %idea.id, "Idea created");

    Ok(Envelope::created(idea.into()))
}

async fn list_ideas(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Envelope<Vec<IdeaResponse>>> {
    let ideas = state
        .db
        .list_ideas(&user.user_id)
        .await
        .map_err(|e| e.wrap("Error in getting ideas"))?;

    Ok(Envelope::ok(to_responses(ideas)))
}

async fn get_idea(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    IdPath(idea_id): IdPath,
) -> Result<Envelope<IdeaResponse>> {
    let idea = load_owned_idea(&state, &user, &idea_id)
        .await
        .map_err(|e| e.wrap("Error in getting idea"))?;

    Ok(Envelope::ok(idea.into()))
}

async fn update_idea(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    IdPath(idea_id): IdPath,
    ValidatedJson(patch): ValidatedJson<IdeaPatch>,
) -> Result<Envelope<IdeaResponse>> {
    // Read-modify-write; concurrent updates are last writer wins.
    let mut idea = load_owned_idea(&state, &user, &idea_id)
        .await
        .map_err(|e| e.wrap("Error in updating idea"))?;

    idea.apply(patch, Utc::now());

    state
        .db
        .update_idea(&idea)
        .await
        .map_err(|e| e.wrap("Error in updating idea"))?;

    tracing::info!(user_id = %user.user_id, idea_id = %idea.id, "Idea updated");

    Ok(Envelope::ok(idea.into()))
}

async fn delete_idea(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    IdPath(idea_id): IdPath,
) -> Result<Envelope<&'static str>> {
    load_owned_idea(&state, &user, &idea_id)
        .await
        .map_err(|e| e.wrap("Error in deleting idea"))?;

    state
        .db
        .delete_idea(&idea_id)
        .await
        .map_err(|e| e.wrap("Error in deleting idea"))?;

    tracing::info!(user_id = %user.user_id, idea_id = %idea_id, "Idea deleted");

    Ok(Envelope::ok("Idea deleted successfully"))
}

// ─── Aggregate Views ─────────────────────────────────────────

async fn total_today(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Envelope<IdeaTotals>> {
    let (start, end) = utc_day_bounds(Utc::now());

    let ideas = state
        .db
        .ideas_created_between(&user.user_id, Some(start), Some(end))
        .await
        .map_err(|e| e.wrap("Error in getting ideas of today"))?;

    Ok(Envelope::ok(IdeaTotals::from_ideas(&ideas)))
}

async fn total_all_time(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Envelope<IdeaTotals>> {
    let ideas = state
        .db
        .list_ideas(&user.user_id)
        .await
        .map_err(|e| e.wrap("Error in getting ideas of all time"))?;

    Ok(Envelope::ok(IdeaTotals::from_ideas(&ideas)))
}

async fn consecutive_days(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Envelope<u32>> {
    let db = &state.db;
    let owner = user.user_id.as_str();

    let streak = stats::consecutive_days(
        Utc::now(),
        state.config.max_streak_days,
        move |start, end| db.idea_exists_between(owner, start, end),
    )
    .await
    .map_err(|e| e.wrap("Error in getting total consecutive days"))?;

    tracing::debug!(user_id = %user.user_id, streak, "Computed streak");

    Ok(Envelope::ok(streak))
}

async fn recent_ideas(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Envelope<Vec<IdeaResponse>>> {
    let ideas = state
        .db
        .recent_ideas(&user.user_id, RECENT_IDEAS_LIMIT)
        .await
        .map_err(|e| e.wrap("Error in getting recent ideas"))?;

    Ok(Envelope::ok(to_responses(ideas)))
}

async fn weekly_ideas(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Envelope<WeeklyResponse>> {
    let monday = last_monday(Utc::now());

    let ideas = state
        .db
        .ideas_created_between(&user.user_id, Some(monday), None)
        .await
        .map_err(|e| e.wrap("Error in getting weekly ideas"))?;

    Ok(Envelope::ok(WeeklyResponse {
        weekly_records: stats::group_by_day(&ideas),
        last_monday: format_utc_rfc3339(monday),
    }))
}

async fn search_ideas(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(request): ValidatedJson<SearchRequest>,
) -> Result<Envelope<SearchResponse>> {
    let search = IdeaSearch::from_request(&user.user_id, request)
        .map_err(|e| e.wrap("Request body is not valid"))?;

    let candidates = state
        .db
        .search_ideas(&search.filter)
        .await
        .map_err(|e| e.wrap("Error in searching ideas"))?;

    let (ideas, paginate_data) = search.paginate(candidates);

    tracing::debug!(
        user_id = %user.user_id,
        total = paginate_data.total,
        page = paginate_data.page,
        "Search completed"
    );

    Ok(Envelope::ok(SearchResponse {
        ideas: to_responses(ideas),
        paginate_data,
    }))
}
