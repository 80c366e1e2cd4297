// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idea search: filter construction, free-text matching and pagination.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::AppError;
use crate::models::Idea;

pub const DEFAULT_PAGE_SIZE: u32 = 9;
pub const MAX_PAGE_SIZE: u32 = 100;
const MAX_SEARCH_INPUT_LEN: usize = 200;

/// Search request body. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(max = 200))]
    pub search_input: Option<String>,
    pub category: Option<String>,
    pub created_at_from: Option<DateTime<Utc>>,
    pub created_at_to: Option<DateTime<Utc>>,
    pub page_size: Option<u32>,
    /// 1-indexed page number; 0 is treated as 1
    pub current: Option<u32>,
    #[serde(default)]
    pub sort_by_recent: bool,
    #[serde(default)]
    pub is_liked: bool,
}

/// Sort direction on creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

/// Filter pushed down to Firestore (everything except free text).
#[derive(Debug, Clone)]
pub struct IdeaFilter {
    pub owner: String,
    pub category: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub liked_only: bool,
    pub order: SortOrder,
}

/// Fully resolved search: database filter, text matcher and page window.
#[derive(Debug)]
pub struct IdeaSearch {
    pub filter: IdeaFilter,
    pub text: Option<TextMatcher>,
    pub page: u32,
    pub per_page: u32,
}

impl IdeaSearch {
    /// Resolve a request for `owner`, applying page defaults.
    pub fn from_request(owner: &str, req: SearchRequest) -> Result<Self, AppError> {
        if let (Some(from), Some(to)) = (req.created_at_from, req.created_at_to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "createdAtFrom must not be after createdAtTo".to_string(),
                ));
            }
        }

        let text = req
            .search_input
            .as_deref()
            .map(str::trim)
            .filter(|input| !input.is_empty())
            .map(TextMatcher::new)
            .transpose()?;

        let category = req.category.filter(|c| !c.trim().is_empty());

        let page = match req.current {
            None | Some(0) => 1,
            Some(page) => page,
        };
        let per_page = match req.page_size {
            None | Some(0) => DEFAULT_PAGE_SIZE,
            Some(size) => size.min(MAX_PAGE_SIZE),
        };

        Ok(Self {
            filter: IdeaFilter {
                owner: owner.to_string(),
                category,
                created_from: req.created_at_from,
                created_to: req.created_at_to,
                liked_only: req.is_liked,
                order: if req.sort_by_recent {
                    SortOrder::NewestFirst
                } else {
                    SortOrder::OldestFirst
                },
            },
            text,
            page,
            per_page,
        })
    }

    /// Apply the text matcher and cut out the requested page.
    ///
    /// `ideas` must already satisfy the database filter and be sorted.
    pub fn paginate(&self, ideas: Vec<Idea>) -> (Vec<Idea>, PaginatedData) {
        let matching: Vec<Idea> = match &self.text {
            Some(matcher) => ideas.into_iter().filter(|i| matcher.matches(i)).collect(),
            None => ideas,
        };

        let total = matching.len() as u64;
        let start = (self.page as u64 - 1).saturating_mul(self.per_page as u64);
        let page_items = matching
            .into_iter()
            .skip(usize::try_from(start).unwrap_or(usize::MAX))
            .take(self.per_page as usize)
            .collect();

        (page_items, PaginatedData::new(total, self.page, self.per_page))
    }
}

/// Case-insensitive regular expression matched against title, idea strings and category.
#[derive(Debug)]
pub struct TextMatcher {
    pattern: Regex,
}

impl TextMatcher {
    pub fn new(input: &str) -> Result<Self, AppError> {
        if input.chars().count() > MAX_SEARCH_INPUT_LEN {
            return Err(AppError::BadRequest(format!(
                "searchInput must be at most {MAX_SEARCH_INPUT_LEN} characters"
            )));
        }

        let pattern = RegexBuilder::new(input)
            .case_insensitive(true)
            .size_limit(1 << 20)
            .build()
            .map_err(|e| AppError::BadRequest(format!("Invalid searchInput: {e}")))?;

        Ok(Self { pattern })
    }

    pub fn matches(&self, idea: &Idea) -> bool {
        self.pattern.is_match(&idea.topic_title)
            || self.pattern.is_match(&idea.category)
            || idea.ideas.iter().any(|text| self.pattern.is_match(text))
    }
}

/// Pagination metadata returned with search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedData {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    /// Previous page number, 0 when on the first page
    pub prev: u32,
    /// Next page number, 0 when on the last page
    pub next: u32,
    pub total_page: u32,
}

impl PaginatedData {
    pub fn new(total: u64, page: u32, per_page: u32) -> Self {
        let total_page = if per_page == 0 {
            0
        } else {
            u32::try_from(total.div_ceil(per_page as u64)).unwrap_or(u32::MAX)
        };
        Self {
            total,
            page,
            per_page,
            prev: page.saturating_sub(1),
            next: if page < total_page { page + 1 } else { 0 },
            total_page,
        }
    }
}
