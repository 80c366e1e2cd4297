// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod idea;
pub mod search;
pub mod stats;
pub mod user;

pub use idea::{Idea, IdeaPatch, NewIdea};
pub use search::{IdeaFilter, IdeaSearch, PaginatedData, SearchRequest, SortOrder};
pub use stats::{IdeaTotals, WeeklyRecord};
pub use user::{Image, Role, User, UserPatch};
