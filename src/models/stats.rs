//! Aggregate views over a user's idea sessions.
//!
//! Firestore has no grouping pipeline, so these are computed in-process over
//! the documents a bounded query returns.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Idea;
use crate::time_utils::day_start;

/// Session and idea-string totals for a set of ideas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct IdeaTotals {
    /// Number of idea documents
    pub total_sessions: u32,
    /// Sum of idea strings across those documents
    pub total_ideas: u32,
}

impl IdeaTotals {
    pub fn from_ideas<'a>(ideas: impl IntoIterator<Item = &'a Idea>) -> Self {
        ideas.into_iter().fold(Self::default(), |mut acc, idea| {
            acc.total_sessions += 1;
            acc.total_ideas += idea.idea_count();
            acc
        })
    }
}

/// One per-day group of the weekly view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecord {
    /// Day of week, 1 = Sunday through 7 = Saturday
    #[serde(rename = "_id")]
    pub day_of_week: u32,
    /// UTC calendar day ("YYYY-MM-DD")
    pub date: String,
    pub total_ideas: u32,
    pub total_sessions: u32,
}

/// Group ideas by UTC calendar day, ordered by date ascending.
pub fn group_by_day<'a>(ideas: impl IntoIterator<Item = &'a Idea>) -> Vec<WeeklyRecord> {
    let mut groups: BTreeMap<NaiveDate, IdeaTotals> = BTreeMap::new();

    for idea in ideas {
        let totals = groups.entry(idea.created_at.date_naive()).or_default();
        totals.total_sessions += 1;
        totals.total_ideas += idea.idea_count();
    }

    groups
        .into_iter()
        .map(|(date, totals)| WeeklyRecord {
            day_of_week: date.weekday().number_from_sunday(),
            date: date.format("%Y-%m-%d").to_string(),
            total_ideas: totals.total_ideas,
            total_sessions: totals.total_sessions,
        })
        .collect()
}

/// Count consecutive UTC days, ending today, on which `has_idea` reports activity.
///
/// For offset `n` the probe receives the half-open interval
/// `[start of (today - n), start of (today - n + 1))`. The walk stops at the
/// first day without an idea or after `max_days` probes.
pub async fn consecutive_days<F, Fut, E>(
    now: DateTime<Utc>,
    max_days: u32,
    mut has_idea: F,
) -> Result<u32, E>
where
    F: FnMut(DateTime<Utc>, DateTime<Utc>) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let today = now.date_naive();
    let mut streak = 0;

    while streak < max_days {
        let Some(day) = today.checked_sub_signed(Duration::days(streak as i64)) else {
            break;
        };
        let start = day_start(day);
        let end = start + Duration::days(1);

        if !has_idea(start, end).await? {
            break;
        }
        streak += 1;
    }

    Ok(streak)
}
