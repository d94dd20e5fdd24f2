//! Usage, session, and analytics types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wayfinder_util::{ItemId, SessionId};

/// One visit to a navigable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEntry {
    pub timestamp: DateTime<Local>,
    pub session_id: SessionId,
    /// Back-filled when the session leaves the item's page
    #[serde(default)]
    pub time_spent_ms: Option<u64>,
}

/// Persisted counter and history for one navigable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationUsageRecord {
    pub item_id: ItemId,
    pub title: String,
    pub href: String,
    pub category: String,
    pub click_count: u64,
    pub last_accessed: DateTime<Local>,
    #[serde(default)]
    pub time_spent_ms: u64,
    #[serde(default)]
    pub access_history: Vec<AccessEntry>,
}

impl NavigationUsageRecord {
    /// Summary without the access history
    pub fn summary(&self) -> ItemUsageSummary {
        ItemUsageSummary {
            item_id: self.item_id.clone(),
            title: self.title.clone(),
            href: self.href.clone(),
            category: self.category.clone(),
            click_count: self.click_count,
            time_spent_ms: self.time_spent_ms,
            last_accessed: self.last_accessed,
        }
    }
}

/// Per-tab (volatile) navigation session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub start_time: DateTime<Local>,
    /// None until the first route change is observed
    pub current_page: Option<String>,
    pub page_start_time: DateTime<Local>,
}

impl SessionRecord {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            session_id: SessionId::new(),
            start_time: now,
            current_page: None,
            page_start_time: now,
        }
    }
}

/// A usage record stripped of its history, used in rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUsageSummary {
    pub item_id: ItemId,
    pub title: String,
    pub href: String,
    pub category: String,
    pub click_count: u64,
    pub time_spent_ms: u64,
    pub last_accessed: DateTime<Local>,
}

/// Rollup of all usage records sharing a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUsage {
    pub total_clicks: u64,
    pub total_time_spent_ms: u64,
    pub item_count: usize,
}

/// Date-bucketed click histograms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTrends {
    /// `YYYY-MM-DD` -> clicks
    pub daily: BTreeMap<String, u64>,
    /// `YYYY-Www` -> clicks
    pub weekly: BTreeMap<String, u64>,
}

/// Summary statistics derived from the full usage store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_clicks: u64,
    pub total_time_spent_ms: u64,
    pub most_used_items: Vec<ItemUsageSummary>,
    pub least_used_items: Vec<ItemUsageSummary>,
    pub category_usage: BTreeMap<String, CategoryUsage>,
    pub daily_usage: BTreeMap<String, u64>,
    pub weekly_usage: BTreeMap<String, u64>,
}

/// Kind of layout change suggested for an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Hide,
    Promote,
}

/// Derived suggestion based on relative usage frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub item_id: ItemId,
    pub reason: String,
    /// Always within `[0, 1]`
    pub confidence: f64,
}

/// Document produced by `export_analytics`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsExport {
    pub schema_version: u32,
    pub exported_at: DateTime<Local>,
    pub usage_data: BTreeMap<ItemId, NavigationUsageRecord>,
    pub analytics: AnalyticsSnapshot,
    pub recommendations: Vec<Recommendation>,
    pub session: Option<SessionRecord>,
}
