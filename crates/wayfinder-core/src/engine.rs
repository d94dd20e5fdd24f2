//! Navigation analytics service

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use wayfinder_api::{
    AnalyticsExport, AnalyticsSnapshot, CategoryUsage, ItemUsageSummary, NavigationUsageRecord,
    Recommendation, SessionRecord, UsageTrends, SCHEMA_VERSION,
};
use wayfinder_config::{AnalyticsConfig, Config, RecommendationConfig};
use wayfinder_store::KeyValueStore;
use wayfinder_util::{ItemId, WayfinderError};

use crate::{
    compute_snapshot, least_used, most_used, recommend, usage_trends, CoreEvent, SessionTracker,
    UsageStore,
};

/// Usage store, session tracker, and derived analytics behind one API.
///
/// Durable storage holds usage records; volatile storage holds the
/// session. The snapshot is recomputed after every mutation.
pub struct NavigationAnalytics {
    usage: UsageStore,
    session: SessionTracker,
    analytics: AnalyticsConfig,
    recommendations: RecommendationConfig,
    snapshot: AnalyticsSnapshot,
}

impl NavigationAnalytics {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        volatile: Arc<dyn KeyValueStore>,
        config: &Config,
    ) -> Self {
        let usage = UsageStore::load(durable, config.analytics.max_history_per_item);
        let snapshot = compute_snapshot(usage.records().values(), &config.analytics);

        info!(
            item_count = usage.len(),
            total_clicks = snapshot.total_clicks,
            synced = usage.is_synced(),
            "Navigation analytics initialized"
        );

        Self {
            usage,
            session: SessionTracker::new(volatile),
            analytics: config.analytics,
            recommendations: config.recommendations,
            snapshot,
        }
    }

    /// Record a click on a navigable item
    pub fn track_navigation(
        &mut self,
        item_id: &ItemId,
        title: &str,
        href: &str,
        category: &str,
        now: DateTime<Local>,
    ) -> Option<CoreEvent> {
        let session_id = self.session.session_id(now);
        let click_count = self
            .usage
            .record(item_id, title, href, category, &session_id, now)?;
        self.refresh();

        debug!(item_id = %item_id, click_count, "Navigation tracked");

        Some(CoreEvent::NavigationTracked {
            item_id: item_id.clone(),
            session_id,
            click_count,
        })
    }

    /// Observe a route change, crediting time to the page just left
    pub fn on_route_change(&mut self, page: &str, now: DateTime<Local>) -> Option<CoreEvent> {
        let exit = self.session.on_route_change(page, now)?;
        let items = self.usage.credit_time(&exit.page, exit.elapsed_ms);
        if !items.is_empty() {
            self.refresh();
        }

        Some(CoreEvent::PageTimeCredited {
            session_id: exit.session_id,
            page: exit.page,
            elapsed_ms: exit.elapsed_ms,
            items,
        })
    }

    pub fn get_item_usage(&self, item_id: &ItemId) -> Option<&NavigationUsageRecord> {
        self.usage.get(item_id)
    }

    pub fn get_most_used_items(&self, limit: usize) -> Vec<ItemUsageSummary> {
        most_used(self.usage.records().values(), limit)
    }

    pub fn get_least_used_items(&self, limit: usize) -> Vec<ItemUsageSummary> {
        least_used(self.usage.records().values(), limit)
    }

    pub fn get_category_analytics(&self) -> &BTreeMap<String, CategoryUsage> {
        &self.snapshot.category_usage
    }

    pub fn get_usage_trends(&self) -> UsageTrends {
        usage_trends(self.usage.records().values())
    }

    pub fn get_recommendations(&self) -> Vec<Recommendation> {
        recommend(self.usage.records().values(), &self.recommendations)
    }

    pub fn snapshot(&self) -> &AnalyticsSnapshot {
        &self.snapshot
    }

    pub fn session(&self) -> Option<SessionRecord> {
        self.session.current()
    }

    pub fn export(&self, now: DateTime<Local>) -> AnalyticsExport {
        AnalyticsExport {
            schema_version: SCHEMA_VERSION,
            exported_at: now,
            usage_data: self.usage.records().clone(),
            analytics: self.snapshot.clone(),
            recommendations: self.get_recommendations(),
            session: self.session.current(),
        }
    }

    /// Export everything as pretty-printed JSON
    pub fn export_analytics(&self, now: DateTime<Local>) -> Result<String, WayfinderError> {
        serde_json::to_string_pretty(&self.export(now))
            .map_err(|e| WayfinderError::serialization(e.to_string()))
    }

    /// Remove all usage data. The session is kept.
    pub fn clear_analytics(&mut self) -> CoreEvent {
        let item_count = self.usage.len();
        self.usage.clear();
        self.refresh();

        info!(item_count, "Analytics cleared");

        CoreEvent::AnalyticsCleared { item_count }
    }

    fn refresh(&mut self) {
        self.snapshot = compute_snapshot(self.usage.records().values(), &self.analytics);
    }
}
