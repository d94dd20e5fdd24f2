//! Derived analytics over the usage store

use chrono::{DateTime, Datelike, Local};
use std::collections::BTreeMap;
use wayfinder_api::{
    AnalyticsSnapshot, CategoryUsage, ItemUsageSummary, NavigationUsageRecord, UsageTrends,
};
use wayfinder_config::AnalyticsConfig;

/// Compute the full snapshot from the current records
pub fn compute_snapshot<'a>(
    records: impl IntoIterator<Item = &'a NavigationUsageRecord>,
    config: &AnalyticsConfig,
) -> AnalyticsSnapshot {
    let records: Vec<&NavigationUsageRecord> = records.into_iter().collect();
    let trends = usage_trends(records.iter().copied());

    AnalyticsSnapshot {
        total_clicks: records.iter().map(|r| r.click_count).sum(),
        total_time_spent_ms: records.iter().map(|r| r.time_spent_ms).sum(),
        most_used_items: most_used(records.iter().copied(), config.most_used_limit),
        least_used_items: least_used(records.iter().copied(), config.least_used_limit),
        category_usage: category_usage(records.iter().copied()),
        daily_usage: trends.daily,
        weekly_usage: trends.weekly,
    }
}

/// Top `limit` items by click count, descending
pub fn most_used<'a>(
    records: impl IntoIterator<Item = &'a NavigationUsageRecord>,
    limit: usize,
) -> Vec<ItemUsageSummary> {
    let mut ranked: Vec<_> = records.into_iter().collect();
    ranked.sort_by(|a, b| b.click_count.cmp(&a.click_count));
    ranked.into_iter().take(limit).map(|r| r.summary()).collect()
}

/// Bottom `limit` items with at least one click, ascending
pub fn least_used<'a>(
    records: impl IntoIterator<Item = &'a NavigationUsageRecord>,
    limit: usize,
) -> Vec<ItemUsageSummary> {
    let mut ranked: Vec<_> = records
        .into_iter()
        .filter(|r| r.click_count > 0)
        .collect();
    ranked.sort_by_key(|r| r.click_count);
    ranked.into_iter().take(limit).map(|r| r.summary()).collect()
}

/// Sum clicks, time, and item counts per category
pub fn category_usage<'a>(
    records: impl IntoIterator<Item = &'a NavigationUsageRecord>,
) -> BTreeMap<String, CategoryUsage> {
    let mut categories: BTreeMap<String, CategoryUsage> = BTreeMap::new();

    for record in records {
        let usage = categories.entry(record.category.clone()).or_default();
        usage.total_clicks += record.click_count;
        usage.total_time_spent_ms += record.time_spent_ms;
        usage.item_count += 1;
    }

    categories
}

/// Histogram every access-history entry by day and week
pub fn usage_trends<'a>(
    records: impl IntoIterator<Item = &'a NavigationUsageRecord>,
) -> UsageTrends {
    let mut trends = UsageTrends::default();

    for entry in records.into_iter().flat_map(|r| r.access_history.iter()) {
        *trends.daily.entry(day_key(&entry.timestamp)).or_insert(0) += 1;
        *trends.weekly.entry(week_key(&entry.timestamp)).or_insert(0) += 1;
    }

    trends
}

/// `YYYY-MM-DD` in local time
pub fn day_key(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// `YYYY-W<n>` where n counts seven-day blocks from January 1st. This is
/// not an ISO week: days 1-7 are week 1, day 365 is week 53.
pub fn week_key(ts: &DateTime<Local>) -> String {
    format!("{}-W{}", ts.year(), ts.ordinal().div_ceil(7))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wayfinder_api::AccessEntry;
    use wayfinder_util::{ItemId, SessionId};

    fn day(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn record(
        id: &str,
        category: &str,
        clicks: u64,
        days: &[DateTime<Local>],
    ) -> NavigationUsageRecord {
        let session = SessionId::new();
        NavigationUsageRecord {
            item_id: ItemId::new(id),
            title: id.to_string(),
            href: format!("/{}", id),
            category: category.to_string(),
            click_count: clicks,
            last_accessed: days.last().copied().unwrap_or_else(|| day(2025, 1, 1)),
            time_spent_ms: clicks * 1_000,
            access_history: days
                .iter()
                .map(|ts| AccessEntry {
                    timestamp: *ts,
                    session_id: session.clone(),
                    time_spent_ms: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_week_key_boundaries() {
        assert_eq!(week_key(&day(2025, 1, 1)), "2025-W1");
        assert_eq!(week_key(&day(2025, 1, 7)), "2025-W1");
        assert_eq!(week_key(&day(2025, 1, 8)), "2025-W2");
        assert_eq!(week_key(&day(2025, 12, 31)), "2025-W53");
        assert_eq!(day_key(&day(2025, 3, 9)), "2025-03-09");
    }

    #[test]
    fn test_most_and_least_used() {
        let records = vec![
            record("a", "main", 3, &[]),
            record("b", "main", 0, &[]),
            record("c", "tools", 9, &[]),
            record("d", "tools", 1, &[]),
        ];

        let most: Vec<_> = most_used(&records, 2).into_iter().map(|s| s.item_id).collect();
        assert_eq!(most, vec![ItemId::new("c"), ItemId::new("a")]);

        let least: Vec<_> = least_used(&records, 5).into_iter().map(|s| s.item_id).collect();
        assert_eq!(least, vec![ItemId::new("d"), ItemId::new("a"), ItemId::new("c")]);
    }

    #[test]
    fn test_snapshot_totals_match_records() {
        let records = vec![
            record("prompts", "main", 2, &[day(2025, 6, 2), day(2025, 6, 2)]),
            record("chat", "main", 1, &[day(2025, 6, 3)]),
            record(
                "agents",
                "workflows",
                4,
                &[day(2025, 1, 1), day(2025, 1, 8), day(2025, 6, 3), day(2025, 6, 3)],
            ),
        ];

        let snapshot = compute_snapshot(&records, &AnalyticsConfig::default());

        assert_eq!(snapshot.total_clicks, 7);
        assert_eq!(snapshot.total_time_spent_ms, 7_000);
        assert_eq!(snapshot.category_usage.len(), 2);

        let main = &snapshot.category_usage["main"];
        assert_eq!(main.total_clicks, 3);
        assert_eq!(main.item_count, 2);

        let category_clicks: u64 = snapshot.category_usage.values().map(|c| c.total_clicks).sum();
        assert_eq!(category_clicks, snapshot.total_clicks);

        let history_len: u64 = records.iter().map(|r| r.access_history.len() as u64).sum();
        assert_eq!(snapshot.daily_usage.values().sum::<u64>(), history_len);
        assert_eq!(snapshot.weekly_usage.values().sum::<u64>(), history_len);
        assert_eq!(snapshot.daily_usage["2025-06-03"], 3);
        assert_eq!(snapshot.weekly_usage["2025-W1"], 1);
        assert_eq!(snapshot.weekly_usage["2025-W2"], 1);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let records = vec![
            record("prompts", "main", 2, &[day(2025, 6, 2), day(2025, 6, 3)]),
            record("chat", "main", 2, &[day(2025, 6, 3), day(2025, 6, 4)]),
        ];
        let config = AnalyticsConfig::default();
        assert_eq!(compute_snapshot(&records, &config), compute_snapshot(&records, &config));
    }

    #[test]
    fn test_empty_store_yields_empty_snapshot() {
        let records: Vec<NavigationUsageRecord> = Vec::new();
        assert_eq!(
            compute_snapshot(&records, &AnalyticsConfig::default()),
            AnalyticsSnapshot::default()
        );
    }

    #[test]
    fn test_limits_respected() {
        let records: Vec<_> = (1..=20)
            .map(|i| record(&format!("item{i}"), "main", i, &[]))
            .collect();
        let config = AnalyticsConfig {
            most_used_limit: 3,
            least_used_limit: 2,
            ..AnalyticsConfig::default()
        };

        let snapshot = compute_snapshot(&records, &config);
        assert_eq!(snapshot.most_used_items.len(), 3);
        assert_eq!(snapshot.most_used_items[0].click_count, 20);
        assert_eq!(snapshot.least_used_items.len(), 2);
        assert_eq!(snapshot.least_used_items[0].click_count, 1);
    }
}
