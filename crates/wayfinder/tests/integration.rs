//! Integration tests for wayfinder
//!
//! These tests verify the end-to-end behavior across the store, config,
//! and core crates, with on-disk databases standing in for the CLI's.

use chrono::{DateTime, Duration, Local, TimeZone};
use std::path::Path;
use std::sync::Arc;
use wayfinder_api::{RecommendationKind, Role, SidebarLayout};
use wayfinder_config::{parse_config, Config};
use wayfinder_core::{
    default_catalog, ActionOutcome, CoreEvent, NavigationAnalytics, Preferences,
    QuickActionIndex, SidebarCustomization,
};
use wayfinder_store::{KeyValueStore, MemoryStore, SqliteStore};
use wayfinder_util::{ActionId, ItemId, DURABLE_DB_FILENAME, SESSION_DB_FILENAME};

fn t0() -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
}

fn open(path: &Path) -> Arc<dyn KeyValueStore> {
    Arc::new(SqliteStore::open(path).unwrap())
}

/// Analytics over `durable` with a fresh volatile store, like a new tab
fn new_tab(durable: Arc<dyn KeyValueStore>) -> NavigationAnalytics {
    NavigationAnalytics::new(durable, Arc::new(MemoryStore::new()), &Config::default())
}

#[test]
fn test_browsing_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let durable = open(&dir.path().join(DURABLE_DB_FILENAME));
    let volatile = open(&dir.path().join(SESSION_DB_FILENAME));
    let mut analytics =
        NavigationAnalytics::new(durable.clone(), volatile.clone(), &Config::default());

    // Click Prompts, stay 30s, click Chat, stay 10s, go to the dashboard
    let prompts = ItemId::new("prompts");
    let chat = ItemId::new("chat");

    analytics.track_navigation(&prompts, "Prompts", "/prompts", "main", t0());
    analytics.on_route_change("/prompts", t0());

    let at_chat = t0() + Duration::seconds(30);
    analytics.track_navigation(&chat, "Chat", "/chat", "main", at_chat);
    let event = analytics.on_route_change("/chat", at_chat).unwrap();
    assert!(matches!(event, CoreEvent::PageTimeCredited { elapsed_ms: 30_000, .. }));

    analytics.on_route_change("/", at_chat + Duration::seconds(10));

    assert_eq!(analytics.get_item_usage(&prompts).unwrap().time_spent_ms, 30_000);
    assert_eq!(analytics.get_item_usage(&chat).unwrap().time_spent_ms, 10_000);
    assert_eq!(analytics.snapshot().total_time_spent_ms, 40_000);
    assert_eq!(analytics.snapshot().total_clicks, 2);

    // A new process sees the same usage and the same session
    let session_id = analytics.session().unwrap().session_id;
    drop(analytics);

    let reopened = NavigationAnalytics::new(
        open(&dir.path().join(DURABLE_DB_FILENAME)),
        open(&dir.path().join(SESSION_DB_FILENAME)),
        &Config::default(),
    );
    assert_eq!(reopened.snapshot().total_clicks, 2);
    assert_eq!(reopened.session().unwrap().session_id, session_id);
}

#[test]
fn test_new_session_after_volatile_storage_is_lost() {
    let durable: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::in_memory().unwrap());
    let item = ItemId::new("research");

    let mut first = new_tab(durable.clone());
    first.track_navigation(&item, "Research", "/research", "workflows", t0());
    let first_session = first.session().unwrap().session_id;
    drop(first);

    // Fresh volatile store: like a new browser tab
    let mut second = new_tab(durable);
    let later = t0() + Duration::hours(1);
    second.track_navigation(&item, "Research", "/research", "workflows", later);

    let record = second.get_item_usage(&item).unwrap();
    assert_eq!(record.click_count, 2);
    assert_eq!(record.access_history[0].session_id, first_session);
    assert_ne!(record.access_history[1].session_id, first_session);
}

#[test]
fn test_configured_history_cap_and_limits() {
    let config = parse_config(
        r#"
        config_version = 1
        [analytics]
        max_history_per_item = 2
        most_used_limit = 1
        "#,
    )
    .unwrap();

    let mut analytics = NavigationAnalytics::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        &config,
    );
    let item = ItemId::new("templates");
    for i in 0..4 {
        let at = t0() + Duration::minutes(i);
        analytics.track_navigation(&item, "Templates", "/templates", "workflows", at);
    }
    analytics.track_navigation(&ItemId::new("chat"), "Chat", "/chat", "main", t0());

    let record = analytics.get_item_usage(&item).unwrap();
    assert_eq!(record.click_count, 4);
    assert_eq!(record.access_history.len(), 2);
    assert_eq!(analytics.snapshot().most_used_items.len(), 1);
    assert_eq!(analytics.snapshot().most_used_items[0].item_id, item);
}

#[test]
fn test_recommendation_scenario() {
    let mut analytics = NavigationAnalytics::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        &Config::default(),
    );

    let clicks_per_item = [
        ("prompts", 1),
        ("chat", 1),
        ("agents", 1),
        ("research", 1),
        ("templates", 20),
    ];
    for (id, clicks) in clicks_per_item {
        for _ in 0..clicks {
            analytics.track_navigation(&ItemId::new(id), id, &format!("/{id}"), "main", t0());
        }
    }

    let recs = analytics.get_recommendations();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].kind, RecommendationKind::Promote);
    assert_eq!(recs[0].item_id, ItemId::new("templates"));
    assert!(recs[0].confidence > 0.0 && recs[0].confidence <= 1.0);
}

#[test]
fn test_export_then_clear() {
    let mut analytics = NavigationAnalytics::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        &Config::default(),
    );
    let analytics_page = ItemId::new("analytics");
    analytics.track_navigation(&analytics_page, "Analytics", "/analytics", "system", t0());

    let exported: serde_json::Value =
        serde_json::from_str(&analytics.export_analytics(t0()).unwrap()).unwrap();
    assert_eq!(exported["usage_data"]["analytics"]["category"], "system");
    assert_eq!(exported["analytics"]["category_usage"]["system"]["total_clicks"], 1);

    analytics.clear_analytics();
    let exported: serde_json::Value =
        serde_json::from_str(&analytics.export_analytics(t0()).unwrap()).unwrap();
    assert!(exported["usage_data"].as_object().unwrap().is_empty());
    assert_eq!(exported["analytics"]["total_clicks"], 0);
}

#[test]
fn test_quick_action_navigation_feeds_analytics() {
    let durable: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let volatile: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = Config::default();

    let mut analytics = NavigationAnalytics::new(durable.clone(), volatile, &config);
    analytics.track_navigation(&ItemId::new("prompts"), "Prompts", "/prompts", "main", t0());
    analytics.on_route_change("/prompts", t0());

    let mut palette = QuickActionIndex::new(
        default_catalog(),
        Some(&Role::Viewer),
        config.quick_actions,
        durable.clone(),
    );
    let titles: Vec<_> = palette.search("chat").iter().map(|a| a.title.clone()).collect();
    assert_eq!(titles, vec!["Open Chat Mode"]);

    let event = palette.execute(&ActionId::new("open-chat")).unwrap();
    let CoreEvent::ActionExecuted { outcome, close_palette, .. } = event else {
        panic!("unexpected event");
    };
    assert!(close_palette);
    let ActionOutcome::Navigate { href } = outcome else {
        panic!("expected navigation");
    };

    analytics.on_route_change(&href, t0() + Duration::seconds(12));
    let prompts = analytics.get_item_usage(&ItemId::new("prompts")).unwrap();
    assert_eq!(prompts.time_spent_ms, 12_000);

    // Palette state shares durable storage with usage data
    let reopened = QuickActionIndex::new(
        default_catalog(),
        Some(&Role::Viewer),
        config.quick_actions,
        durable,
    );
    assert_eq!(reopened.search("")[0].id, ActionId::new("open-chat"));
}

#[test]
fn test_corruption_is_isolated_per_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DURABLE_DB_FILENAME);
    {
        let durable = open(&path);
        let mut analytics = new_tab(durable.clone());
        analytics.track_navigation(&ItemId::new("chat"), "Chat", "/chat", "main", t0());

        let mut sidebar = SidebarCustomization::load(durable.clone());
        sidebar.set_item_visible(&ItemId::new("agents"), false).unwrap();

        let mut prefs = Preferences::load(durable.clone());
        prefs.toggle("compact_sidebar");

        durable.set("sidebar-customization", "{\"sections\": 42}").unwrap();
    }

    let durable = open(&path);
    let analytics = new_tab(durable.clone());
    assert_eq!(analytics.snapshot().total_clicks, 1);
    let sidebar = SidebarCustomization::load(durable.clone());
    assert_eq!(sidebar.layout(), &SidebarLayout::default());
    assert!(Preferences::load(durable).unified().compact_sidebar);
}

#[test]
fn test_legacy_unversioned_usage_is_migrated() {
    let durable: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    durable
        .set(
            "navigation-usage",
            r#"{"chat":{"item_id":"chat","title":"Chat","href":"/chat","category":"main",
                "click_count":3,"last_accessed":"2025-06-01T10:00:00+00:00"}}"#,
        )
        .unwrap();

    let analytics = new_tab(durable);
    let record = analytics.get_item_usage(&ItemId::new("chat")).unwrap();
    assert_eq!(record.click_count, 3);
    assert!(record.access_history.is_empty());
    assert_eq!(analytics.snapshot().total_clicks, 3);
}
