//! Persisted per-item usage records

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wayfinder_api::{AccessEntry, NavigationUsageRecord, StorageKey};
use wayfinder_store::{load_blob, save_blob_logged, KeyValueStore, LoadOutcome};
use wayfinder_util::{ItemId, SessionId};

/// Map of item id to usage record, written through to durable storage on
/// every mutation
pub struct UsageStore {
    store: Arc<dyn KeyValueStore>,
    records: BTreeMap<ItemId, NavigationUsageRecord>,
    /// Cap on each record's access history; None means unbounded
    max_history: Option<usize>,
    /// False while durable storage could not be read. Nothing is written
    /// until it can, so an unreadable blob is never replaced.
    synced: bool,
}

impl UsageStore {
    /// Hydrate from durable storage. Missing or corrupt data yields an
    /// empty store.
    pub fn load(store: Arc<dyn KeyValueStore>, max_history: Option<usize>) -> Self {
        let (records, synced) = match read_records(store.as_ref()) {
            Some(records) => (records, true),
            None => (BTreeMap::new(), false),
        };

        debug!(count = records.len(), synced, "Usage store loaded");

        Self {
            store,
            records,
            max_history,
            synced,
        }
    }

    /// Record one click on an item. Returns the new click count, or None
    /// when the id is blank.
    pub fn record(
        &mut self,
        item_id: &ItemId,
        title: &str,
        href: &str,
        category: &str,
        session_id: &SessionId,
        now: DateTime<Local>,
    ) -> Option<u64> {
        if item_id.is_blank() {
            warn!("Ignoring navigation with blank item id");
            return None;
        }

        self.resync();

        let record = self
            .records
            .entry(item_id.clone())
            .or_insert_with(|| NavigationUsageRecord {
                item_id: item_id.clone(),
                title: title.to_string(),
                href: href.to_string(),
                category: category.to_string(),
                click_count: 0,
                last_accessed: now,
                time_spent_ms: 0,
                access_history: Vec::new(),
            });

        record.title = title.to_string();
        record.href = href.to_string();
        record.category = category.to_string();
        record.click_count = record.click_count.saturating_add(1);
        record.last_accessed = now;
        record.access_history.push(AccessEntry {
            timestamp: now,
            session_id: session_id.clone(),
            time_spent_ms: None,
        });

        if let Some(cap) = self.max_history
            && record.access_history.len() > cap
        {
            let excess = record.access_history.len() - cap;
            record.access_history.drain(..excess);
        }

        let click_count = record.click_count;
        self.persist();
        Some(click_count)
    }

    /// Credit time spent on `href` to every record pointing at it, and
    /// back-fill the latest history entry of each. Returns the credited ids.
    pub fn credit_time(&mut self, href: &str, elapsed_ms: u64) -> Vec<ItemId> {
        self.resync();

        let mut credited = Vec::new();

        for record in self.records.values_mut().filter(|r| r.href == href) {
            record.time_spent_ms = record.time_spent_ms.saturating_add(elapsed_ms);
            if let Some(last) = record.access_history.last_mut() {
                last.time_spent_ms = Some(elapsed_ms);
            }
            credited.push(record.item_id.clone());
        }

        if !credited.is_empty() {
            self.persist();
        }

        credited
    }

    /// Look up a record. Blank ids never match.
    pub fn get(&self, item_id: &ItemId) -> Option<&NavigationUsageRecord> {
        if item_id.is_blank() {
            return None;
        }
        self.records.get(item_id)
    }

    pub fn records(&self) -> &BTreeMap<ItemId, NavigationUsageRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record and the persisted blob
    pub fn clear(&mut self) {
        self.records.clear();
        match self.store.remove(StorageKey::NavigationUsage.as_str()) {
            Ok(()) => self.synced = true,
            Err(e) => warn!(error = %e, "Failed to remove usage data"),
        }
    }

    /// Whether the in-memory records reflect durable storage
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// After a failed read, retry it and adopt what is stored. Changes
    /// made while storage was unreadable are dropped.
    fn resync(&mut self) {
        if self.synced {
            return;
        }
        if let Some(records) = read_records(self.store.as_ref()) {
            info!(count = records.len(), "Usage storage readable again");
            self.records = records;
            self.synced = true;
        }
    }

    fn persist(&self) {
        if !self.synced {
            warn!("Usage storage unreadable, change kept in memory");
            return;
        }
        save_blob_logged(self.store.as_ref(), StorageKey::NavigationUsage, &self.records);
    }
}

/// Read the persisted records. None when storage could not be read.
fn read_records(store: &dyn KeyValueStore) -> Option<BTreeMap<ItemId, NavigationUsageRecord>> {
    match load_blob(store, StorageKey::NavigationUsage) {
        LoadOutcome::Loaded(records) => Some(sanitize(records)),
        LoadOutcome::Missing => Some(BTreeMap::new()),
        LoadOutcome::Corrupt { reason } => {
            warn!(reason = %reason, "Usage data corrupt, starting empty");
            Some(BTreeMap::new())
        }
        LoadOutcome::Unavailable { reason } => {
            warn!(reason = %reason, "Usage data unreadable, writes withheld");
            None
        }
    }
}

/// Drop records that cannot be addressed and realign ids with their keys
fn sanitize(
    records: BTreeMap<ItemId, NavigationUsageRecord>,
) -> BTreeMap<ItemId, NavigationUsageRecord> {
    records
        .into_iter()
        .filter_map(|(key, mut record)| {
            if key.is_blank() {
                warn!("Dropping usage record with blank id");
                return None;
            }
            if record.item_id != key {
                debug!(key = %key, item_id = %record.item_id, "Realigning record id with key");
                record.item_id = key.clone();
            }
            Some((key, record))
        })
        .collect()
}
