//! Sidebar customization: visibility, ordering, import and export

use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use wayfinder_api::{SidebarItem, SidebarLayout, StorageKey};
use wayfinder_store::{
    decode_blob, encode_blob, load_blob, save_blob_logged, KeyValueStore, LoadOutcome,
};
use wayfinder_util::ItemId;

#[derive(Debug, Error)]
pub enum SidebarError {
    #[error("Invalid sidebar settings: {0}")]
    InvalidSettings(String),

    #[error("Duplicate sidebar item: {0}")]
    DuplicateItem(ItemId),

    #[error("Duplicate sidebar section: {0}")]
    DuplicateSection(String),

    #[error("Unknown sidebar item: {0}")]
    UnknownItem(ItemId),

    #[error("Unknown sidebar section: {0}")]
    UnknownSection(String),
}

/// User-editable sidebar layout, persisted on every change
pub struct SidebarCustomization {
    store: Arc<dyn KeyValueStore>,
    layout: SidebarLayout,
    /// False while the saved layout could not be read
    synced: bool,
}

impl SidebarCustomization {
    /// Load the saved layout. Missing, corrupt, or inconsistent data falls
    /// back to the default layout.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let (layout, synced) = match read_layout(store.as_ref()) {
            Some(layout) => (layout, true),
            None => (SidebarLayout::default(), false),
        };

        Self {
            store,
            layout,
            synced,
        }
    }

    pub fn layout(&self) -> &SidebarLayout {
        &self.layout
    }

    /// Items the user has not hidden, in display order
    pub fn visible_items(&self) -> Vec<&SidebarItem> {
        self.layout
            .sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|item| item.visible)
            .collect()
    }

    pub fn set_item_visible(&mut self, id: &ItemId, visible: bool) -> Result<(), SidebarError> {
        self.resync();
        let item = self
            .layout
            .sections
            .iter_mut()
            .flat_map(|s| s.items.iter_mut())
            .find(|item| &item.id == id)
            .ok_or_else(|| SidebarError::UnknownItem(id.clone()))?;

        item.visible = visible;
        info!(item_id = %id, visible, "Sidebar item visibility changed");
        self.persist();
        Ok(())
    }

    pub fn set_section_collapsed(
        &mut self,
        section: &str,
        collapsed: bool,
    ) -> Result<(), SidebarError> {
        self.resync();
        let section_ref = self
            .layout
            .sections
            .iter_mut()
            .find(|s| s.id == section)
            .ok_or_else(|| SidebarError::UnknownSection(section.to_string()))?;

        section_ref.collapsed = collapsed;
        self.persist();
        Ok(())
    }

    /// Move an item into `section` at `position`, clamped to the end
    pub fn move_item(
        &mut self,
        id: &ItemId,
        section: &str,
        position: usize,
    ) -> Result<(), SidebarError> {
        self.resync();
        let target = self
            .layout
            .sections
            .iter()
            .position(|s| s.id == section)
            .ok_or_else(|| SidebarError::UnknownSection(section.to_string()))?;

        let (source, index) = self
            .layout
            .sections
            .iter()
            .enumerate()
            .find_map(|(si, s)| {
                s.items
                    .iter()
                    .position(|item| &item.id == id)
                    .map(|ii| (si, ii))
            })
            .ok_or_else(|| SidebarError::UnknownItem(id.clone()))?;

        let item = self.layout.sections[source].items.remove(index);
        let items = &mut self.layout.sections[target].items;
        let position = position.min(items.len());
        items.insert(position, item);

        info!(item_id = %id, section, position, "Sidebar item moved");
        self.persist();
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        self.resync();
        self.layout = SidebarLayout::default();
        info!("Sidebar reset to defaults");
        self.persist();
    }

    /// Serialize the layout in the persisted envelope format
    pub fn export_settings(&self) -> Result<String, SidebarError> {
        encode_blob(&self.layout).map_err(|e| SidebarError::InvalidSettings(e.to_string()))
    }

    /// Replace the layout with an exported one. Accepts enveloped and bare
    /// layouts. The current layout is untouched on error.
    pub fn import_settings(&mut self, json: &str) -> Result<(), SidebarError> {
        let layout = match decode_blob::<SidebarLayout>(json) {
            LoadOutcome::Loaded(layout) => layout,
            LoadOutcome::Missing => {
                return Err(SidebarError::InvalidSettings("empty document".into()));
            }
            LoadOutcome::Corrupt { reason } | LoadOutcome::Unavailable { reason } => {
                return Err(SidebarError::InvalidSettings(reason));
            }
        };

        validate_layout(&layout)?;

        self.resync();

        self.layout = layout;
        info!(sections = self.layout.sections.len(), "Sidebar settings imported");
        self.persist();
        Ok(())
    }

    /// After a failed read, retry it and adopt the saved layout
    fn resync(&mut self) {
        if self.synced {
            return;
        }
        if let Some(layout) = read_layout(self.store.as_ref()) {
            info!("Sidebar settings readable again");
            self.layout = layout;
            self.synced = true;
        }
    }

    fn persist(&self) {
        if !self.synced {
            warn!("Sidebar settings unreadable, change kept in memory");
            return;
        }
        save_blob_logged(self.store.as_ref(), StorageKey::SidebarCustomization, &self.layout);
    }
}

/// Saved layout, or the default when missing or unusable. None when the
/// store could not be read.
fn read_layout(store: &dyn KeyValueStore) -> Option<SidebarLayout> {
    match load_blob::<SidebarLayout>(store, StorageKey::SidebarCustomization) {
        LoadOutcome::Loaded(layout) => match validate_layout(&layout) {
            Ok(()) => Some(layout),
            Err(e) => {
                warn!(error = %e, "Saved sidebar layout rejected, using defaults");
                Some(SidebarLayout::default())
            }
        },
        LoadOutcome::Missing => Some(SidebarLayout::default()),
        LoadOutcome::Corrupt { reason } => {
            warn!(reason = %reason, "Sidebar settings corrupt, using defaults");
            Some(SidebarLayout::default())
        }
        LoadOutcome::Unavailable { reason } => {
            warn!(reason = %reason, "Sidebar settings unreadable, writes withheld");
            None
        }
    }
}

fn validate_layout(layout: &SidebarLayout) -> Result<(), SidebarError> {
    let mut sections = HashSet::new();
    let mut items = HashSet::new();

    for section in &layout.sections {
        if !sections.insert(section.id.as_str()) {
            return Err(SidebarError::DuplicateSection(section.id.clone()));
        }
        for item in &section.items {
            if item.id.is_blank() {
                return Err(SidebarError::InvalidSettings("blank item id".into()));
            }
            if !items.insert(&item.id) {
                return Err(SidebarError::DuplicateItem(item.id.clone()));
            }
        }
    }

    Ok(())
}
