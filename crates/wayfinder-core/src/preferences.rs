//! Application, speech, and language-model preference blobs

use std::sync::Arc;
use tracing::info;
use wayfinder_api::{LlmSettings, StorageKey, Theme, TtsSettings, UnifiedSettings};
use wayfinder_store::{KeyValueStore, PersistedBlob};

/// The three preference blobs. Each is loaded on its own, so one corrupt
/// blob does not reset the others.
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    unified: PersistedBlob<UnifiedSettings>,
    tts: PersistedBlob<TtsSettings>,
    llm: PersistedBlob<LlmSettings>,
}

impl Preferences {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let unified = PersistedBlob::load(store.as_ref(), StorageKey::UnifiedSettings);
        let tts = PersistedBlob::load(store.as_ref(), StorageKey::TtsSettings);
        let llm = PersistedBlob::load(store.as_ref(), StorageKey::LlmSettings);

        Self {
            store,
            unified,
            tts,
            llm,
        }
    }

    pub fn unified(&self) -> &UnifiedSettings {
        self.unified.get()
    }

    pub fn tts(&self) -> &TtsSettings {
        self.tts.get()
    }

    pub fn llm(&self) -> &LlmSettings {
        self.llm.get()
    }

    pub fn update_unified(&mut self, f: impl FnOnce(&mut UnifiedSettings)) {
        self.unified.update(self.store.as_ref(), f);
    }

    pub fn update_tts(&mut self, f: impl FnOnce(&mut TtsSettings)) {
        self.tts.update(self.store.as_ref(), f);
    }

    pub fn update_llm(&mut self, f: impl FnOnce(&mut LlmSettings)) {
        self.llm.update(self.store.as_ref(), f);
    }

    /// Flip a named setting, as requested by a quick action. Returns false
    /// for names that do not refer to a toggle.
    pub fn toggle(&mut self, setting: &str) -> bool {
        match setting {
            "theme" => self.update_unified(|s| {
                s.theme = match s.theme {
                    Theme::System => Theme::Light,
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::System,
                }
            }),
            "compact_sidebar" => self.update_unified(|s| s.compact_sidebar = !s.compact_sidebar),
            "usage_badges" => self.update_unified(|s| s.show_usage_badges = !s.show_usage_badges),
            "recommendations" => {
                self.update_unified(|s| s.recommendations_enabled = !s.recommendations_enabled)
            }
            "tts" => self.update_tts(|s| s.enabled = !s.enabled),
            _ => return false,
        }

        info!(setting, "Setting toggled");
        true
    }
}
