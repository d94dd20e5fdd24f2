//! Storage keys

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every independently persisted blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKey {
    NavigationUsage,
    SidebarCustomization,
    QuickActionsPreferences,
    TtsSettings,
    UnifiedSettings,
    LlmSettings,
    NavigationSession,
}

impl StorageKey {
    pub const ALL: [StorageKey; 7] = [
        StorageKey::NavigationUsage,
        StorageKey::SidebarCustomization,
        StorageKey::QuickActionsPreferences,
        StorageKey::TtsSettings,
        StorageKey::UnifiedSettings,
        StorageKey::LlmSettings,
        StorageKey::NavigationSession,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::NavigationUsage => "navigation-usage",
            StorageKey::SidebarCustomization => "sidebar-customization",
            StorageKey::QuickActionsPreferences => "quick-actions-preferences",
            StorageKey::TtsSettings => "tts-settings",
            StorageKey::UnifiedSettings => "unified-settings",
            StorageKey::LlmSettings => "llm-settings",
            StorageKey::NavigationSession => "navigation-session",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
