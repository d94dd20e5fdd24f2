//! Sidebar layout and user preference blobs

use serde::{Deserialize, Serialize};
use wayfinder_util::ItemId;

/// One link in the sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarItem {
    pub id: ItemId,
    pub title: String,
    pub href: String,
    pub icon: String,
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// A titled group of sidebar links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub collapsed: bool,
    pub items: Vec<SidebarItem>,
}

/// Full, ordered sidebar layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarLayout {
    pub sections: Vec<SidebarSection>,
}

impl SidebarLayout {
    pub fn find_item(&self, id: &ItemId) -> Option<&SidebarItem> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .find(|item| &item.id == id)
    }
}

impl Default for SidebarLayout {
    fn default() -> Self {
        fn item(id: &str, title: &str, href: &str, icon: &str) -> SidebarItem {
            SidebarItem {
                id: ItemId::new(id),
                title: title.into(),
                href: href.into(),
                icon: icon.into(),
                visible: true,
            }
        }

        Self {
            sections: vec![
                SidebarSection {
                    id: "main".into(),
                    title: "Main".into(),
                    collapsed: false,
                    items: vec![
                        item("dashboard", "Dashboard", "/", "layout-dashboard"),
                        item("prompts", "Prompts", "/prompts", "file-text"),
                        item("chat", "Chat", "/chat", "message-square"),
                    ],
                },
                SidebarSection {
                    id: "workflows".into(),
                    title: "Workflows".into(),
                    collapsed: false,
                    items: vec![
                        item("agents", "Agents", "/agents", "bot"),
                        item("research", "Research", "/research", "microscope"),
                        item("templates", "Templates", "/templates", "layers"),
                    ],
                },
                SidebarSection {
                    id: "system".into(),
                    title: "System".into(),
                    collapsed: false,
                    items: vec![
                        item("analytics", "Analytics", "/analytics", "bar-chart"),
                        item("settings", "Settings", "/settings", "settings"),
                    ],
                },
            ],
        }
    }
}

fn default_true() -> bool {
    true
}

/// Color theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

/// Application-wide preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedSettings {
    pub theme: Theme,
    pub compact_sidebar: bool,
    pub show_usage_badges: bool,
    pub recommendations_enabled: bool,
}

impl Default for UnifiedSettings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            compact_sidebar: false,
            show_usage_badges: true,
            recommendations_enabled: true,
        }
    }
}

/// Text-to-speech preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsSettings {
    pub enabled: bool,
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Language model preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}
