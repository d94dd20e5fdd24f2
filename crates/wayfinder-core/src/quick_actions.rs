//! Quick-actions palette: catalog, search, and execution

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use wayfinder_api::{
    StorageKey, PERM_AGENTS_MANAGE, PERM_ANALYTICS_EXPORT, PERM_ANALYTICS_VIEW,
    PERM_PROMPTS_CREATE, PERM_RESEARCH_RUN, PERM_SETTINGS_MANAGE,
};
use wayfinder_config::QuickActionsConfig;
use wayfinder_store::{KeyValueStore, PersistedBlob};
use wayfinder_util::ActionId;

use crate::{is_permitted, CoreEvent, PermissionOracle};

/// What running an action asks the host to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    Navigate { href: String },
    ToggleSetting { setting: String },
    ExportAnalytics,
    StartVoiceInput,
}

pub type ActionHandler = Arc<dyn Fn() -> ActionOutcome + Send + Sync>;

/// One palette entry
#[derive(Clone)]
pub struct QuickAction {
    pub id: ActionId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub icon: String,
    pub shortcut: Option<String>,
    pub keywords: Vec<String>,
    /// Permission required to see the action
    pub permission: Option<String>,
    handler: ActionHandler,
}

impl QuickAction {
    pub fn new(
        id: impl Into<ActionId>,
        title: impl Into<String>,
        handler: impl Fn() -> ActionOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: String::new(),
            icon: String::new(),
            shortcut: None,
            keywords: Vec::new(),
            permission: None,
            handler: Arc::new(handler),
        }
    }

    /// Action whose handler navigates to `href`
    pub fn navigate(
        id: impl Into<ActionId>,
        title: impl Into<String>,
        href: impl Into<String>,
    ) -> Self {
        let href = href.into();
        Self::new(id, title, move || ActionOutcome::Navigate { href: href.clone() })
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }

    pub fn keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn requires(mut self, permission: &str) -> Self {
        self.permission = Some(permission.to_string());
        self
    }

    pub fn invoke(&self) -> ActionOutcome {
        (self.handler)()
    }

    fn matches(&self, needle: &str) -> bool {
        let haystack = format!(
            "{} {} {}",
            self.title,
            self.description,
            self.keywords.join(" ")
        )
        .to_lowercase();
        haystack.contains(needle)
    }
}

impl fmt::Debug for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuickAction")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("permission", &self.permission)
            .finish_non_exhaustive()
    }
}

/// Persisted palette state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickActionPreferences {
    /// Most recent first, no duplicates
    pub recent: Vec<ActionId>,
    pub frequency: BTreeMap<ActionId, u64>,
}

/// Permission-filtered catalog with recency and frequency ranking
pub struct QuickActionIndex {
    actions: Vec<QuickAction>,
    preferences: PersistedBlob<QuickActionPreferences>,
    config: QuickActionsConfig,
    store: Arc<dyn KeyValueStore>,
}

impl QuickActionIndex {
    /// Build the index, dropping actions the oracle does not permit.
    /// Without an oracle only unguarded actions remain.
    pub fn new(
        catalog: Vec<QuickAction>,
        oracle: Option<&dyn PermissionOracle>,
        config: QuickActionsConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let total = catalog.len();
        let actions: Vec<QuickAction> = catalog
            .into_iter()
            .filter(|action| is_permitted(action.permission.as_deref(), oracle))
            .collect();

        let preferences =
            PersistedBlob::load(store.as_ref(), StorageKey::QuickActionsPreferences);

        let filtered = total - actions.len();
        if oracle.is_none() && filtered > 0 {
            warn!(filtered, "No permission oracle, hiding guarded quick actions");
        }

        debug!(
            available = actions.len(),
            filtered,
            synced = preferences.is_synced(),
            "Quick actions indexed"
        );

        Self {
            actions,
            preferences,
            config,
            store,
        }
    }

    /// Actions visible to the current user, in catalog order
    pub fn actions(&self) -> &[QuickAction] {
        &self.actions
    }

    pub fn get(&self, id: &ActionId) -> Option<&QuickAction> {
        self.actions.iter().find(|a| &a.id == id)
    }

    pub fn preferences(&self) -> &QuickActionPreferences {
        self.preferences.get()
    }

    pub fn frequency(&self, id: &ActionId) -> u64 {
        self.preferences().frequency.get(id).copied().unwrap_or(0)
    }

    /// Search the visible catalog.
    ///
    /// An empty query lists recently used actions, or the head of the
    /// catalog when nothing has been used yet. Otherwise matches are
    /// case-insensitive substrings of title, description, and keywords,
    /// ranked by how often each action has run.
    pub fn search(&self, query: &str) -> Vec<&QuickAction> {
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            let recent: Vec<&QuickAction> = self
                .preferences()
                .recent
                .iter()
                .filter_map(|id| self.get(id))
                .take(self.config.recent_limit)
                .collect();

            if !recent.is_empty() {
                return recent;
            }
            return self.actions.iter().take(self.config.default_listing).collect();
        }

        let mut matches: Vec<&QuickAction> =
            self.actions.iter().filter(|a| a.matches(&needle)).collect();
        matches.sort_by(|a, b| self.frequency(&b.id).cmp(&self.frequency(&a.id)));
        matches
    }

    /// Run an action by id. Unknown or filtered ids do nothing.
    pub fn execute(&mut self, id: &ActionId) -> Option<CoreEvent> {
        let Some(action) = self.get(id) else {
            debug!(action_id = %id, "Unknown quick action");
            return None;
        };

        let outcome = action.invoke();

        let recent_limit = self.config.recent_limit;
        self.preferences.update(self.store.as_ref(), |prefs| {
            *prefs.frequency.entry(id.clone()).or_insert(0) += 1;
            prefs.recent.retain(|r| r != id);
            prefs.recent.insert(0, id.clone());
            prefs.recent.truncate(recent_limit);
        });

        info!(action_id = %id, outcome = ?outcome, "Quick action executed");

        Some(CoreEvent::ActionExecuted {
            action_id: id.clone(),
            outcome,
            close_palette: true,
        })
    }
}

/// Built-in palette entries
pub fn default_catalog() -> Vec<QuickAction> {
    vec![
        QuickAction::navigate("new-prompt", "Create New Prompt", "/prompts/new")
            .description("Start a blank prompt in the editor")
            .category("create")
            .icon("plus")
            .shortcut("Ctrl+N")
            .keywords(&["prompt", "new", "create", "write"])
            .requires(PERM_PROMPTS_CREATE),
        QuickAction::navigate("open-chat", "Open Chat Mode", "/chat")
            .description("Talk to the assistant in a conversation")
            .category("navigate")
            .icon("message-square")
            .keywords(&["chat", "conversation", "talk", "message"]),
        QuickAction::navigate("new-agent", "Create Agent", "/agents/new")
            .description("Configure an autonomous agent")
            .category("create")
            .icon("bot")
            .keywords(&["agent", "bot", "chatbot", "automation"])
            .requires(PERM_AGENTS_MANAGE),
        QuickAction::navigate("start-research", "Start Research", "/research/new")
            .description("Launch a multi-step research task")
            .category("create")
            .icon("search")
            .keywords(&["research", "investigate", "explore"])
            .requires(PERM_RESEARCH_RUN),
        QuickAction::navigate("browse-templates", "Browse Templates", "/templates")
            .description("Pick a starting point from the template library")
            .category("navigate")
            .icon("layout-template")
            .keywords(&["template", "library", "examples"]),
        QuickAction::navigate("view-analytics", "View Analytics", "/analytics")
            .description("See how navigation is used")
            .category("navigate")
            .icon("bar-chart")
            .keywords(&["analytics", "stats", "usage", "metrics"])
            .requires(PERM_ANALYTICS_VIEW),
        QuickAction::new("export-analytics", "Export Analytics", || {
            ActionOutcome::ExportAnalytics
        })
        .description("Download usage data as JSON")
        .category("data")
        .icon("download")
        .keywords(&["export", "download", "json", "backup"])
        .requires(PERM_ANALYTICS_EXPORT),
        QuickAction::navigate("open-settings", "Open Settings", "/settings")
            .description("Change application preferences")
            .category("navigate")
            .icon("settings")
            .shortcut("Ctrl+,")
            .keywords(&["settings", "preferences", "configure"])
            .requires(PERM_SETTINGS_MANAGE),
        QuickAction::new("toggle-theme", "Toggle Theme", || ActionOutcome::ToggleSetting {
            setting: "theme".into(),
        })
        .description("Cycle between system, light, and dark")
        .category("appearance")
        .icon("moon")
        .keywords(&["dark", "light", "theme", "appearance"]),
        QuickAction::new("voice-command", "Voice Command", || {
            ActionOutcome::StartVoiceInput
        })
        .description("Dictate a command with the microphone")
        .category("input")
        .icon("mic")
        .keywords(&["voice", "speech", "dictate", "microphone"]),
        QuickAction::navigate("go-dashboard", "Go to Dashboard", "/")
            .description("Return to the overview page")
            .category("navigate")
            .icon("home")
            .keywords(&["home", "dashboard", "overview"]),
    ]
}
