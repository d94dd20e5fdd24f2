//! Core events emitted by the analytics service and quick actions

use serde::Serialize;
use wayfinder_util::{ActionId, ItemId, SessionId};

use crate::ActionOutcome;

/// Events emitted by mutating operations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoreEvent {
    /// A click was recorded
    NavigationTracked {
        item_id: ItemId,
        session_id: SessionId,
        click_count: u64,
    },

    /// The session left a page and its time was credited
    PageTimeCredited {
        session_id: SessionId,
        page: String,
        elapsed_ms: u64,
        items: Vec<ItemId>,
    },

    /// All usage data was removed
    AnalyticsCleared { item_count: usize },

    /// A quick action ran
    ActionExecuted {
        action_id: ActionId,
        outcome: ActionOutcome,
        close_palette: bool,
    },
}
