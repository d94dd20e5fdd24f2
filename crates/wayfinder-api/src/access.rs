//! Static roles and the permissions they grant

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const PERM_PROMPTS_CREATE: &str = "prompts:create";
pub const PERM_AGENTS_MANAGE: &str = "agents:manage";
pub const PERM_RESEARCH_RUN: &str = "research:run";
pub const PERM_ANALYTICS_VIEW: &str = "analytics:view";
pub const PERM_ANALYTICS_EXPORT: &str = "analytics:export";
pub const PERM_SETTINGS_MANAGE: &str = "settings:manage";

/// Fixed role assignment (no authentication behind it)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Editor,
    Viewer,
}

impl Role {
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[
                PERM_PROMPTS_CREATE,
                PERM_AGENTS_MANAGE,
                PERM_RESEARCH_RUN,
                PERM_ANALYTICS_VIEW,
                PERM_ANALYTICS_EXPORT,
                PERM_SETTINGS_MANAGE,
            ],
            Role::Editor => &[
                PERM_PROMPTS_CREATE,
                PERM_AGENTS_MANAGE,
                PERM_RESEARCH_RUN,
                PERM_ANALYTICS_VIEW,
            ],
            Role::Viewer => &[PERM_ANALYTICS_VIEW],
        }
    }

    pub fn grants(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}
