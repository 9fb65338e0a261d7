//! Add-on wide constants and the persisted chat-rank configuration.

use serde::{Deserialize, Serialize};

/// Chat lines starting with this are treated as commands.
pub const PREFIX: &str = "-";

pub const DEFAULT_RANK: &str = "§bMember";
pub const START_STRING: &str = "§r§l§8[§r";
pub const JOIN_STRING: &str = "§r§l§8][§r";
pub const END_STRING: &str = "§r§l§8]§r§7";

/// The world-persisted chat-rank settings. Unknown or missing fields fall
/// back to the shipped defaults, so older stored configs keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatRankConfig {
    /// Ranks an operator may hand out, in creation order.
    pub ranks: Vec<String>,
    /// Shown when a player has no rank tag at all.
    pub default_rank: String,
    pub start_string: String,
    pub join_string: String,
    pub end_string: String,
}

impl Default for ChatRankConfig {
    fn default() -> ChatRankConfig {
        ChatRankConfig {
            ranks: Vec::new(),
            default_rank: DEFAULT_RANK.to_string(),
            start_string: START_STRING.to_string(),
            join_string: JOIN_STRING.to_string(),
            end_string: END_STRING.to_string(),
        }
    }
}
