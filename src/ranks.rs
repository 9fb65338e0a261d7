//! Rank membership lives on the actor as `rank:`-prefixed tags; everything
//! else (the rank catalog, the chat framing strings) lives in one
//! world-dynamic property.

use crate::config::ChatRankConfig;
use rankchat_host::{Actor, World};
use rankchat_storage::{DynamicProperty, RootType};

pub const RANK_TAG_PREFIX: &str = "rank:";

/// The persisted [`ChatRankConfig`] slot.
pub fn config_property() -> DynamicProperty<ChatRankConfig> {
    DynamicProperty::new("rankchat:chatRankConfig", RootType::Object).world_dynamic()
}

/// The stored config, or the defaults when nothing (readable) is stored.
pub fn load_config(world: &dyn World) -> ChatRankConfig {
    config_property().get(world).unwrap_or_default()
}

/// The actor's ranks in tag order, or the configured default when it has
/// none.
pub fn get_ranks(actor: &dyn Actor, config: &ChatRankConfig) -> Vec<String> {
    let ranks: Vec<String> = actor
        .tags()
        .iter()
        .filter_map(|tag| tag.strip_prefix(RANK_TAG_PREFIX))
        .map(str::to_string)
        .collect();
    if ranks.is_empty() {
        vec![config.default_rank.clone()]
    } else {
        ranks
    }
}

/// The actor's rank tags without any default substitution.
pub fn raw_ranks(actor: &dyn Actor) -> Vec<String> {
    actor
        .tags()
        .iter()
        .filter_map(|tag| tag.strip_prefix(RANK_TAG_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Returns false if the actor already held the rank.
pub fn add_rank(actor: &dyn Actor, rank: &str) -> bool {
    actor.add_tag(&format!("{RANK_TAG_PREFIX}{rank}"))
}

/// Returns false if the actor did not hold the rank.
pub fn remove_rank(actor: &dyn Actor, rank: &str) -> bool {
    actor.remove_tag(&format!("{RANK_TAG_PREFIX}{rank}"))
}

/// Replaces every rank tag on the actor.
pub fn set_ranks(actor: &dyn Actor, ranks: &[String]) {
    for rank in raw_ranks(actor) {
        remove_rank(actor, &rank);
    }
    for rank in ranks {
        add_rank(actor, rank);
    }
}
