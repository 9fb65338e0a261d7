//! Non-command chat handling.
//!
//! Listeners see every chat line the dispatcher declined. A listener that
//! returns `true` has taken over the line; the engine's vanilla broadcast
//! is then suppressed.

use crate::config::ChatRankConfig;
use crate::ranks;
use rankchat_host::{Actor, ChatEvent, World};

pub type ListenerId = usize;

type ChatListener = Box<dyn FnMut(&ChatEvent, &dyn World) -> bool>;

#[derive(Default)]
pub struct ChatRelay {
    listeners: Vec<(ListenerId, ChatListener)>,
    next_id: ListenerId,
}

impl ChatRelay {
    pub fn new() -> ChatRelay {
        ChatRelay::default()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ChatEvent, &dyn World) -> bool + 'static,
    ) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was never subscribed or already removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Offers the line to every listener in subscription order. Returns
    /// whether any listener claimed it.
    pub fn dispatch(&mut self, event: &ChatEvent, world: &dyn World) -> bool {
        let mut claimed = false;
        for (_, listener) in &mut self.listeners {
            claimed |= listener(event, world);
        }
        claimed
    }
}

/// The rank-framed broadcast line for one chat message.
pub fn format_chat(config: &ChatRankConfig, sender: &dyn Actor, message: &str) -> String {
    let ranks = ranks::get_ranks(sender, config);
    format!(
        "{}{}{} {}:§r {}",
        config.start_string,
        ranks.join(&config.join_string),
        config.end_string,
        sender.name(),
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankchat_host::fake::FakeWorld;

    #[test]
    fn formats_with_the_default_rank() {
        let world = FakeWorld::new();
        let sender = world.spawn("Steve");
        let config = ChatRankConfig::default();

        assert_eq!(
            format_chat(&config, sender.as_ref(), "hello"),
            "§r§l§8[§r§bMember§r§l§8]§r§7 Steve:§r hello"
        );
    }

    #[test]
    fn joins_multiple_ranks_with_the_join_string() {
        let world = FakeWorld::new();
        let sender = world.spawn("Steve");
        sender.add_tag("rank:§cAdmin");
        sender.add_tag("rank:§bVIP");
        let config = ChatRankConfig::default();

        assert_eq!(
            format_chat(&config, sender.as_ref(), "hi"),
            "§r§l§8[§r§cAdmin§r§l§8][§r§bVIP§r§l§8]§r§7 Steve:§r hi"
        );
    }

    #[test]
    fn unsubscribed_listeners_stop_receiving() {
        let world = FakeWorld::new();
        let sender = world.spawn("Steve");
        let mut relay = ChatRelay::new();
        let id = relay.subscribe(|_, _| true);

        let event = world.chat(&sender, "hello");
        assert!(relay.dispatch(&event, &world));

        assert!(relay.unsubscribe(id));
        assert!(!relay.unsubscribe(id));
        assert!(!relay.dispatch(&event, &world));
    }
}
