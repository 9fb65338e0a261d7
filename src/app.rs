//! The explicit add-on entry point: one [`App`] owns the command dispatcher
//! and the chat relay, and the embedding engine feeds it hooks.

use crate::commands;
use crate::config::PREFIX;
use crate::relay::ChatRelay;
use crate::{ranks, relay};
use rankchat_command::{ChatOutcome, CommandDispatcher, CommandRegistry};
use rankchat_host::{Actor, ChatEvent, UiSurface, World};
use std::sync::Arc;
use tracing::debug;

/// Script-event id that grants operator status to its player source.
pub const OP_EVENT_ID: &str = "rankchat:op";

pub struct App {
    dispatcher: CommandDispatcher,
    relay: ChatRelay,
}

impl App {
    /// Builds the registry, wires the rank-formatting chat listener, and
    /// returns the ready add-on. Panics on conflicting command
    /// registrations; those are startup bugs.
    pub fn new() -> App {
        let mut registry = CommandRegistry::new();
        commands::register_commands(&mut registry);

        let mut relay = ChatRelay::new();
        relay.subscribe(|event, world| {
            let config = ranks::load_config(world);
            world.send_message(&relay::format_chat(
                &config,
                event.sender.as_ref(),
                &event.message,
            ));
            true
        });

        App {
            dispatcher: CommandDispatcher::new(registry, PREFIX),
            relay,
        }
    }

    /// The engine's before-chat hook. Returns whether the engine must
    /// suppress its own broadcast of the raw line.
    pub fn handle_chat(&mut self, event: &ChatEvent, world: &dyn World) -> bool {
        match self.dispatcher.handle_chat(event, world) {
            ChatOutcome::Handled => true,
            ChatOutcome::Chat => self.relay.dispatch(event, world),
        }
    }

    /// Runs the invocations scheduled by earlier chat hooks. Call once per
    /// engine tick.
    pub fn tick(&mut self, world: &dyn World, ui: &dyn UiSurface) {
        self.dispatcher.tick(world, ui);
    }

    pub fn actor_left(&mut self, actor_id: &str) {
        self.dispatcher.actor_removed(actor_id);
    }

    /// The engine's script-event hook. Only [`OP_EVENT_ID`] from a player
    /// source does anything.
    pub fn handle_script_event(&mut self, id: &str, source: Option<&Arc<dyn Actor>>) {
        if id != OP_EVENT_ID {
            return;
        }
        let Some(source) = source else {
            return;
        };
        if source.type_id() != "minecraft:player" {
            debug!(id, source = %source.type_id(), "op event from a non-player source");
            return;
        }
        source.set_op(true);
        source.send_message("§aSet you as OP!");
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    pub fn relay_mut(&mut self) -> &mut ChatRelay {
        &mut self.relay
    }
}

impl Default for App {
    fn default() -> App {
        App::new()
    }
}
