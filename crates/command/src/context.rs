use crate::error::{CommandResult, InternalError};
use crate::registry::CommandRegistry;
use crate::value::Value;
use rankchat_host::{Actor, ChatEvent, UiSurface, Vec3, World};
use std::sync::Arc;

/// The typed arguments consumed on the way to a terminal callback, in
/// positional order. Literal-matched and sink tokens are excluded; three
/// location tokens appear as one resolved value.
pub struct ArgumentSet {
    args: Vec<(String, Value)>,
}

impl ArgumentSet {
    pub(crate) fn new(args: Vec<(String, Value)>) -> ArgumentSet {
        ArgumentSet { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Values in the order they were consumed.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.args.iter().map(|(_, value)| value)
    }

    fn get(&self, name: &str) -> CommandResult<&Value> {
        self.args
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
            .ok_or_else(|| {
                InternalError::MissingArgument {
                    name: name.to_string(),
                }
                .into()
            })
    }

    pub fn get_string(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_string()?.clone())
    }

    pub fn get_integer(&self, name: &str) -> CommandResult<i64> {
        self.get(name)?.as_integer()
    }

    pub fn get_float(&self, name: &str) -> CommandResult<f64> {
        self.get(name)?.as_float()
    }

    pub fn get_boolean(&self, name: &str) -> CommandResult<bool> {
        self.get(name)?.as_boolean()
    }

    pub fn get_player(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_player()?.clone())
    }

    pub fn get_target(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_target()?.clone())
    }

    pub fn get_duration(&self, name: &str) -> CommandResult<String> {
        Ok(self.get(name)?.as_duration()?.clone())
    }

    pub fn get_location(&self, name: &str) -> CommandResult<Vec3> {
        self.get(name)?.as_location()
    }
}

/// Everything a terminal callback gets to see: the raw chat event, the host
/// surfaces, the read-only command forest, and the parsed arguments.
pub struct CommandCtx<'a> {
    pub world: &'a dyn World,
    pub ui: &'a dyn UiSurface,
    registry: &'a CommandRegistry,
    event: &'a ChatEvent,
    arguments: ArgumentSet,
}

impl<'a> CommandCtx<'a> {
    pub(crate) fn new(
        world: &'a dyn World,
        ui: &'a dyn UiSurface,
        registry: &'a CommandRegistry,
        event: &'a ChatEvent,
        arguments: ArgumentSet,
    ) -> CommandCtx<'a> {
        CommandCtx {
            world,
            ui,
            registry,
            event,
            arguments,
        }
    }

    pub fn sender(&self) -> &Arc<dyn Actor> {
        &self.event.sender
    }

    /// The raw chat line that triggered this command.
    pub fn message(&self) -> &str {
        &self.event.message
    }

    pub fn args(&self) -> &ArgumentSet {
        &self.arguments
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    pub fn reply(&self, message: &str) {
        self.event.sender.send_message(message);
    }

    /// Resolves a `Player` argument back to the connected actor. The match
    /// already validated presence, but the actor can disconnect between the
    /// chat hook and the deferred tick.
    pub fn resolve_player(&self, name: &str) -> CommandResult<Arc<dyn Actor>> {
        self.world.actor_by_name(name).ok_or_else(|| {
            crate::error::RuntimeError::Message(format!(
                "§cplayer: \"{name}\", is not in this world"
            ))
            .into()
        })
    }
}
