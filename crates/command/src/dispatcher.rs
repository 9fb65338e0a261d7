use crate::argument::{ArgumentType, MatchContext};
use crate::context::{ArgumentSet, CommandCtx};
use crate::cooldown::CooldownLedger;
use crate::error::CommandError;
use crate::node::{Executor, NodeId, NodeKind};
use crate::registry::CommandRegistry;
use crate::tokenizer::tokenize;
use crate::value::{resolve_location, Value};
use indexmap::IndexSet;
use rankchat_host::{Actor, ChatEvent, UiSurface, World};
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, error};

/// What the chat hook should tell the engine to do with the raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Not a command; let ordinary chat processing see it.
    Chat,
    /// A command line (well-formed or not); suppress the broadcast.
    Handled,
}

struct PendingInvocation {
    executor: Executor,
    event: ChatEvent,
    arguments: ArgumentSet,
    command: String,
}

/// Intercepts outgoing chat, walks the command forest, and runs terminal
/// callbacks on the following tick.
pub struct CommandDispatcher {
    registry: CommandRegistry,
    prefix: String,
    cooldowns: CooldownLedger,
    pending: VecDeque<PendingInvocation>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry, prefix: impl Into<String>) -> CommandDispatcher {
        CommandDispatcher {
            registry,
            prefix: prefix.into(),
            cooldowns: CooldownLedger::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The synchronous chat hook. Must fully classify the line before
    /// returning; the engine uses the outcome to decide whether the raw
    /// line is broadcast. Terminal callbacks are never run from here.
    pub fn handle_chat(&mut self, event: &ChatEvent, world: &dyn World) -> ChatOutcome {
        if !event.message.starts_with(&self.prefix) {
            return ChatOutcome::Chat;
        }
        self.dispatch(event, world);
        ChatOutcome::Handled
    }

    /// Runs every invocation scheduled by the previous chat hooks. Called
    /// once per host tick.
    pub fn tick(&mut self, world: &dyn World, ui: &dyn UiSurface) {
        while let Some(pending) = self.pending.pop_front() {
            let mut ctx =
                CommandCtx::new(world, ui, &self.registry, &pending.event, pending.arguments);
            match (pending.executor)(&mut ctx) {
                Ok(()) => {}
                Err(CommandError::Runtime(err)) => ctx.reply(&err.to_string()),
                Err(CommandError::Internal(err)) => {
                    error!("command \"{}\" failed: {err}", pending.command);
                }
            }
        }
    }

    /// Drops per-invoker state when an actor disconnects.
    pub fn actor_removed(&mut self, actor_id: &str) {
        self.cooldowns.forget(actor_id);
    }

    fn dispatch(&mut self, event: &ChatEvent, world: &dyn World) {
        let tokens = tokenize(&event.message, &self.prefix);
        let sender = event.sender.as_ref();

        let first = tokens.first().map(String::as_str).unwrap_or("");
        let Some(root_id) = self.registry.resolve_root(first) else {
            debug!(command = first, "unknown command");
            sender.send_message(&format!(
                "§cUnknown command: {first}. Please check that the command exists and that you have permission to use it.",
            ));
            return;
        };
        let root = self.registry.node(root_id);

        if !root.data.allows(sender) {
            self.send_no_permission(sender, root_id);
            return;
        }

        if let Some(window) = root.data.cooldown {
            let check = self
                .cooldowns
                .check(&sender.id(), &root.data.name, window, Instant::now());
            if let Err(remaining) = check {
                let seconds = remaining.as_secs_f64().ceil() as u64;
                sender.send_message(&format!(
                    "§cCommand \"{}\" is on cooldown, try again in {} seconds.",
                    root.data.name, seconds
                ));
                return;
            }
        }

        let args = &tokens[1..];
        let Some(matched) = self.walk(root_id, args, event, world) else {
            return;
        };

        let target = matched.last().map(|&(id, _)| id).unwrap_or(root_id);
        let Some(executor) = self.registry.node(target).executor else {
            // A pass-through leaf with no handler; nothing can be invoked
            // at this depth.
            self.send_syntax_fail(sender, root_id, target, args, matched.len());
            return;
        };

        let arguments = self.collect_arguments(&matched, args, event);
        let command = self.registry.node(root_id).data.name.clone();
        debug!(command = %command, sender = %sender.name(), "scheduling command");
        self.pending.push_back(PendingInvocation {
            executor,
            event: event.clone(),
            arguments,
            command,
        });
    }

    /// Matches tokens against children in declaration order, first match
    /// wins, no backtracking across siblings. Returns the matched path (and
    /// per-node values) or `None` after having messaged the sender.
    fn walk(
        &self,
        root_id: NodeId,
        args: &[String],
        event: &ChatEvent,
        world: &dyn World,
    ) -> Option<Vec<(NodeId, Value)>> {
        let sender = event.sender.as_ref();
        let match_ctx = MatchContext {
            world,
            registry: &self.registry,
        };

        let mut matched: Vec<(NodeId, Value)> = Vec::new();
        let mut current = root_id;
        let mut index = 0;

        loop {
            let node = self.registry.node(current);
            if node.children.is_empty() {
                // Bottomed out; trailing tokens are ignored.
                return Some(matched);
            }

            let token = args.get(index);
            let hit = token.and_then(|token| {
                node.children.iter().copied().find_map(|child_id| {
                    let child = self.registry.node(child_id);
                    match &child.kind {
                        NodeKind::Literal => {
                            (child.name() == token).then(|| (child_id, Value::String(token.clone())))
                        }
                        NodeKind::Argument { arg_type } => arg_type
                            .matches(token, &match_ctx)
                            .map(|value| (child_id, value)),
                    }
                })
            });

            let Some((child_id, value)) = hit else {
                if token.is_none() && node.has_executor() {
                    // Missing optional trailing arguments: use the handler
                    // at this depth.
                    return Some(matched);
                }
                self.send_syntax_fail(sender, root_id, current, args, index);
                return None;
            };

            if !self.registry.node(child_id).data.allows(sender) {
                self.send_no_permission(sender, child_id);
                return None;
            }

            matched.push((child_id, value));
            current = child_id;
            index += 1;
        }
    }

    /// Builds the positional argument set for the terminal callback.
    /// Literals and `*`-sink parameters are dropped; each location node
    /// pulls its two sink followers into one resolved coordinate.
    fn collect_arguments(
        &self,
        matched: &[(NodeId, Value)],
        args: &[String],
        event: &ChatEvent,
    ) -> ArgumentSet {
        let mut collected = Vec::new();

        for (index, &(node_id, ref value)) in matched.iter().enumerate() {
            let node = self.registry.node(node_id);
            if node.is_sink() {
                continue;
            }
            match &node.kind {
                NodeKind::Literal => continue,
                NodeKind::Argument { arg_type } => {
                    if let ArgumentType::Location = arg_type {
                        let x = args[index].as_str();
                        let y = args.get(index + 1).map(String::as_str).unwrap_or("~");
                        let z = args.get(index + 2).map(String::as_str).unwrap_or("~");
                        let sender = &event.sender;
                        let location = resolve_location(
                            [x, y, z],
                            sender.position(),
                            sender.view_direction(),
                        );
                        collected.push((node.name().to_string(), Value::Location(location)));
                    } else {
                        collected.push((node.name().to_string(), value.clone()));
                    }
                }
            }
        }

        ArgumentSet::new(collected)
    }

    fn send_no_permission(&self, sender: &dyn Actor, node_id: NodeId) {
        let data = &self.registry.node(node_id).data;
        match &data.invalid_permission {
            Some(message) => sender.send_message(message),
            None => sender.send_message(&format!(
                "§cYou do not have permission to use \"{}\"",
                data.name
            )),
        }
    }

    /// Locates the failing token and describes what would have matched:
    /// the single expected type's own rejection reason, or the distinct
    /// accepted types when more than one child could have matched.
    fn send_syntax_fail(
        &self,
        sender: &dyn Actor,
        root_id: NodeId,
        at: NodeId,
        args: &[String],
        index: usize,
    ) {
        let root = self.registry.node(root_id);
        let node = self.registry.node(at);
        let token = args.get(index).map(String::as_str);

        let before = args[..index].join(" ");
        let after = args.get(index + 1..).unwrap_or(&[]).join(" ");
        sender.send_message(&format!(
            "§cSyntax error: unexpected \"{}\": at \"{}{} {} >>{}<< {}\"",
            token.unwrap_or(" "),
            self.prefix,
            root.data.name,
            before,
            token.unwrap_or(" "),
            after
        ));

        let children = &node.children;
        if children.len() > 1 || token.is_none() {
            let types: IndexSet<String> = children
                .iter()
                .map(|&id| {
                    let child = self.registry.node(id);
                    match child.kind {
                        NodeKind::Literal => child.name().to_string(),
                        NodeKind::Argument { .. } => child.type_name(),
                    }
                })
                .collect();
            let argument = children
                .first()
                .map(|&id| self.registry.node(id).name().to_string())
                .unwrap_or_default();
            let types = types
                .iter()
                .map(|t| format!("\"{t}\""))
                .collect::<Vec<_>>()
                .join(", ");
            sender.send_message(&format!(
                "§c\"{}\" is not valid! Argument \"{}\" can be typeof: {}",
                token.unwrap_or("undefined"),
                argument,
                types
            ));
        } else if let Some(&only) = children.first() {
            let child = self.registry.node(only);
            let token = token.unwrap_or("undefined");
            let reason = match &child.kind {
                NodeKind::Literal => format!("{} should be {}!", token, child.name()),
                NodeKind::Argument { arg_type } => arg_type.fail(token),
            };
            sender.send_message(&format!("§c{reason}"));
        }
    }
}
