use crate::argument::ArgumentType;
use crate::context::CommandCtx;
use crate::error::CommandResult;
use rankchat_host::Actor;
use std::time::Duration;

/// Permission predicate evaluated against the invoking actor.
pub type Requires = fn(&dyn Actor) -> bool;

/// Terminal handler attached to a node.
pub type Executor = fn(&mut CommandCtx<'_>) -> CommandResult<()>;

/// Handle into the registry's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Declarative data attached to a node. Aliases and cooldowns are only
/// meaningful on root nodes.
#[derive(Clone)]
pub struct CommandData {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub requires: Option<Requires>,
    pub invalid_permission: Option<String>,
    pub cooldown: Option<Duration>,
}

impl CommandData {
    pub fn new(name: impl Into<String>) -> CommandData {
        CommandData {
            name: name.into(),
            description: None,
            aliases: Vec::new(),
            requires: None,
            invalid_permission: None,
            cooldown: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn requires(mut self, requires: Requires) -> Self {
        self.requires = Some(requires);
        self
    }

    /// Message shown instead of the generic denial when `requires` fails.
    pub fn invalid_permission(mut self, message: impl Into<String>) -> Self {
        self.invalid_permission = Some(message.into());
        self
    }

    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// True unless a predicate is set and rejects the actor.
    pub(crate) fn allows(&self, actor: &dyn Actor) -> bool {
        self.requires.is_none_or(|requires| requires(actor))
    }
}

#[derive(Clone)]
pub(crate) enum NodeKind {
    /// Matches its own name exactly. Roots are literals at depth 0.
    Literal,
    /// Matches one token against a typed matcher. A name ending in `*`
    /// marks a sink parameter that is hidden from the argument list.
    Argument { arg_type: ArgumentType },
}

pub(crate) struct CommandNode {
    pub(crate) kind: NodeKind,
    pub(crate) data: CommandData,
    pub(crate) depth: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) executor: Option<Executor>,
}

impl CommandNode {
    pub(crate) fn name(&self) -> &str {
        &self.data.name
    }

    pub(crate) fn is_sink(&self) -> bool {
        self.data.name.ends_with('*')
    }

    pub(crate) fn has_executor(&self) -> bool {
        self.executor.is_some()
    }

    /// Annotation used in syntax failure listings and help text.
    pub(crate) fn type_name(&self) -> String {
        match &self.kind {
            NodeKind::Literal => "literal".to_string(),
            NodeKind::Argument { arg_type } => arg_type.type_name(),
        }
    }
}
