use crate::argument::ArgumentType;
use crate::node::{CommandData, CommandNode, Executor, NodeId, NodeKind, Requires};
use rankchat_host::Actor;

/// The command forest: an arena of nodes plus the set of roots. Built once
/// at startup by registration calls and read-only afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    nodes: Vec<CommandNode>,
    roots: Vec<NodeId>,
}

impl CommandRegistry {
    pub fn new() -> CommandRegistry {
        CommandRegistry::default()
    }

    /// Registers a new root command.
    ///
    /// Panics if the name or any alias collides with an already registered
    /// root; the dispatcher's root lookup assumes no collisions, so a clash
    /// is a startup registration bug.
    pub fn register(&mut self, data: CommandData) -> NodeId {
        let mut words = vec![data.name.clone()];
        words.extend(data.aliases.iter().cloned());
        for word in &words {
            if self.resolve_root(word).is_some() {
                panic!("root command \"{word}\" is already registered");
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode {
            kind: NodeKind::Literal,
            data,
            depth: 0,
            parent: None,
            children: Vec::new(),
            executor: None,
        });
        self.roots.push(id);
        id
    }

    /// Continues declaration at an existing node.
    pub fn build(&mut self, node: NodeId) -> CommandBuilder<'_> {
        CommandBuilder {
            registry: self,
            node,
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut CommandNode {
        &mut self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Depth-0 lookup by name or alias, case-sensitive.
    pub(crate) fn resolve_root(&self, word: &str) -> Option<NodeId> {
        self.roots.iter().copied().find(|&id| {
            let data = &self.node(id).data;
            data.name == word || data.aliases.iter().any(|a| a == word)
        })
    }

    /// Depth-0 lookup by primary name only.
    pub fn root_by_name(&self, name: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.node(id).data.name == name)
    }

    /// Roots the viewer is permitted to see, in registration order.
    pub fn visible_roots(&self, viewer: &dyn Actor) -> Vec<NodeId> {
        self.roots
            .iter()
            .copied()
            .filter(|&id| self.node(id).data.allows(viewer))
            .collect()
    }

    fn add_child(&mut self, parent: NodeId, kind: NodeKind, data: CommandData) -> NodeId {
        if let NodeKind::Literal = kind {
            for &sibling in &self.node(parent).children {
                let sibling = self.node(sibling);
                if matches!(sibling.kind, NodeKind::Literal) && sibling.name() == data.name {
                    panic!(
                        "literal \"{}\" is already declared under \"{}\"",
                        data.name,
                        self.node(parent).name()
                    );
                }
            }
        }

        let depth = self.node(parent).depth + 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(CommandNode {
            kind,
            data,
            depth,
            parent: Some(parent),
            children: Vec::new(),
            executor: None,
        });
        self.node_mut(parent).children.push(id);
        id
    }
}

/// Chaining declaration handle. Each branching call returns the builder for
/// the newly created child, so trees are written the way they dispatch.
pub struct CommandBuilder<'a> {
    registry: &'a mut CommandRegistry,
    node: NodeId,
}

impl<'a> CommandBuilder<'a> {
    pub fn id(&self) -> NodeId {
        self.node
    }

    /// Adds a child matching an exact keyword; used for named sub-commands.
    pub fn literal(self, data: CommandData) -> CommandBuilder<'a> {
        let child = self.registry.add_child(self.node, NodeKind::Literal, data);
        CommandBuilder {
            registry: self.registry,
            node: child,
        }
    }

    /// Adds a child matching the given typed matcher.
    pub fn argument(self, name: impl Into<String>, arg_type: ArgumentType) -> CommandBuilder<'a> {
        let child = self.registry.add_child(
            self.node,
            NodeKind::Argument { arg_type },
            CommandData::new(name),
        );
        CommandBuilder {
            registry: self.registry,
            node: child,
        }
    }

    pub fn string(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::string())
    }

    pub fn int(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::integer())
    }

    pub fn int_range(self, name: impl Into<String>, min: i64, max: i64) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::integer_range(min, max))
    }

    pub fn float(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::float())
    }

    pub fn boolean(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::boolean())
    }

    pub fn array(
        self,
        name: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::array(options))
    }

    pub fn player(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::player())
    }

    pub fn target(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::target())
    }

    pub fn duration(self, name: impl Into<String>) -> CommandBuilder<'a> {
        self.argument(name, ArgumentType::duration())
    }

    /// Adds a coordinate argument. One call expands into three chained
    /// location nodes (x, y, z); the trailing two carry the `*` sink suffix
    /// and the dispatcher collapses all three tokens into a single resolved
    /// value under `name`.
    pub fn location(self, name: impl Into<String>) -> CommandBuilder<'a> {
        let name = name.into();
        let expand = !name.ends_with('*');
        let builder = self.argument(name.clone(), ArgumentType::location());
        if expand {
            builder
                .location(format!("{name}_y*"))
                .location(format!("{name}_z*"))
        } else {
            builder
        }
    }

    /// Sets a permission predicate on the current node.
    pub fn requires(self, requires: Requires) -> CommandBuilder<'a> {
        self.registry.node_mut(self.node).data.requires = Some(requires);
        self
    }

    /// Message shown instead of the generic denial for this node.
    pub fn invalid_permission(self, message: impl Into<String>) -> CommandBuilder<'a> {
        self.registry.node_mut(self.node).data.invalid_permission = Some(message.into());
        self
    }

    /// Attaches the terminal handler. A node holds at most one callback;
    /// last write wins.
    pub fn executes(self, executor: Executor) -> CommandBuilder<'a> {
        self.registry.node_mut(self.node).executor = Some(executor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_expands_into_three_nodes() {
        let mut registry = CommandRegistry::new();
        let root = registry.register(CommandData::new("setspawn"));
        registry.build(root).location("pos").executes(|_| Ok(()));

        let x = registry.node(root).children[0];
        assert_eq!(registry.node(x).name(), "pos");
        assert!(!registry.node(x).is_sink());
        let y = registry.node(x).children[0];
        assert_eq!(registry.node(y).name(), "pos_y*");
        assert!(registry.node(y).is_sink());
        let z = registry.node(y).children[0];
        assert_eq!(registry.node(z).name(), "pos_z*");
        assert!(registry.node(z).has_executor());
        assert_eq!(registry.node(z).depth, 3);
    }

    #[test]
    #[should_panic(expected = "already declared")]
    fn duplicate_literal_sibling_panics() {
        let mut registry = CommandRegistry::new();
        let root = registry.register(CommandData::new("rank"));
        registry.build(root).literal(CommandData::new("create"));
        registry.build(root).literal(CommandData::new("create"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn colliding_root_alias_panics() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandData::new("help").alias("h"));
        registry.register(CommandData::new("h"));
    }

    #[test]
    fn aliases_resolve_to_the_root() {
        let mut registry = CommandRegistry::new();
        let help = registry.register(CommandData::new("help").alias("?").alias("h"));
        assert_eq!(registry.resolve_root("?"), Some(help));
        assert_eq!(registry.resolve_root("help"), Some(help));
        assert_eq!(registry.resolve_root("Help"), None);
    }
}
