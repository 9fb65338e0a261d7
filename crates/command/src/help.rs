//! Read-only rendering of the command forest: paginated listings and
//! per-command usage lines, consuming the same tree the dispatcher walks.

use crate::node::{NodeId, NodeKind};
use crate::registry::CommandRegistry;
use itertools::Itertools;
use rankchat_host::Actor;

pub const PAGE_SIZE: usize = 5;

/// Number of help pages the viewer can see. Zero when no visible commands.
pub fn max_pages(registry: &CommandRegistry, viewer: &dyn Actor) -> usize {
    registry.visible_roots(viewer).len().div_ceil(PAGE_SIZE)
}

/// Renders one help page. Out-of-range page numbers clamp into `[1, max]`;
/// zero visible commands yields the explicit zero-page header.
pub fn render_page(
    registry: &CommandRegistry,
    prefix: &str,
    viewer: &dyn Actor,
    page: i64,
) -> Vec<String> {
    let roots = registry.visible_roots(viewer);
    let max = roots.len().div_ceil(PAGE_SIZE);

    if max == 0 {
        return vec![page_header(prefix, 0, 0)];
    }

    let page = (page.max(1) as usize).min(max);
    let mut lines = vec![page_header(prefix, page, max)];
    for &root in &roots[PAGE_SIZE * page - PAGE_SIZE..(PAGE_SIZE * page).min(roots.len())] {
        render_usages(registry, prefix, viewer, root, root, &mut Vec::new(), &mut lines);
    }
    lines
}

/// Renders every usage line of a single command.
pub fn render_command(
    registry: &CommandRegistry,
    prefix: &str,
    viewer: &dyn Actor,
    root: NodeId,
) -> Vec<String> {
    let mut lines = Vec::new();
    render_usages(registry, prefix, viewer, root, root, &mut Vec::new(), &mut lines);
    lines
}

fn page_header(prefix: &str, page: usize, max: usize) -> String {
    format!("§2--- Showing help page {page} of {max} ({prefix}help <page: int>) ---")
}

/// Walks every reachable path under `node`, emitting one line per node
/// holding a callback. Subtrees the viewer may not use are pruned.
fn render_usages(
    registry: &CommandRegistry,
    prefix: &str,
    viewer: &dyn Actor,
    root: NodeId,
    node_id: NodeId,
    path: &mut Vec<NodeId>,
    lines: &mut Vec<String>,
) {
    let node = registry.node(node_id);
    if !node.data.allows(viewer) {
        return;
    }

    let is_root = node.depth == 0;
    if !is_root {
        path.push(node_id);
    }

    if node.has_executor() {
        lines.push(format_usage(registry, prefix, root, path));
    }
    for &child in &node.children {
        render_usages(registry, prefix, viewer, root, child, path, lines);
    }

    if !is_root {
        path.pop();
    }
}

/// `<prefix><rootName> <arg: type> …`, literals shown by their own name.
fn format_usage(registry: &CommandRegistry, prefix: &str, root: NodeId, path: &[NodeId]) -> String {
    let root = registry.node(root);
    let args = path
        .iter()
        .map(|&id| {
            let node = registry.node(id);
            match &node.kind {
                NodeKind::Literal => node.name().to_string(),
                NodeKind::Argument { .. } => {
                    format!("<{}: {}>", node.name(), node.type_name())
                }
            }
        })
        .join(" ");

    if args.is_empty() {
        format!("{prefix}{}", root.data.name)
    } else {
        format!("{prefix}{} {args}", root.data.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CommandData;
    use rankchat_host::fake::FakeWorld;

    fn forest_of(count: usize) -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        for i in 0..count {
            let root = registry.register(CommandData::new(format!("cmd{i}")));
            registry.build(root).executes(|_| Ok(()));
        }
        registry
    }

    #[test]
    fn twelve_commands_paginate_as_5_5_2() {
        let world = FakeWorld::new();
        let viewer = world.spawn("Steve");
        let registry = forest_of(12);

        assert_eq!(max_pages(&registry, viewer.as_ref()), 3);
        // One header line plus one usage line per command.
        assert_eq!(render_page(&registry, "-", viewer.as_ref(), 1).len(), 6);
        assert_eq!(render_page(&registry, "-", viewer.as_ref(), 2).len(), 6);
        let page3 = render_page(&registry, "-", viewer.as_ref(), 3);
        assert_eq!(page3.len(), 3);
        assert_eq!(page3[1], "-cmd10");
        assert_eq!(page3[2], "-cmd11");
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let world = FakeWorld::new();
        let viewer = world.spawn("Steve");
        let registry = forest_of(12);

        let first = render_page(&registry, "-", viewer.as_ref(), 1);
        assert_eq!(render_page(&registry, "-", viewer.as_ref(), 0), first);
        assert_eq!(render_page(&registry, "-", viewer.as_ref(), -3), first);
        let last = render_page(&registry, "-", viewer.as_ref(), 3);
        assert_eq!(render_page(&registry, "-", viewer.as_ref(), 99), last);
    }

    #[test]
    fn zero_visible_commands_is_an_explicit_state() {
        let world = FakeWorld::new();
        let viewer = world.spawn("Steve");
        let mut registry = CommandRegistry::new();
        let root = registry.register(CommandData::new("admin").requires(|a| a.is_op()));
        registry.build(root).executes(|_| Ok(()));

        assert_eq!(max_pages(&registry, viewer.as_ref()), 0);
        let lines = render_page(&registry, "-", viewer.as_ref(), 1);
        assert_eq!(
            lines,
            vec!["§2--- Showing help page 0 of 0 (-help <page: int>) ---".to_string()]
        );
    }

    #[test]
    fn usage_lines_show_types_and_literals() {
        let world = FakeWorld::new();
        let viewer = world.spawn("Steve");
        let mut registry = CommandRegistry::new();
        let root = registry.register(CommandData::new("chatRank"));
        registry
            .build(root)
            .literal(CommandData::new("add"))
            .player("player")
            .executes(|_| Ok(()));

        let lines = render_command(&registry, "-", viewer.as_ref(), root);
        assert_eq!(lines, vec!["-chatRank add <player: Player>".to_string()]);
    }

    #[test]
    fn restricted_subtrees_are_pruned_for_the_viewer() {
        let world = FakeWorld::new();
        let viewer = world.spawn("Steve");
        let mut registry = CommandRegistry::new();
        let root = registry.register(CommandData::new("region"));
        registry.build(root).executes(|_| Ok(()));
        registry
            .build(root)
            .literal(CommandData::new("delete").requires(|a| a.is_op()))
            .executes(|_| Ok(()));

        let lines = render_command(&registry, "-", viewer.as_ref(), root);
        assert_eq!(lines, vec!["-region".to_string()]);

        viewer.set_op(true);
        let lines = render_command(&registry, "-", viewer.as_ref(), root);
        assert_eq!(
            lines,
            vec!["-region".to_string(), "-region delete".to_string()]
        );
    }
}
