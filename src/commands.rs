//! The add-on's built-in commands: `help` and the operator-only `chatRank`
//! management command with its form-driven flows.

use crate::config::{ChatRankConfig, PREFIX};
use crate::ranks;
use rankchat_command::{
    render_command, render_page, ArgumentType, CommandCtx, CommandData, CommandRegistry,
    CommandResult,
};
use rankchat_forms::{confirm_action, ModalForm, ModalValue};
use rankchat_host::{Actor, World};
use tracing::warn;

pub fn register_commands(registry: &mut CommandRegistry) {
    register_help(registry);
    register_chat_rank(registry);
}

fn register_help(registry: &mut CommandRegistry) {
    let root = registry.register(
        CommandData::new("help")
            .alias("?")
            .alias("h")
            .description("Lists every command you can use"),
    );
    registry.build(root).executes(exec_help_first_page);
    registry.build(root).int("page").executes(exec_help_page);
    registry
        .build(root)
        .argument("command", ArgumentType::command_name())
        .executes(exec_help_command);
}

fn exec_help_first_page(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    send_help_page(ctx, 1);
    Ok(())
}

fn exec_help_page(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let page = ctx.args().get_integer("page")?;
    send_help_page(ctx, page);
    Ok(())
}

fn send_help_page(ctx: &CommandCtx<'_>, page: i64) {
    for line in render_page(ctx.registry(), PREFIX, ctx.sender().as_ref(), page) {
        ctx.reply(&line);
    }
}

fn exec_help_command(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let name = ctx.args().get_string("command")?;
    // The matcher already checked the root exists.
    if let Some(root) = ctx.registry().root_by_name(&name) {
        for line in render_command(ctx.registry(), PREFIX, ctx.sender().as_ref(), root) {
            ctx.reply(&line);
        }
    }
    Ok(())
}

fn register_chat_rank(registry: &mut CommandRegistry) {
    let root = registry.register(
        CommandData::new("chatRank")
            .description("Manage the ranks shown in chat")
            .requires(|a| a.is_op())
            .invalid_permission("§cYou need to be an operator to manage chat ranks!"),
    );

    registry
        .build(root)
        .literal(CommandData::new("create"))
        .executes(exec_create);
    registry
        .build(root)
        .literal(CommandData::new("delete"))
        .executes(exec_delete);
    registry
        .build(root)
        .literal(CommandData::new("add"))
        .player("player")
        .executes(exec_add);
    registry
        .build(root)
        .literal(CommandData::new("remove"))
        .player("player")
        .executes(exec_remove);
    registry
        .build(root)
        .literal(CommandData::new("reset"))
        .player("player")
        .executes(exec_reset);
    let config = registry
        .build(root)
        .literal(CommandData::new("config"))
        .executes(exec_config)
        .id();
    registry
        .build(config)
        .literal(CommandData::new("reset"))
        .executes(exec_config_reset);
}

fn save_config(world: &dyn World, sender: &dyn Actor, config: &ChatRankConfig) {
    if let Err(err) = ranks::config_property().set(world, config) {
        warn!("failed to persist the chat rank config: {err}");
        sender.send_message("§cFailed to save the chat rank config.");
    }
}

fn exec_create(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let world = ctx.world;
    let sender = ctx.sender().clone();
    ModalForm::new("Create Rank")
        .text_field("Rank", "e.g. §bVIP", None)
        .show(ctx.sender().as_ref(), ctx.ui, move |values| {
            let Some(ModalValue::TextField(rank)) = values.into_iter().next() else {
                return;
            };
            if rank.is_empty() {
                sender.send_message("§cA rank cannot be empty!");
                return;
            }
            let mut config = ranks::load_config(world);
            if config.ranks.contains(&rank) {
                sender.send_message(&format!("§cThe rank {rank}§c already exists!"));
                return;
            }
            config.ranks.push(rank.clone());
            save_config(world, sender.as_ref(), &config);
            sender.send_message(&format!("§aCreated the rank {rank}§a!"));
        });
    Ok(())
}

fn exec_delete(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let world = ctx.world;
    let sender = ctx.sender().clone();
    let config = ranks::load_config(world);
    if config.ranks.is_empty() {
        ctx.reply("§cThere are no ranks to delete!");
        return Ok(());
    }

    ModalForm::new("Delete Rank")
        .dropdown("Rank", config.ranks.clone(), None)
        .show(ctx.sender().as_ref(), ctx.ui, move |values| {
            let Some(ModalValue::Dropdown(rank)) = values.into_iter().next() else {
                return;
            };
            let mut config = ranks::load_config(world);
            config.ranks.retain(|r| *r != rank);
            save_config(world, sender.as_ref(), &config);
            sender.send_message(&format!("§aDeleted the rank {rank}§a!"));
        });
    Ok(())
}

fn exec_add(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let name = ctx.args().get_player("player")?;
    let target = ctx.resolve_player(&name)?;
    let sender = ctx.sender().clone();
    let config = ranks::load_config(ctx.world);

    let held = ranks::raw_ranks(target.as_ref());
    let applicable: Vec<String> = config
        .ranks
        .iter()
        .filter(|rank| !held.contains(rank))
        .cloned()
        .collect();
    if applicable.is_empty() {
        ctx.reply(&format!(
            "§cThere are no ranks left to give to {}!",
            target.name()
        ));
        return Ok(());
    }

    ModalForm::new("Add Rank")
        .dropdown("Rank", applicable, None)
        .show(ctx.sender().as_ref(), ctx.ui, move |values| {
            let Some(ModalValue::Dropdown(rank)) = values.into_iter().next() else {
                return;
            };
            ranks::add_rank(target.as_ref(), &rank);
            sender.send_message(&format!("§aGave {} the rank {rank}§a!", target.name()));
            target.send_message(&format!("§aYou now have the rank {rank}§a!"));
        });
    Ok(())
}

fn exec_remove(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let name = ctx.args().get_player("player")?;
    let target = ctx.resolve_player(&name)?;
    let sender = ctx.sender().clone();

    let held = ranks::raw_ranks(target.as_ref());
    if held.is_empty() {
        ctx.reply(&format!("§c{} has no ranks!", target.name()));
        return Ok(());
    }

    ModalForm::new("Remove Rank")
        .dropdown("Rank", held, None)
        .show(ctx.sender().as_ref(), ctx.ui, move |values| {
            let Some(ModalValue::Dropdown(rank)) = values.into_iter().next() else {
                return;
            };
            ranks::remove_rank(target.as_ref(), &rank);
            sender.send_message(&format!("§aRemoved the rank {rank}§a from {}!", target.name()));
        });
    Ok(())
}

fn exec_reset(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let name = ctx.args().get_player("player")?;
    let target = ctx.resolve_player(&name)?;
    let sender = ctx.sender().clone();

    confirm_action(
        ctx.sender().as_ref(),
        ctx.ui,
        format!("Remove every rank from {}?", target.name()),
        move || {
            ranks::set_ranks(target.as_ref(), &[]);
            sender.send_message(&format!("§aReset the ranks of {}!", target.name()));
        },
    );
    Ok(())
}

fn exec_config(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let world = ctx.world;
    let sender = ctx.sender().clone();
    let config = ranks::load_config(world);

    ModalForm::new("Chat Rank Config")
        .text_field("Default Rank", "shown for rankless players", Some(config.default_rank))
        .text_field("Start String", "before the first rank", Some(config.start_string))
        .text_field("Join String", "between ranks", Some(config.join_string))
        .text_field("End String", "after the last rank", Some(config.end_string))
        .show(ctx.sender().as_ref(), ctx.ui, move |values| {
            let mut values = values.into_iter();
            let (
                Some(ModalValue::TextField(default_rank)),
                Some(ModalValue::TextField(start_string)),
                Some(ModalValue::TextField(join_string)),
                Some(ModalValue::TextField(end_string)),
            ) = (values.next(), values.next(), values.next(), values.next())
            else {
                return;
            };
            let mut config = ranks::load_config(world);
            config.default_rank = default_rank;
            config.start_string = start_string;
            config.join_string = join_string;
            config.end_string = end_string;
            save_config(world, sender.as_ref(), &config);
            sender.send_message("§aSaved the chat rank config!");
        });
    Ok(())
}

fn exec_config_reset(ctx: &mut CommandCtx<'_>) -> CommandResult<()> {
    let world = ctx.world;
    let sender = ctx.sender().clone();

    confirm_action(
        ctx.sender().as_ref(),
        ctx.ui,
        "Reset the chat rank config to its defaults? This also forgets every created rank.",
        move || {
            if let Err(err) = ranks::config_property().remove(world) {
                warn!("failed to reset the chat rank config: {err}");
                sender.send_message("§cFailed to reset the chat rank config.");
                return;
            }
            sender.send_message("§aReset the chat rank config!");
        },
    );
    Ok(())
}
