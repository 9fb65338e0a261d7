//! Whole-add-on flows against the in-memory host fakes.

use rankchat::config::ChatRankConfig;
use rankchat::{ranks, App, OP_EVENT_ID};
use rankchat_host::fake::{FakeUi, FakeWorld};
use rankchat_host::{Actor, FormResponse, FormValue};
use std::sync::Arc;

#[test]
fn plain_chat_is_reframed_and_vanilla_suppressed() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let sender = world.spawn("Steve");

    let event = world.chat(&sender, "hello");
    assert!(app.handle_chat(&event, &world));
    assert_eq!(
        world.messages(),
        vec!["§r§l§8[§r§bMember§r§l§8]§r§7 Steve:§r hello".to_string()]
    );
}

#[test]
fn rank_tags_show_up_in_the_chat_frame() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let sender = world.spawn("Steve");
    sender.add_tag("rank:§cAdmin");

    let event = world.chat(&sender, "hi");
    app.handle_chat(&event, &world);
    assert_eq!(
        world.messages(),
        vec!["§r§l§8[§r§cAdmin§r§l§8]§r§7 Steve:§r hi".to_string()]
    );
}

#[test]
fn create_flow_persists_a_new_rank() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let ui = FakeUi::new();
    let sender = world.spawn("Steve");
    sender.set_op(true);
    ui.respond_with(FormResponse::Submitted(vec![FormValue::TextField(
        "§bVIP".to_string(),
    )]));

    let event = world.chat(&sender, "-chatRank create");
    assert!(app.handle_chat(&event, &world));
    // The form only opens on the deferred tick.
    assert_eq!(ui.shown_count(), 0);
    app.tick(&world, &ui);

    assert_eq!(ui.shown_titles(), vec!["Create Rank".to_string()]);
    assert!(sender
        .messages()
        .iter()
        .any(|m| m == "§aCreated the rank §bVIP§a!"));
    assert_eq!(ranks::load_config(&world).ranks, vec!["§bVIP"]);
}

#[test]
fn chat_rank_is_operator_only() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let ui = FakeUi::new();
    let sender = world.spawn("Steve");

    let event = world.chat(&sender, "-chatRank create");
    assert!(app.handle_chat(&event, &world));
    app.tick(&world, &ui);

    assert_eq!(ui.shown_count(), 0);
    assert_eq!(
        sender.messages(),
        vec!["§cYou need to be an operator to manage chat ranks!".to_string()]
    );
}

#[test]
fn add_flow_offers_ranks_the_target_lacks() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let ui = FakeUi::new();
    let sender = world.spawn("Steve");
    sender.set_op(true);
    let target = world.spawn("Alex");

    let config = ChatRankConfig {
        ranks: vec!["§bVIP".to_string(), "§cAdmin".to_string()],
        ..ChatRankConfig::default()
    };
    ranks::config_property().set(&world, &config).unwrap();
    ui.respond_with(FormResponse::Submitted(vec![FormValue::Dropdown(1)]));

    let event = world.chat(&sender, "-chatRank add Alex");
    app.handle_chat(&event, &world);
    app.tick(&world, &ui);

    assert!(target.tags().contains(&"rank:§cAdmin".to_string()));
    assert!(target
        .messages()
        .iter()
        .any(|m| m == "§aYou now have the rank §cAdmin§a!"));
}

#[test]
fn help_lists_only_what_the_viewer_can_run() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let ui = FakeUi::new();
    let sender = world.spawn("Steve");

    let event = world.chat(&sender, "-help");
    app.handle_chat(&event, &world);
    app.tick(&world, &ui);

    let messages = sender.messages();
    assert_eq!(
        messages[0],
        "§2--- Showing help page 1 of 1 (-help <page: int>) ---"
    );
    assert!(messages.contains(&"-help <page: int>".to_string()));
    // chatRank is operator-only and must not be listed.
    assert!(!messages.iter().any(|m| m.contains("chatRank")));
}

#[test]
fn help_aliases_and_per_command_usage() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let ui = FakeUi::new();
    let sender = world.spawn("Steve");

    let event = world.chat(&sender, "-? help");
    app.handle_chat(&event, &world);
    app.tick(&world, &ui);

    let messages = sender.messages();
    assert_eq!(messages[0], "-help");
    assert!(messages.contains(&"-help <command: CommandName>".to_string()));
}

#[test]
fn op_script_event_grants_operator() {
    let mut app = App::new();
    let world = FakeWorld::new();
    let sender = world.spawn("Steve");
    let source: Arc<dyn Actor> = sender.clone();

    app.handle_script_event("rankchat:unrelated", Some(&source));
    assert!(!sender.is_op());

    app.handle_script_event(OP_EVENT_ID, Some(&source));
    assert!(sender.is_op());
    assert_eq!(sender.messages(), vec!["§aSet you as OP!".to_string()]);
}
