//! Linking chats and mirroring messages between them.

mod common;

use common::*;
use xo_bot::AppEvent;

#[test]
fn test_link_command_links_partial_names() {
    let mut h = create_test_harness();
    let sent = h.say_all(DORM, "ann", "!link Dor La Fam");
    assert_eq!(texts_in(&sent, DORM), vec!["Family, Lab linked to Dorm."]);

    // The confirmation is forwarded as the bot, then the command line itself
    // is mirrored as the sender.
    assert_eq!(
        texts_in(&sent, LAB),
        vec![
            "<b>Relay</b>: Family, Lab linked to Dorm.",
            "<b>Ann Smith</b>: !link Dor La Fam",
        ]
    );
    assert_eq!(
        texts_in(&sent, FAMILY),
        vec![
            "*Relay*: Family, Lab linked to Dorm.",
            "*Ann Smith*: !link Dor La Fam",
        ]
    );

    let saved = h.reload_state();
    assert_eq!(saved.links.targets("Dorm"), ["Family", "Lab"]);
}

#[test]
fn test_link_requires_two_known_chats() {
    let mut h = create_test_harness();
    assert_eq!(
        h.say(DORM, "ann", "!link Dorm"),
        vec!["Enter the chat to link from, then the chats to link it to!"]
    );
    assert_eq!(
        h.say(DORM, "ann", "!link Dorm Mars"),
        vec!["No chat by name Mars found."]
    );
    assert!(h.bot.persisted().links.is_empty());
}

#[test]
fn test_links_merge() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!link Dorm Lab");
    h.say(DORM, "ann", "!link Dorm Family");
    assert_eq!(h.bot.persisted().links.targets("Dorm"), ["Family", "Lab"]);
    assert_eq!(h.say(LAB, "carl", "!links"), vec!["Dorm -> Family, Lab"]);
}

#[test]
fn test_mirroring_is_one_way() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Lab", "Family"]);

    let sent = h.say_all(DORM, "ann", "hello");
    assert_eq!(texts_in(&sent, LAB), vec!["<b>Ann Smith</b>: hello"]);
    assert_eq!(texts_in(&sent, FAMILY), vec!["*Ann Smith*: hello"]);
    assert!(texts_in(&sent, DORM).is_empty());

    let sent = h.say_all(LAB, "carl", "hi back");
    assert!(sent.is_empty());
}

#[test]
fn test_multiline_messages_use_line_breaks() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Lab"]);
    let sent = h.say_all(DORM, "ann", "one\ntwo");
    assert_eq!(texts_in(&sent, LAB), vec!["<b>Ann Smith</b>: one<br>two"]);
}

#[test]
fn test_echo_of_last_mirrored_message_is_not_forwarded() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Lab"]);
    h.say_all(DORM, "ann", "hello");

    let sent = h.say_all(DORM, "bob", "Ann Smith: hello");
    assert!(texts_in(&sent, LAB).is_empty());
}

#[test]
fn test_replies_reach_linked_chats() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Family"]);
    let sent = h.say_all(DORM, "ann", "!ping");
    assert_eq!(texts_in(&sent, DORM), vec!["Pong!"]);
    assert_eq!(
        texts_in(&sent, FAMILY),
        vec!["*Relay*: Pong!", "*Ann Smith*: !ping"]
    );
}

#[test]
fn test_links_to_closed_chats_are_skipped() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Attic", "Lab"]);
    let sent = h.say_all(DORM, "ann", "hello");
    assert_eq!(sent.len(), 1);
    assert_eq!(texts_in(&sent, LAB), vec!["<b>Ann Smith</b>: hello"]);
}

#[test]
fn test_unlink() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!link Dorm Lab Family");
    assert_eq!(
        h.say(DORM, "ann", "!unlink Dorm Lab"),
        vec!["Lab unlinked from Dorm."]
    );
    assert_eq!(h.reload_state().links.targets("Dorm"), ["Family"]);

    assert_eq!(
        h.say(DORM, "ann", "!unlink Lab Dorm"),
        vec!["No chat \"Lab\" found."]
    );
    assert_eq!(h.say(DORM, "ann", "!unlink"), vec!["Enter the chat to unlink from!"]);

    h.say(DORM, "ann", "!unlink Dorm Family");
    assert!(h.reload_state().links.is_empty());
    assert_eq!(h.say(DORM, "ann", "!links"), vec!["No chats are linked."]);
}

#[test]
fn test_link_without_new_targets_is_refused() {
    let mut h = create_test_harness();
    assert_eq!(
        h.say(DORM, "ann", "!link Dorm Dorm"),
        vec!["Nothing new to link to Dorm."]
    );
    assert!(h.reload_state().links.is_empty());
    assert_eq!(h.say(DORM, "ann", "!links"), vec!["No chats are linked."]);

    h.say(DORM, "ann", "!link Dorm Lab");
    assert_eq!(
        h.say(DORM, "ann", "!link Dorm Lab Dorm"),
        vec!["Nothing new to link to Dorm."]
    );
    assert_eq!(
        h.say(DORM, "ann", "!link Dorm Lab Family"),
        vec!["Family linked to Dorm."]
    );
}

#[test]
fn test_unlink_without_match_is_refused() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!link Dorm Lab");
    assert_eq!(
        h.say(DORM, "ann", "!unlink Dorm"),
        vec!["Nothing to unlink from Dorm."]
    );
    assert_eq!(
        h.say(DORM, "ann", "!unlink Dorm Family"),
        vec!["Nothing to unlink from Dorm."]
    );
    assert_eq!(h.reload_state().links.targets("Dorm"), ["Lab"]);
}

#[test]
fn test_mirror_emits_events() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Lab"]);
    let mut events = h.bus.subscribe();
    h.say_all(DORM, "ann", "hello");

    let mut mirrored = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let AppEvent::MessageMirrored { from, to } = event {
            mirrored.push((from, to));
        }
    }
    assert_eq!(mirrored, vec![("Dorm".to_string(), "Lab".to_string())]);
}
