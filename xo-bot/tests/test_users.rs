//! Users and nicknames.

mod common;

use common::*;

#[test]
fn test_users_excludes_bot() {
    let mut h = create_test_harness();
    assert_eq!(h.say(DORM, "ann", "!users"), vec!["Ann Smith, Bob Jones"]);
}

#[test]
fn test_users_include_linked_chats() {
    let mut h = create_test_harness();
    h.link("Dorm", &["Lab", "Family"]);
    assert_eq!(
        h.say(DORM, "ann", "!users"),
        vec!["Ann Smith, Bob Jones, Dan Brown, carl"]
    );
}

#[test]
fn test_set_and_remove_nick() {
    let mut h = create_test_harness();
    assert_eq!(h.say(DORM, "ann", "!nicks"), vec!["No nicks have been set in this chat yet!"]);
    assert_eq!(
        h.say(DORM, "ann", "!setnick bob Bobby B"),
        vec!["Bob Jones's nickname set to \"Bobby B\"."]
    );
    assert_eq!(h.say(DORM, "ann", "!nicks"), vec!["Bob Jones: Bobby B"]);
    assert_eq!(h.reload_state().nicks.get("Dorm", "Bob Jones"), Some("Bobby B"));

    // Nicknames show up in replies and user lookups.
    assert_eq!(h.say(DORM, "bob", "!me waves"), vec!["*Bobby B waves."]);
    assert_eq!(h.say(DORM, "ann", "!to hi %target bobby"), vec!["hi Bobby B"]);
    assert_eq!(h.say(DORM, "ann", "!users"), vec!["Ann Smith, Bobby B"]);

    assert_eq!(
        h.say(DORM, "ann", "!removenick bob"),
        vec!["Bob Jones's nickname removed."]
    );
    assert_eq!(
        h.say(DORM, "ann", "!removenick bob"),
        vec!["Bob Jones doesn't have a nickname!"]
    );
    assert!(h.reload_state().nicks.get("Dorm", "Bob Jones").is_none());
}

#[test]
fn test_nick_errors() {
    let mut h = create_test_harness();
    assert_eq!(
        h.say(DORM, "ann", "!setnick bob"),
        vec!["You need to provide a user and their new nickname!"]
    );
    assert_eq!(
        h.say(DORM, "ann", "!setnick zed Z"),
        vec!["No user by the name zed found."]
    );
    assert_eq!(h.say(DORM, "ann", "!removenick"), vec!["You need to provide a user!"]);
}

#[test]
fn test_mirrored_messages_use_real_names() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!setnick ann Annie");
    h.link("Dorm", &["Lab"]);
    let sent = h.say_all(DORM, "ann", "hello");
    assert_eq!(texts_in(&sent, LAB), vec!["<b>Ann Smith</b>: hello"]);
}
