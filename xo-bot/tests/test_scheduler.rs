//! Scheduling commands, replaying them and managing the queue.

mod common;

use chrono::Duration;

use common::*;
use xo_bot::AppEvent;
use xo_core::config::BotConfig;
use xo_store::{ReplayMessage, ScheduledEvent};

#[test]
fn test_schedule_and_replay() {
    let mut h = create_test_harness();
    assert_eq!(
        h.say(DORM, "ann", "!schedule in 5 minutes !echo later"),
        vec!["\"!echo later\" scheduled to run 5 minutes from now."]
    );
    assert_eq!(h.bot.persisted().events.len(), 1);
    assert_eq!(h.reload_state().events.len(), 1);

    // Not due yet.
    assert!(h.bot.tick(now() + Duration::minutes(4)));
    assert!(h.client.sent().is_empty());

    assert!(h.bot.tick(now() + Duration::minutes(5) + Duration::seconds(1)));
    assert_eq!(h.client.sent_to(DORM), vec!["later"]);
    assert!(h.bot.persisted().events.is_empty());
    assert!(h.reload_state().events.is_empty());
}

#[test]
fn test_replayed_event_runs_as_original_sender() {
    let mut h = create_test_harness();
    h.say(DORM, "bob", "!schedule in 1 minute !me yawns");
    h.bot.tick(now() + Duration::seconds(61));
    assert_eq!(h.client.sent_to(DORM), vec!["*Bob Jones yawns."]);
}

#[test]
fn test_late_events_are_discarded() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!schedule in 5 minutes !echo later");
    let mut events = h.bus.subscribe();

    h.bot.tick(now() + Duration::minutes(5) + Duration::seconds(30));
    assert!(h.client.sent().is_empty());
    assert!(h.bot.persisted().events.is_empty());

    let reason = std::iter::from_fn(|| events.try_recv().ok()).find_map(|event| match event {
        AppEvent::EventDiscarded { reason, .. } => Some(reason),
        _ => None,
    });
    assert_eq!(reason.as_deref(), Some("30 seconds late"));
}

#[test]
fn test_replay_threshold_is_capped() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = BotConfig {
        event_replay_threshold_secs: 3_600,
        ..BotConfig::default()
    };
    let mut h = harness_in(dir, config);
    h.say(DORM, "ann", "!schedule in 5 minutes !echo later");

    h.bot.tick(now() + Duration::minutes(5) + Duration::seconds(10));
    assert!(h.client.sent().is_empty());
}

#[test]
fn test_events_for_vanished_chats_are_discarded() {
    let mut h = create_test_harness();
    h.bot.persisted_mut().events.push(ScheduledEvent::new(
        now(),
        ReplayMessage {
            account: "bot@example.com".into(),
            sender: "ann".into(),
            message: "!ping".into(),
            conversation: "Attic".into(),
            flags: 0,
        },
    ));
    let mut events = h.bus.subscribe();

    h.bot.tick(now() + Duration::seconds(1));
    assert!(h.client.sent().is_empty());
    assert!(h.bot.persisted().events.is_empty());
    let discarded = std::iter::from_fn(|| events.try_recv().ok())
        .any(|event| matches!(event, AppEvent::EventDiscarded { .. }));
    assert!(discarded);
}

#[test]
fn test_schedule_errors() {
    let mut h = create_test_harness();
    assert_eq!(
        h.say(DORM, "ann", "!schedule whenever !ping"),
        vec!["Could not understand the time \"whenever\"."]
    );
    assert_eq!(
        h.say(DORM, "ann", "!schedule in 5 minutes"),
        vec!["You need a command to run, with the command delimiter \"!\""]
    );
    assert!(h.bot.persisted().events.is_empty());
}

#[test]
fn test_events_listing_and_unschedule() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!schedule in 5 minutes !echo a");
    h.say(DORM, "ann", "!schedule in 10 minutes !echo b");
    assert_eq!(
        h.say(DORM, "bob", "!schedule in 1 hour !ping"),
        vec!["\"!ping\" scheduled to run an hour from now."]
    );

    let mine = h.say(DORM, "ann", "!events").remove(0);
    let lines: Vec<&str> = mine.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[0] 5 minutes from now: !echo a ("));
    assert!(lines[1].starts_with("[1] 10 minutes from now: !echo b ("));

    let all = h.say(DORM, "carl", "!allevents").remove(0);
    assert_eq!(all.lines().count(), 3);
    assert!(all.lines().nth(2).unwrap().starts_with("[2] an hour from now: !ping ("));

    assert_eq!(
        h.say(DORM, "carl", "!events"),
        vec!["You don't have any events scheduled!"]
    );

    assert_eq!(
        h.say(DORM, "ann", "!unschedule 2"),
        vec!["You don't have an event scheduled with that index!"]
    );
    assert_eq!(
        h.say(DORM, "ann", "!unschedule nine"),
        vec!["You don't have an event scheduled with that index!"]
    );
    assert_eq!(h.say(DORM, "bob", "!unschedule 2"), vec!["Event at index 2 removed."]);
    assert_eq!(h.reload_state().events.len(), 2);
}

#[test]
fn test_allevents_when_empty() {
    let mut h = create_test_harness();
    assert_eq!(
        h.say(DORM, "ann", "!allevents"),
        vec!["No events have been scheduled."]
    );
}

#[test]
fn test_events_survive_restart() {
    let mut h = create_test_harness();
    h.say(DORM, "ann", "!schedule in 5 minutes !echo later");
    let Harness { dir, .. } = h;

    let mut h = harness_in(dir, BotConfig::default());
    assert_eq!(h.bot.persisted().events.len(), 1);
    h.bot.tick(now() + Duration::minutes(5) + Duration::seconds(1));
    assert_eq!(h.client.sent_to(DORM), vec!["later"]);
}
