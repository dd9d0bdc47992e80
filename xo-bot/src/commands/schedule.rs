//! Scheduling commands for later and managing the queue.

use chrono::{DateTime, Local, Utc};

use xo_core::constants::DISPLAY_DATE_FORMAT;
use xo_core::error::{XoError, XoResult};
use xo_store::ScheduledEvent;

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::{natural_time, rest_after};

/// `schedule <time> <!command ...>`.
pub(super) fn schedule(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let delimiter = bot.config.command_delimiter.clone();
    let body = rest_after(&ctx.message, 1);
    let Some(split) = body.find(&delimiter) else {
        return Err(XoError::usage(format!(
            "You need a command to run, with the command delimiter \"{delimiter}\""
        )));
    };
    let (time, command) = (body[..split].trim(), body[split..].trim());
    let fire_at = bot.schedule(ctx, time, command)?;
    let when = natural_time(fire_at, bot.now());
    bot.reply(ctx, &format!("\"{command}\" scheduled to run {when}."))
}

/// The caller's own events.
pub(super) fn events(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let now = bot.now();
    let this: &Bot = bot;
    let lines: Vec<String> = this
        .state
        .events
        .iter()
        .filter(|(_, event)| owns(this, ctx, event))
        .map(|(index, event)| describe(index, event, now))
        .collect();
    if lines.is_empty() {
        return bot.reply(ctx, "You don't have any events scheduled!");
    }
    bot.reply(ctx, &lines.join("\n"))
}

pub(super) fn all_events(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let now = bot.now();
    let lines: Vec<String> = bot
        .state
        .events
        .iter()
        .map(|(index, event)| describe(index, event, now))
        .collect();
    if lines.is_empty() {
        return bot.reply(ctx, "No events have been scheduled.");
    }
    bot.reply(ctx, &lines.join("\n"))
}

/// `unschedule <index>`: remove one of the caller's events.
pub(super) fn unschedule(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let not_yours = || XoError::usage("You don't have an event scheduled with that index!");
    let index: usize = args
        .first()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(not_yours)?;
    let event = bot.state.events.get(index).ok_or_else(not_yours)?;
    if !owns(bot, ctx, event) {
        return Err(not_yours());
    }
    bot.state.events.remove(index);
    bot.state.save_events()?;
    bot.reply(ctx, &format!("Event at index {index} removed."))
}

/// `[i] in 5 minutes: !ping (Sat, Mar 14 2020 at 03:14PM)`.
fn describe(index: usize, event: &ScheduledEvent, now: DateTime<Utc>) -> String {
    format!(
        "[{index}] {}: {} ({})",
        natural_time(event.fire_at, now),
        event.replay.message,
        event
            .fire_at
            .with_timezone(&Local)
            .format(DISPLAY_DATE_FORMAT)
    )
}

/// Whether the event was scheduled by the person sending `ctx`.
fn owns(bot: &Bot, ctx: &MessageContext, event: &ScheduledEvent) -> bool {
    let resolver = bot.resolver();
    resolver.real_name(ctx.account, &event.replay.sender)
        == resolver.real_name(ctx.account, &ctx.sender)
}
