//! Check-ins: telling the chat where you went and for how long.

use chrono::Duration;

use xo_core::error::XoResult;
use xo_store::CheckIn;

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::{natural_delta, natural_time, rest_after};
use crate::timeparse::{is_future_reference, parse_duration};

/// `loc [location] [time]`.
pub(super) fn loc(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let location = args
        .first()
        .cloned()
        .unwrap_or_else(|| bot.config.default_location.clone());
    let time = rest_after(&ctx.message, 2).to_string();
    check_in(bot, ctx, &location, &time)
}

/// `gds [time]`: check in at the default location.
pub(super) fn gds(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let location = bot.config.default_location.clone();
    let time = rest_after(&ctx.message, 1).to_string();
    check_in(bot, ctx, &location, &time)
}

/// `loconly [location]`: check in for the default time.
pub(super) fn loc_only(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let location = match rest_after(&ctx.message, 1) {
        "" => bot.config.default_location.clone(),
        named => named.to_string(),
    };
    check_in(bot, ctx, &location, "")
}

pub(super) fn left_loc(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let chat = bot.chat_title(ctx.conversation);
    let name = bot.resolver().real_name(ctx.account, &ctx.sender);
    let text = match bot.state.check_ins.leave(&chat, &name) {
        Some(location) => {
            bot.state.save_check_ins()?;
            format!("{name} left {location}.")
        }
        None => format!("{name} isn't anywhere!"),
    };
    bot.reply(ctx, &text)
}

/// `atloc [location]`: who is still where they said they went.
pub(super) fn at_loc(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let location = rest_after(&ctx.message, 1);
    let location = (!location.is_empty()).then_some(location);
    let chat = bot.chat_title(ctx.conversation);
    let now = bot.now();
    let fallback = Duration::minutes(bot.config.default_loc_minutes);

    let present = bot
        .state
        .check_ins
        .present(&chat, location, now, fallback, parse_duration);
    let text = if present.is_empty() {
        match location {
            Some(location) => format!("No one went to {location} recently."),
            None => "No one went anywhere recently.".to_string(),
        }
    } else {
        present
            .iter()
            .map(|(name, check_in)| {
                format!(
                    "{name} went to {} {} ago. ",
                    check_in.location(),
                    natural_delta(now - check_in.at())
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    bot.reply(ctx, &text)
}

/// Record a check-in, or schedule one when `time` names a later moment.
fn check_in(bot: &mut Bot, ctx: &MessageContext, location: &str, time: &str) -> XoResult<()> {
    let default_time = bot.config.default_loc_time();
    if is_future_reference(time) {
        let line = format!("{}loc {location} {default_time}", bot.config.command_delimiter);
        let fire_at = bot.schedule(ctx, time, &line)?;
        let when = natural_time(fire_at, bot.now());
        return bot.reply(ctx, &format!("\"{line}\" scheduled to run {when}."));
    }

    let time = if time.is_empty() { default_time.as_str() } else { time };
    let chat = bot.chat_title(ctx.conversation);
    let name = bot.resolver().real_name(ctx.account, &ctx.sender);
    let now = bot.now();
    bot.state
        .check_ins
        .check_in(&chat, &name, CheckIn::new(now, location, time));
    bot.state.save_check_ins()?;
    bot.reply(ctx, &format!("{name} is going to {location} for {time}."))
}
