//! Listing users and managing nicknames.

use xo_core::error::{XoError, XoResult};

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::rest_after;

pub(super) fn users(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let users = bot.resolver().list_users(ctx);
    bot.reply(ctx, &users.join(", "))
}

pub(super) fn nicks(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let chat = bot.chat_title(ctx.conversation);
    let listed: Vec<String> = bot
        .state
        .nicks
        .list(&chat)
        .into_iter()
        .map(|(real, nick)| format!("{real}: {nick}"))
        .collect();
    if listed.is_empty() {
        return bot.reply(ctx, "No nicks have been set in this chat yet!");
    }
    bot.reply(ctx, &listed.join("\n"))
}

/// `setnick <user> <nick words...>`.
pub(super) fn set_nick(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let nick = rest_after(&ctx.message, 2);
    let Some(partial) = args.first().filter(|_| !nick.is_empty()) else {
        return Err(XoError::usage("You need to provide a user and their new nickname!"));
    };
    let user = find_member(bot, ctx, partial)?;
    let chat = bot.chat_title(ctx.conversation);
    bot.state.nicks.set(&chat, &user, nick);
    bot.state.save_nicks()?;
    bot.reply(ctx, &format!("{user}'s nickname set to \"{nick}\"."))
}

pub(super) fn remove_nick(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let Some(partial) = args.first() else {
        return Err(XoError::usage("You need to provide a user!"));
    };
    let user = find_member(bot, ctx, partial)?;
    let chat = bot.chat_title(ctx.conversation);
    if bot.state.nicks.remove(&chat, &user).is_none() {
        return Err(XoError::usage(format!("{user} doesn't have a nickname!")));
    }
    bot.state.save_nicks()?;
    bot.reply(ctx, &format!("{user}'s nickname removed."))
}

fn find_member(bot: &Bot, ctx: &MessageContext, partial: &str) -> XoResult<String> {
    bot.resolver()
        .find_user(ctx, partial, false)
        .ok_or_else(|| XoError::usage(format!("No user by the name {partial} found.")))
}
