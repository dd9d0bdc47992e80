//! Per-chat puns.

use xo_core::error::{XoError, XoResult};
use xo_store::PunPick;

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::rest_after;

pub(super) fn add_pun(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let pun = rest_after(&ctx.message, 1);
    if pun.is_empty() {
        return Err(XoError::usage("Enter a pun to add!"));
    }
    let chat = bot.chat_title(ctx.conversation);
    bot.state.puns.add(&chat, pun);
    bot.state.save_puns()?;
    bot.reply(ctx, &format!("\"{pun}\" added to the pun list."))
}

/// A random pun, preferring ones containing the given text.
pub(super) fn pun(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let filter = rest_after(&ctx.message, 1);
    let chat = bot.chat_title(ctx.conversation);
    let pick = bot
        .state
        .puns
        .pick(&chat, Some(filter).filter(|f| !f.is_empty()), &mut bot.rng);
    let text = match pick {
        PunPick::Empty => "No puns found!".to_string(),
        PunPick::Match(pun) => pun,
        PunPick::NoMatch(pun) => format!("Does not punpute! Random Pun: {pun}"),
    };
    bot.reply(ctx, &text)
}

pub(super) fn remove_pun(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let filter = rest_after(&ctx.message, 1);
    if filter.is_empty() {
        return Err(XoError::usage("Enter part of the pun to remove!"));
    }
    let chat = bot.chat_title(ctx.conversation);
    let Some(removed) = bot.state.puns.remove_matching(&chat, filter) else {
        return bot.reply(ctx, &format!("No pun found containing \"{filter}\"."));
    };
    bot.state.save_puns()?;
    bot.reply(ctx, &format!("\"{removed}\" removed from the pun list."))
}
