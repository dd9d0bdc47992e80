//! Defining, showing and removing aliases.

use xo_core::error::{XoError, XoResult};
use xo_store::Alias;

use super::find;
use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::{rest_after, strip_delimiter};

/// `alias <name> <!command args...>` binds, `alias <name>` shows.
pub(super) fn alias(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let delimiter = bot.config.command_delimiter.clone();
    let Some(name) = args.first() else {
        return Err(XoError::usage("Enter an alias name and the command it runs!"));
    };
    let name = strip_delimiter(name, &delimiter).to_lowercase();

    if args.len() == 1 {
        let text = match bot.resolve_alias(ctx, &name) {
            Some(alias) => format!("\"{delimiter}{}\"", alias.expansion),
            None => format!("No alias \"{name}\" found."),
        };
        return bot.reply(ctx, &text);
    }

    if find(&name).is_some() {
        return Err(XoError::usage("That name is already used by a command!"));
    }
    let expansion = strip_delimiter(rest_after(&ctx.message, 2), &delimiter);
    let alias = Alias::new(expansion);
    let target = alias.command().to_lowercase();
    if find(&target).is_none() {
        return Err(XoError::usage(format!("{delimiter}{target} is not a command!")));
    }

    let chat = bot.chat_title(ctx.conversation);
    let reply = format!("\"{delimiter}{name}\" bound to \"{delimiter}{}\".", alias.expansion);
    bot.state.aliases.set(&chat, &name, alias);
    bot.state.save_aliases()?;
    bot.reply(ctx, &reply)
}

pub(super) fn list(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, &bot.alias_listing(ctx))
}

pub(super) fn unalias(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let Some(name) = args.first() else {
        return Err(XoError::usage("Enter an alias to remove!"));
    };
    let name = strip_delimiter(name, &bot.config.command_delimiter).to_lowercase();
    let chat = bot.chat_title(ctx.conversation);
    if bot.state.aliases.remove(&chat, &name).is_none() {
        return Err(XoError::usage(format!("No alias \"{name}\" found.")));
    }
    bot.state.save_aliases()?;
    bot.reply(ctx, &format!("\"{name}\" unaliased."))
}
