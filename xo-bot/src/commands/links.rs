//! Linking chats so messages are mirrored between them.

use xo_core::error::{XoError, XoResult};

use crate::bot::Bot;
use crate::context::MessageContext;

/// `link <chat> <other...>`, all names may be partial.
pub(super) fn link(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    if args.len() < 2 {
        return Err(XoError::usage(
            "Enter the chat to link from, then the chats to link it to!",
        ));
    }
    let names = resolve_all(bot, args)?;
    let (source, targets) = (&names[0], &names[1..]);

    let existing = bot.state.links.targets(source);
    let mut added: Vec<String> = targets
        .iter()
        .filter(|t| t.as_str() != source.as_str() && !existing.contains(t))
        .cloned()
        .collect();
    added.sort();
    added.dedup();
    if added.is_empty() {
        return Err(XoError::usage(format!("Nothing new to link to {source}.")));
    }

    bot.state.links.link(source, added.iter().cloned());
    bot.state.save_links()?;
    bot.reply(ctx, &format!("{} linked to {source}.", added.join(", ")))
}

pub(super) fn list(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, &bot.state.links.to_string())
}

/// `unlink <chat> <other...>`.
pub(super) fn unlink(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let Some(partial) = args.first() else {
        return Err(XoError::usage("Enter the chat to unlink from!"));
    };
    let source = bot
        .resolver()
        .full_conversation_name(partial)
        .filter(|source| bot.state.links.contains(source))
        .ok_or_else(|| XoError::usage(format!("No chat \"{partial}\" found.")))?;

    let targets: Vec<String> = {
        let resolver = bot.resolver();
        args[1..]
            .iter()
            .filter_map(|partial| resolver.full_conversation_name(partial))
            .collect()
    };
    let removed = bot.state.links.unlink(&source, &targets);
    if removed.is_empty() {
        return Err(XoError::usage(format!("Nothing to unlink from {source}.")));
    }
    bot.state.save_links()?;
    bot.reply(ctx, &format!("{} unlinked from {source}.", removed.join(", ")))
}

/// Full titles for every partial name, failing on the first unknown one.
fn resolve_all(bot: &Bot, partials: &[String]) -> XoResult<Vec<String>> {
    let resolver = bot.resolver();
    partials
        .iter()
        .map(|partial| {
            resolver
                .full_conversation_name(partial)
                .ok_or_else(|| XoError::usage(format!("No chat by name {partial} found.")))
        })
        .collect()
}
