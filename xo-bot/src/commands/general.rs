//! Small commands that only talk back: echo, help, dice and friends.

use chrono::Local;
use rand::Rng;

use xo_core::constants::{exit_codes, DISPLAY_DATE_FORMAT};
use xo_core::error::{XoError, XoResult};

use super::{help_text, COMMANDS};
use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::{
    find_nth_instance, natural_time, num_to_emoji, parse_command, replace_ignore_case, rest_after,
    strip_delimiter,
};

const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1_000;

pub(super) fn ping(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, "Pong!")
}

pub(super) fn echo(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, rest_after(&ctx.message, 1))
}

pub(super) fn args(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, &ctx.to_string())
}

pub(super) fn bot_me(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let alias = bot.client.account_alias(ctx.account).unwrap_or_default();
    bot.reply(ctx, &format!("*{alias} {}.", rest_after(&ctx.message, 1)))
}

pub(super) fn me(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let name = bot
        .resolver()
        .display_name(ctx.account, &ctx.sender, Some(ctx.conversation));
    let text = format!("*{name} {}.", rest_after(&ctx.message, 1));
    bot.reply(ctx, &bot.expand_alias_vars(ctx, &text))
}

pub(super) fn chats(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let resolver = bot.resolver();
    let listing: Vec<String> = resolver
        .chats()
        .into_iter()
        .map(|id| format!("{} ({id})", resolver.title(id)))
        .collect();
    bot.reply(ctx, &listing.join(", "))
}

pub(super) fn commands(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, &bot.command_listing(ctx))
}

/// `help`, `help 2` or `help echo`.
pub(super) fn help(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let page = args.first().map(String::as_str).unwrap_or("");
    let name = strip_delimiter(page, &bot.config.command_delimiter).to_lowercase();
    if let Some(help) = help_text(&name) {
        return bot.reply(ctx, help);
    }
    if !page.is_empty() && !page.chars().all(|c| c.is_ascii_digit()) {
        return bot.reply(ctx, &format!("No command \"{page}\" found."));
    }

    let per_page = bot.config.help_commands_per_page.max(1);
    let total = COMMANDS.len().div_ceil(per_page);
    let page = page.parse::<usize>().unwrap_or(1).max(1);
    let mut out = format!("Help page {}/{total}", page.min(total));
    for command in COMMANDS
        .iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
    {
        out.push_str(&format!("\n{}: {}", command.name, command.help));
    }
    bot.reply(ctx, &out)
}

pub(super) fn html_escape(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let text = bot.client.strip_html(rest_after(&ctx.message, 1));
    bot.reply(ctx, &text)
}

pub(super) fn last_reboot(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    let started = bot.started_at;
    let text = format!(
        "{}, ({})",
        natural_time(started, bot.now()),
        started.with_timezone(&Local).format(DISPLAY_DATE_FORMAT)
    );
    bot.reply(ctx, &text)
}

/// `msg <chat> <text>`: send `<sender>: text` into another chat.
pub(super) fn msg(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let text = rest_after(&ctx.message, 2);
    let Some(partial) = args.first().filter(|_| !text.is_empty()) else {
        return Err(XoError::usage("You need to specify a chat and a message!"));
    };
    let resolver = bot.resolver();
    let target = resolver
        .full_conversation_name(partial)
        .and_then(|title| resolver.conversation_by_title(&title))
        .ok_or_else(|| XoError::usage(format!("No chat by name {partial} found.")))?;
    let name = resolver.real_name(ctx.account, &ctx.sender);
    bot.send_message(ctx.conversation, Some(target), "", &format!("{name}: {text}"))
}

/// `mimic <user> <command...>`: run a command as someone else.
pub(super) fn mimic(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    if args.len() < 2 {
        return Err(XoError::usage(
            "You need to specify the user to mimic and the command to mimic!",
        ));
    }
    let user = bot
        .resolver()
        .find_user(ctx, &args[0], false)
        .ok_or_else(|| XoError::usage(format!("No user by the name \"{}\" found.", args[0])))?;
    if bot.client.account_alias(ctx.account).as_deref() == Some(user.as_str()) {
        return Err(XoError::usage("You can't use mimic on me! I'm invincible!"));
    }

    let line = rest_after(&ctx.message, 2).to_string();
    let (name, command_args) = parse_command(&line, &bot.config.command_delimiter)
        .ok_or_else(|| XoError::usage("That's not a command!"))?;
    let mimicked = ctx.with_sender(user).with_message(line);
    if !bot.dispatch(&mimicked, &name, &command_args)? {
        return Err(XoError::usage("That's not a command!"));
    }
    Ok(())
}

/// `replace <old> <new> <text...>`, ignoring case.
pub(super) fn replace(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    if args.len() < 2 {
        return Err(XoError::usage("You need to provide some arguments!"));
    }
    let text = find_nth_instance(3, &ctx.message, " ")
        .map(|i| &ctx.message[i + 1..])
        .unwrap_or("");
    bot.reply(ctx, &replace_ignore_case(text, &args[0], &args[1]))
}

/// `to <text...> <user>`: `%target` becomes the user's nickname.
pub(super) fn to(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let Some(partial) = args.last() else {
        return Err(XoError::usage("You need to provide some arguments!"));
    };
    let resolver = bot.resolver();
    let name = resolver
        .find_user(ctx, partial, false)
        .ok_or_else(|| XoError::usage(format!("No user containing {partial} found.")))?;
    let nick = resolver.find_user(ctx, partial, true).unwrap_or(name);

    let body = rest_after(&ctx.message, 1);
    let body = body
        .rsplit_once(char::is_whitespace)
        .map(|(head, _)| head.trim_end())
        .unwrap_or("");
    let text = bot.expand_alias_vars(ctx, body).replace("%target", &nick);
    bot.reply(ctx, &text)
}

pub(super) fn dice_roll(bot: &mut Bot, ctx: &MessageContext, args: &[String]) -> XoResult<()> {
    let spec = args.first().map(String::as_str).unwrap_or("");
    let rolls = roll_dice(spec, &mut bot.rng)?;
    bot.reply(ctx, &format_rolls(&rolls))
}

pub(super) fn restart(bot: &mut Bot, ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.reply(ctx, "Restarting...")?;
    bot.request_exit(exit_codes::RESTART);
    Ok(())
}

pub(super) fn exit(bot: &mut Bot, _ctx: &MessageContext, _args: &[String]) -> XoResult<()> {
    bot.request_exit(exit_codes::EXIT);
    Ok(())
}

/// Roll dice described as `NdM`, `dM` or `N`. Empty means one six-sided die.
pub fn roll_dice<R: Rng + ?Sized>(spec: &str, rng: &mut R) -> XoResult<Vec<u32>> {
    let invalid = || {
        XoError::usage(format!(
            "\"{spec}\" isn't a dice roll! Try something like 2d6 (up to {MAX_DICE} dice with {MAX_SIDES} sides)."
        ))
    };
    let lowered = spec.trim().to_lowercase();
    let (count, sides): (u32, u32) = if lowered.is_empty() {
        (1, 6)
    } else if let Some((count, sides)) = lowered.split_once('d') {
        let count = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid())?
        };
        (count, sides.parse().map_err(|_| invalid())?)
    } else {
        (lowered.parse().map_err(|_| invalid())?, 6)
    };

    if !(1..=MAX_DICE).contains(&count) || !(1..=MAX_SIDES).contains(&sides) {
        return Err(invalid());
    }
    Ok((0..count).map(|_| rng.gen_range(1..=sides)).collect())
}

/// The rolls, then their sum, maximum and minimum, with emoji digits.
pub fn format_rolls(rolls: &[u32]) -> String {
    let listed: String = rolls.iter().map(|r| format!("{r} ")).collect();
    let sum: u32 = rolls.iter().sum();
    let max = rolls.iter().max().copied().unwrap_or(0);
    let min = rolls.iter().min().copied().unwrap_or(0);
    num_to_emoji(&format!("{listed}\nSum={sum}\nMax={max}\nMin={min}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_dice_shapes() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(roll_dice("", &mut rng).unwrap().len(), 1);
        assert_eq!(roll_dice("3", &mut rng).unwrap().len(), 3);
        let rolls = roll_dice("4D20", &mut rng).unwrap();
        assert_eq!(rolls.len(), 4);
        assert!(rolls.iter().all(|r| (1..=20).contains(r)));
        assert!(roll_dice("d4", &mut rng).unwrap()[0] <= 4);
    }

    #[test]
    fn test_roll_dice_rejects_bad_specs() {
        let mut rng = StdRng::seed_from_u64(7);
        for spec in ["0d6", "101d6", "2d0", "2d1001", "xd6", "lots"] {
            let err = roll_dice(spec, &mut rng).unwrap_err();
            assert!(err.is_usage(), "{spec} should be a usage error");
        }
    }

    #[test]
    fn test_format_rolls() {
        let keycap = '\u{20e3}';
        let text = format_rolls(&[3, 5]);
        assert_eq!(
            text,
            format!("3{keycap} 5{keycap} \nSum=8{keycap}\nMax=5{keycap}\nMin=3{keycap}")
        );
    }
}
