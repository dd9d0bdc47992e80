//! The command table and alias resolution.
//!
//! Every command is a plain function taking the bot, the message context and
//! the whitespace-separated words after the command name. Handlers reply
//! through `Bot::reply`; a `Usage` error is shown to the chat verbatim.

mod aliases;
mod general;
mod links;
mod location;
mod puns;
mod schedule;
mod users;

pub use general::{format_rolls, roll_dice};

use tracing::debug;

use xo_core::error::{XoError, XoResult};
use xo_store::Alias;

use crate::bot::Bot;
use crate::context::MessageContext;
use crate::text::{format_grouped, parse_command, rest_after};

/// Deepest alias or `mimic` chain a single message may start.
pub const MAX_DISPATCH_DEPTH: usize = 8;

/// A command handler.
pub type Handler = fn(&mut Bot, &MessageContext, &[String]) -> XoResult<()>;

/// One entry of the command table.
pub struct Command {
    pub name: &'static str,
    pub help: &'static str,
    pub run: Handler,
}

/// Help for the alias variables, reachable through `help aliasvars`.
pub const ALIAS_VARS_HELP: &str = "%sendername, %botname, %chattitle, %chatname";

/// All commands, sorted by name.
pub static COMMANDS: &[Command] = &[
    Command {
        name: "addpun",
        help: "Adds a pun to the list of random puns.",
        run: puns::add_pun,
    },
    Command {
        name: "alias",
        help: "Links a name to a command, or prints out the command run by an alias.",
        run: aliases::alias,
    },
    Command {
        name: "aliases",
        help: "Lists all of the aliases.",
        run: aliases::list,
    },
    Command {
        name: "allevents",
        help: "Lists all scheduled events.",
        run: schedule::all_events,
    },
    Command {
        name: "args",
        help: "Prints out the arguments received from this message.",
        run: general::args,
    },
    Command {
        name: "atloc",
        help: "Replies with who's said they're somewhere recently and where they are.",
        run: location::at_loc,
    },
    Command {
        name: "botme",
        help: "Replies \"*(bot's name) (message)\", e.g. \"*Relay waves.\"",
        run: general::bot_me,
    },
    Command {
        name: "chats",
        help: "Lists all chats the bot knows of by name and ID.",
        run: general::chats,
    },
    Command {
        name: "commands",
        help: "Lists all of the commands.",
        run: general::commands,
    },
    Command {
        name: "diceroll",
        help: "Rolls the specified number of dice, returning the min, max, and sum of the rolls. 1d6 by default.",
        run: general::dice_roll,
    },
    Command {
        name: "echo",
        help: "Repeats the message said.",
        run: general::echo,
    },
    Command {
        name: "events",
        help: "Lists all of the events you have scheduled.",
        run: schedule::events,
    },
    Command {
        name: "exit",
        help: "Exits the bot.",
        run: general::exit,
    },
    Command {
        name: "gds",
        help: "Tells the chat you're going to the default location for some period of time.",
        run: location::gds,
    },
    Command {
        name: "help",
        help: "Prints out the syntax and usage of each command.",
        run: general::help,
    },
    Command {
        name: "htmlescape",
        help: "Strips the markup from the message.",
        run: general::html_escape,
    },
    Command {
        name: "lastreboot",
        help: "Returns when the bot was started up.",
        run: general::last_reboot,
    },
    Command {
        name: "leftloc",
        help: "Tells the chat you've left somewhere.",
        run: location::left_loc,
    },
    Command {
        name: "link",
        help: "Links from the first chat to the following chats.",
        run: links::link,
    },
    Command {
        name: "links",
        help: "Prints out the current message links.",
        run: links::list,
    },
    Command {
        name: "loc",
        help: "Tells the chat you've gone somewhere, optionally for how long or from when.",
        run: location::loc,
    },
    Command {
        name: "loconly",
        help: "Tells the chat you're going somewhere for the default amount of time.",
        run: location::loc_only,
    },
    Command {
        name: "me",
        help: "Replies \"*(username) (message)\", e.g. \"*Ann is French.\"",
        run: general::me,
    },
    Command {
        name: "mimic",
        help: "Runs the specified command as if it was run by the specified user.",
        run: general::mimic,
    },
    Command {
        name: "msg",
        help: "Sends a message to the specified chat. Matches incomplete names.",
        run: general::msg,
    },
    Command {
        name: "nicks",
        help: "Lists the nicknames of all users in the chat. If they don't have one, their name will not show up!",
        run: users::nicks,
    },
    Command {
        name: "ping",
        help: "Replies \"Pong!\". Useful for checking if the bot is working.",
        run: general::ping,
    },
    Command {
        name: "pun",
        help: "Replies with a random pun.",
        run: puns::pun,
    },
    Command {
        name: "removenick",
        help: "Removes a user's nickname.",
        run: users::remove_nick,
    },
    Command {
        name: "removepun",
        help: "Removes a pun from the list of puns.",
        run: puns::remove_pun,
    },
    Command {
        name: "replace",
        help: "Replaces the text in the last argument(s) using the first and second.",
        run: general::replace,
    },
    Command {
        name: "restart",
        help: "Restarts the bot.",
        run: general::restart,
    },
    Command {
        name: "schedule",
        help: "Runs a command after the specified amount of time.",
        run: schedule::schedule,
    },
    Command {
        name: "setnick",
        help: "Changes the nickname of the specified user.",
        run: users::set_nick,
    },
    Command {
        name: "to",
        help: "Sends a message with the provided person as a 'target'. Mainly used for aliases.",
        run: general::to,
    },
    Command {
        name: "unalias",
        help: "Unlinks a name from a command.",
        run: aliases::unalias,
    },
    Command {
        name: "unlink",
        help: "Unlinks the second and further chats from the first chat.",
        run: links::unlink,
    },
    Command {
        name: "unschedule",
        help: "Unschedules the event with the given index. (The index should be from the events command)",
        run: schedule::unschedule,
    },
    Command {
        name: "users",
        help: "Lists all of the users in the current chat.",
        run: users::users,
    },
];

/// Look a command up by lowercase name.
pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS
        .binary_search_by(|c| c.name.cmp(name))
        .ok()
        .map(|i| &COMMANDS[i])
}

/// Help text for a command or for `aliasvars`.
pub fn help_text(name: &str) -> Option<&'static str> {
    if name == "aliasvars" {
        return Some(ALIAS_VARS_HELP);
    }
    find(name).map(|c| c.help)
}

impl Bot {
    /// Run `name` as a command, else as an alias visible from this chat.
    ///
    /// Returns `Ok(false)` when it is neither. Aliases and `mimic` call
    /// back into this; past `MAX_DISPATCH_DEPTH` levels it refuses.
    pub fn dispatch(
        &mut self,
        ctx: &MessageContext,
        name: &str,
        args: &[String],
    ) -> XoResult<bool> {
        if self.dispatch_depth >= MAX_DISPATCH_DEPTH {
            return Err(XoError::usage("Alias/mimic nesting is too deep!"));
        }
        self.dispatch_depth += 1;
        let result = self.dispatch_once(ctx, name, args);
        self.dispatch_depth -= 1;
        result
    }

    fn dispatch_once(
        &mut self,
        ctx: &MessageContext,
        name: &str,
        args: &[String],
    ) -> XoResult<bool> {
        if let Some(command) = find(name) {
            debug!("running command {name} for {}", ctx.sender);
            (command.run)(self, ctx, args)?;
            return Ok(true);
        }
        let Some(alias) = self.resolve_alias(ctx, name) else {
            return Ok(false);
        };
        self.run_alias(ctx, name, &alias)?;
        Ok(true)
    }

    /// The alias `name` from this chat, or from the first linked chat that
    /// defines it.
    pub(crate) fn resolve_alias(&self, ctx: &MessageContext, name: &str) -> Option<Alias> {
        let title = self.chat_title(ctx.conversation);
        if let Some(alias) = self.state.aliases.get(&title, name) {
            return Some(alias.clone());
        }
        self.state
            .links
            .targets(&title)
            .iter()
            .find_map(|linked| self.state.aliases.get(linked, name))
            .cloned()
    }

    fn run_alias(&mut self, ctx: &MessageContext, name: &str, alias: &Alias) -> XoResult<()> {
        let delimiter = self.config.command_delimiter.clone();
        let extra = rest_after(&ctx.message, 1);
        let mut line = format!("{delimiter}{}", alias.command());
        for word in alias.args.iter().map(String::as_str).chain([extra]) {
            if !word.is_empty() {
                line.push(' ');
                line.push_str(word);
            }
        }
        let line = self.expand_alias_vars(ctx, &line);

        let (command, args) = parse_command(&line, &delimiter)
            .ok_or_else(|| XoError::Command(format!("alias \"{name}\" is empty")))?;
        let target = find(&command).ok_or_else(|| {
            XoError::Command(format!("alias \"{name}\" runs unknown command \"{command}\""))
        })?;
        debug!("alias {name} expands to {line:?}");
        (target.run)(self, &ctx.with_message(line), &args)
    }

    /// Substitute `%sendername`, `%botname`, `%chattitle` and `%chatname`.
    pub fn expand_alias_vars(&self, ctx: &MessageContext, text: &str) -> String {
        if !text.contains('%') {
            return text.to_string();
        }
        let resolver = self.resolver();
        let sender = resolver.display_name(ctx.account, &ctx.sender, Some(ctx.conversation));
        let bot = self.client.account_alias(ctx.account).unwrap_or_default();
        let title = resolver.title(ctx.conversation);
        let name = self
            .client
            .conversation_name(ctx.conversation)
            .unwrap_or_else(|| title.clone());
        text.replace("%sendername", &sender)
            .replace("%botname", &bot)
            .replace("%chattitle", &title)
            .replace("%chatname", &name)
    }

    /// "Valid Commands: ..." followed by the alias listing.
    pub fn command_listing(&self, ctx: &MessageContext) -> String {
        let names: Vec<&str> = COMMANDS.iter().map(|c| c.name).collect();
        format!(
            "{}\n{}",
            format_grouped("Valid Commands: ", &names),
            self.alias_listing(ctx)
        )
    }

    /// Aliases defined in this chat and in its linked chats, grouped.
    pub fn alias_listing(&self, ctx: &MessageContext) -> String {
        let title = self.chat_title(ctx.conversation);
        let mut names: Vec<&str> = self.state.aliases.names(&title);
        for linked in self.state.links.targets(&title) {
            names.extend(self.state.aliases.names(linked));
        }
        names.sort_unstable();
        names.dedup();
        format_grouped("Valid aliases: ", &names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        for pair in COMMANDS.windows(2) {
            assert!(pair[0].name < pair[1].name, "{} before {}", pair[0].name, pair[1].name);
        }
    }

    #[test]
    fn test_find_and_help() {
        assert_eq!(find("ping").map(|c| c.name), Some("ping"));
        assert!(find("yt").is_none());
        assert_eq!(help_text("aliasvars"), Some(ALIAS_VARS_HELP));
        assert!(help_text("echo").unwrap().starts_with("Repeats"));
        assert!(help_text("nope").is_none());
    }

    #[test]
    fn test_every_command_has_help() {
        assert!(COMMANDS.iter().all(|c| !c.help.is_empty()));
        assert_eq!(COMMANDS.len(), 39);
    }
}
