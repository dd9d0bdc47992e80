//! Resolving people and conversations by (partial) name.
//!
//! Conversations are referred to by title everywhere in persisted state so
//! that links survive client restarts; ids are looked up again on each use.

use xo_bus::{AccountId, ChatClient, ConversationId, ConversationKind};
use xo_core::constants::MAX_PREFERRED_CONVERSATION_ID;
use xo_store::{MessageLinks, NickBook};

use crate::context::MessageContext;

/// Read-only view over the client, the link table and the nick book.
pub struct Resolver<'a> {
    client: &'a dyn ChatClient,
    links: &'a MessageLinks,
    nicks: &'a NickBook,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a dyn ChatClient, links: &'a MessageLinks, nicks: &'a NickBook) -> Self {
        Self {
            client,
            links,
            nicks,
        }
    }

    /// Open conversations, one per `(account, title)`.
    ///
    /// The client can report the same chat several times. IMs keep the last
    /// id seen; group chats keep the highest id up to
    /// `MAX_PREFERRED_CONVERSATION_ID`.
    pub fn chats(&self) -> Vec<ConversationId> {
        let mut chosen: Vec<(AccountId, String, ConversationId)> = Vec::new();
        for id in self.client.conversations() {
            let Some(title) = self.client.conversation_title(id) else {
                continue;
            };
            let account = self.client.conversation_account(id).unwrap_or_default();
            let kind = self
                .client
                .conversation_kind(id)
                .unwrap_or(ConversationKind::Im);

            match chosen
                .iter_mut()
                .find(|(a, t, _)| *a == account && *t == title)
            {
                Some(entry) => {
                    let replace = match kind {
                        ConversationKind::Im => true,
                        ConversationKind::Chat => {
                            entry.2 < id && id <= MAX_PREFERRED_CONVERSATION_ID
                        }
                    };
                    if replace {
                        entry.2 = id;
                    }
                }
                None => chosen.push((account, title, id)),
            }
        }
        chosen.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Title of a conversation, or an empty string when it is unknown.
    pub fn title(&self, conversation: ConversationId) -> String {
        self.client
            .conversation_title(conversation)
            .unwrap_or_default()
    }

    pub fn conversation_by_title(&self, title: &str) -> Option<ConversationId> {
        self.chats()
            .into_iter()
            .find(|id| self.client.conversation_title(*id).as_deref() == Some(title))
    }

    /// Full title of the first chat starting with `partial`, else the first
    /// one containing it.
    pub fn full_conversation_name(&self, partial: &str) -> Option<String> {
        if partial.is_empty() {
            return None;
        }
        let titles: Vec<String> = self
            .chats()
            .into_iter()
            .filter_map(|id| self.client.conversation_title(id))
            .collect();
        titles
            .iter()
            .find(|t| t.starts_with(partial))
            .or_else(|| titles.iter().find(|t| t.contains(partial)))
            .cloned()
    }

    /// Conversations the given one mirrors into that are currently open.
    pub fn linked_conversations(&self, conversation: ConversationId) -> Vec<ConversationId> {
        let title = self.title(conversation);
        self.links
            .targets(&title)
            .iter()
            .filter_map(|target| self.conversation_by_title(target))
            .collect()
    }

    /// The buddy alias of `sender`, falling back to the buddy name.
    pub fn real_name(&self, account: AccountId, sender: &str) -> String {
        self.client
            .buddy_alias(account, sender)
            .filter(|alias| !alias.is_empty())
            .unwrap_or_else(|| sender.to_string())
    }

    /// How `sender` is shown: their nickname in `conversation` when one is
    /// set, otherwise their real name.
    pub fn display_name(
        &self,
        account: AccountId,
        sender: &str,
        conversation: Option<ConversationId>,
    ) -> String {
        let Some(conversation) = conversation else {
            return self.real_name(account, sender);
        };
        let account = self
            .client
            .conversation_account(conversation)
            .unwrap_or(account);
        let real = self.real_name(account, sender);
        self.nicks
            .get(&self.title(conversation), &real)
            .map(str::to_string)
            .unwrap_or(real)
    }

    /// Find a member of this chat or a linked chat by partial name.
    ///
    /// Real-name prefixes win over nickname prefixes, which win over
    /// substrings. Matching ignores case. With `use_nick` the user's
    /// nickname in this chat is returned when they have one.
    pub fn find_user(
        &self,
        ctx: &MessageContext,
        partial: &str,
        use_nick: bool,
    ) -> Option<String> {
        if partial.is_empty() {
            return None;
        }
        let needle = partial.to_lowercase();
        let chat = self.title(ctx.conversation);
        let nick_of = |real: &str| -> String {
            match self.nicks.get(&chat, real) {
                Some(nick) if use_nick => nick.to_string(),
                _ => real.to_string(),
            }
        };

        if let Some(bot) = self.client.account_alias(ctx.account) {
            if !bot.is_empty() && bot.to_lowercase().contains(&needle) {
                return Some(nick_of(&bot));
            }
        }

        let members = self.members(ctx);
        let nicks: Vec<Option<String>> = members
            .iter()
            .map(|real| self.nicks.get(&chat, real).map(str::to_lowercase))
            .collect();
        let lowered: Vec<String> = members.iter().map(|m| m.to_lowercase()).collect();

        let found = (0..members.len())
            .find(|&i| lowered[i].starts_with(&needle))
            .or_else(|| {
                (0..members.len()).find(|&i| {
                    nicks[i]
                        .as_deref()
                        .is_some_and(|n| n.starts_with(&needle))
                })
            })
            .or_else(|| (0..members.len()).find(|&i| lowered[i].contains(&needle)))
            .or_else(|| {
                (0..members.len())
                    .find(|&i| nicks[i].as_deref().is_some_and(|n| n.contains(&needle)))
            })?;
        Some(nick_of(&members[found]))
    }

    /// Display names of everyone in this chat and its linked chats, sorted.
    pub fn list_users(&self, ctx: &MessageContext) -> Vec<String> {
        let (bot, username) = self.bot_names(ctx.account);
        let mut names: Vec<String> = Vec::new();
        for conversation in self.member_conversations(ctx.conversation) {
            for user in self.client.chat_users(conversation) {
                let account = self
                    .client
                    .conversation_account(conversation)
                    .unwrap_or(ctx.account);
                if user == username || self.real_name(account, &user) == bot {
                    continue;
                }
                names.push(self.display_name(ctx.account, &user, Some(conversation)));
            }
        }
        names.sort();
        names.dedup();
        names
    }

    /// Real names of every member of this chat and its linked chats,
    /// without the bot, in first-seen order.
    fn members(&self, ctx: &MessageContext) -> Vec<String> {
        let (bot, username) = self.bot_names(ctx.account);
        let mut members: Vec<String> = Vec::new();
        for conversation in self.member_conversations(ctx.conversation) {
            let account = self
                .client
                .conversation_account(conversation)
                .unwrap_or(ctx.account);
            for user in self.client.chat_users(conversation) {
                let real = self.real_name(account, &user);
                if user == username || real == bot || members.contains(&real) {
                    continue;
                }
                members.push(real);
            }
        }
        members
    }

    fn member_conversations(&self, conversation: ConversationId) -> Vec<ConversationId> {
        let mut conversations = vec![conversation];
        for linked in self.linked_conversations(conversation) {
            if !conversations.contains(&linked) {
                conversations.push(linked);
            }
        }
        conversations
    }

    fn bot_names(&self, account: AccountId) -> (String, String) {
        (
            self.client.account_alias(account).unwrap_or_default(),
            self.client.account_username(account).unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xo_bus::MemoryClient;

    fn client() -> MemoryClient {
        let client = MemoryClient::new();
        client
            .add_account(1, "bot@example.com", "Relay", "jabber")
            .add_conversation(7, 1, "Dorm Room", ConversationKind::Chat)
            .add_conversation(8, 1, "Family", ConversationKind::Chat)
            .add_conversation(3, 1, "Dorm Room", ConversationKind::Chat)
            .add_conversation(20_000, 1, "Family", ConversationKind::Chat)
            .add_buddy(1, "ann", Some("Ann Smith"))
            .add_buddy(1, "bob", Some("Bob Jones"))
            .add_buddy(1, "cat", None)
            .set_chat_users(7, &["ann", "bot@example.com"])
            .set_chat_users(8, &["bob", "cat"]);
        client
    }

    fn linked() -> MessageLinks {
        let mut links = MessageLinks::default();
        links.link("Dorm Room", vec!["Family".to_string()]);
        links
    }

    #[test]
    fn test_chats_dedupe_by_title() {
        let client = client();
        let (links, nicks) = (MessageLinks::default(), NickBook::default());
        let resolver = Resolver::new(&client, &links, &nicks);
        assert_eq!(resolver.chats(), vec![7, 8]);
        assert_eq!(resolver.conversation_by_title("Family"), Some(8));
        assert_eq!(resolver.conversation_by_title("Nowhere"), None);
    }

    #[test]
    fn test_full_conversation_name_prefers_prefix() {
        let client = client();
        client.add_conversation(9, 1, "My Family", ConversationKind::Im);
        let (links, nicks) = (MessageLinks::default(), NickBook::default());
        let resolver = Resolver::new(&client, &links, &nicks);
        assert_eq!(resolver.full_conversation_name("Fam").as_deref(), Some("Family"));
        assert_eq!(resolver.full_conversation_name("y F").as_deref(), Some("My Family"));
        assert_eq!(resolver.full_conversation_name("Room").as_deref(), Some("Dorm Room"));
        assert_eq!(resolver.full_conversation_name("zzz"), None);
        assert_eq!(resolver.full_conversation_name(""), None);
    }

    #[test]
    fn test_display_name_uses_nick_only_with_conversation() {
        let client = client();
        let links = MessageLinks::default();
        let mut nicks = NickBook::default();
        nicks.set("Dorm Room", "Ann Smith", "Annie");
        let resolver = Resolver::new(&client, &links, &nicks);

        assert_eq!(resolver.display_name(1, "ann", None), "Ann Smith");
        assert_eq!(resolver.display_name(1, "ann", Some(7)), "Annie");
        assert_eq!(resolver.display_name(1, "ann", Some(8)), "Ann Smith");
        assert_eq!(resolver.display_name(1, "cat", Some(7)), "cat");
        assert_eq!(resolver.display_name(1, "stranger", None), "stranger");
    }

    #[test]
    fn test_find_user_across_linked_chats() {
        let client = client();
        let links = linked();
        let mut nicks = NickBook::default();
        nicks.set("Dorm Room", "Bob Jones", "Bobby");
        let resolver = Resolver::new(&client, &links, &nicks);
        let ctx = MessageContext::new(1, "ann", "!to hi bo", 7);

        assert_eq!(resolver.find_user(&ctx, "bo", false).as_deref(), Some("Bob Jones"));
        assert_eq!(resolver.find_user(&ctx, "bo", true).as_deref(), Some("Bobby"));
        assert_eq!(resolver.find_user(&ctx, "SMITH", false).as_deref(), Some("Ann Smith"));
        assert_eq!(resolver.find_user(&ctx, "bobb", false).as_deref(), Some("Bob Jones"));
        assert_eq!(resolver.find_user(&ctx, "rel", false).as_deref(), Some("Relay"));
        assert_eq!(resolver.find_user(&ctx, "nobody", false), None);
        assert_eq!(resolver.find_user(&ctx, "", false), None);
    }

    #[test]
    fn test_find_user_without_links_stays_local() {
        let client = client();
        let (links, nicks) = (MessageLinks::default(), NickBook::default());
        let resolver = Resolver::new(&client, &links, &nicks);
        let ctx = MessageContext::new(1, "ann", "!to hi", 7);
        assert_eq!(resolver.find_user(&ctx, "bob", false), None);
    }

    #[test]
    fn test_list_users() {
        let client = client();
        let links = linked();
        let mut nicks = NickBook::default();
        nicks.set("Family", "cat", "Kitty");
        let resolver = Resolver::new(&client, &links, &nicks);
        let ctx = MessageContext::new(1, "ann", "!users", 7);
        assert_eq!(resolver.list_users(&ctx), vec!["Ann Smith", "Bob Jones", "Kitty"]);
    }
}
