//! Aggregate of every persisted book, bound to its store.

use tracing::info;

use xo_core::constants::files;
use xo_core::error::XoResult;

use crate::models::aliases::AliasBook;
use crate::models::check_ins::CheckInBook;
use crate::models::events::EventQueue;
use crate::models::links::MessageLinks;
use crate::models::nicks::NickBook;
use crate::models::puns::PunBook;
use crate::store::Store;

/// All persisted bot state. Changes are in memory until the matching
/// `save_*` call writes that book back to its file.
#[derive(Debug, Clone)]
pub struct BotState {
    store: Store,
    pub links: MessageLinks,
    pub puns: PunBook,
    pub aliases: AliasBook,
    pub nicks: NickBook,
    pub check_ins: CheckInBook,
    pub events: EventQueue,
}

impl BotState {
    /// Empty state bound to `store`; nothing is read yet.
    pub fn empty(store: Store) -> Self {
        Self {
            store,
            links: MessageLinks::default(),
            puns: PunBook::default(),
            aliases: AliasBook::default(),
            nicks: NickBook::default(),
            check_ins: CheckInBook::default(),
            events: EventQueue::default(),
        }
    }

    /// Load every state file from the store.
    pub fn load(store: Store) -> Self {
        let mut state = Self::empty(store);
        state.reload();
        state
    }

    /// Replace the in-memory books with what is on disk.
    pub fn reload(&mut self) {
        self.links = self.store.load(files::MESSAGE_LINKS);
        self.puns = self.store.load(files::PUNS);
        self.aliases = self.store.load(files::ALIASES);
        self.nicks = self.store.load(files::NICKS);
        self.check_ins = self.store.load(files::CHECK_INS);
        self.events = self.store.load(files::SCHEDULED_EVENTS);
        info!(
            "loaded state from {}: {} linked chat(s), {} scheduled event(s)",
            self.store.dir().display(),
            self.links.len(),
            self.events.len()
        );
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn save_links(&self) -> XoResult<()> {
        self.store.save(files::MESSAGE_LINKS, &self.links)
    }

    pub fn save_puns(&self) -> XoResult<()> {
        self.store.save(files::PUNS, &self.puns)
    }

    pub fn save_aliases(&self) -> XoResult<()> {
        self.store.save(files::ALIASES, &self.aliases)
    }

    pub fn save_nicks(&self) -> XoResult<()> {
        self.store.save(files::NICKS, &self.nicks)
    }

    pub fn save_check_ins(&self) -> XoResult<()> {
        self.store.save(files::CHECK_INS, &self.check_ins)
    }

    pub fn save_events(&self) -> XoResult<()> {
        self.store.save(files::SCHEDULED_EVENTS, &self.events)
    }

    /// Write every book.
    pub fn save_all(&self) -> XoResult<()> {
        self.save_links()?;
        self.save_puns()?;
        self.save_aliases()?;
        self.save_nicks()?;
        self.save_check_ins()?;
        self.save_events()
    }
}
