//! JSON-lines bridge to the chat client over named pipes.
//!
//! A small bridge process attached to the chat client writes one JSON frame
//! per line into the inbound FIFO: `directory` frames describe accounts,
//! conversations and chat members, `message` frames carry received messages.
//! Outbound text is appended to the outbound path as `send` frames for the
//! bridge to deliver. The bridge owns that file: it consumes the frames and
//! is responsible for truncating or rotating it. The bot only ever appends.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, RwLock};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use xo_core::error::{XoError, XoResult};

use crate::client::{AccountId, ChatClient, ConversationId, ConversationKind, IncomingMessage};
use crate::confirm::ConfirmationQueue;
use crate::directory::Directory;

/// One line on either pipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Directory(Directory),
    Message(IncomingMessage),
    Send {
        conversation: ConversationId,
        text: String,
    },
}

#[derive(Deserialize)]
struct SendBody {
    conversation: ConversationId,
    text: String,
}

impl Frame {
    /// Parse one line.
    ///
    /// Dispatches on `type` by hand: serde's internally tagged enums cannot
    /// read the integer-keyed `users` map of a directory frame.
    pub fn parse(line: &str) -> XoResult<Frame> {
        let mut value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| XoError::Bus(format!("malformed frame: {e}")))?;
        let kind = value
            .as_object_mut()
            .and_then(|o| o.remove("type"))
            .and_then(|t| t.as_str().map(str::to_string))
            .ok_or_else(|| XoError::Bus("frame has no type".into()))?;
        let invalid = |e: serde_json::Error| XoError::Bus(format!("invalid {kind} frame: {e}"));
        match kind.as_str() {
            "directory" => Ok(Frame::Directory(serde_json::from_value(value).map_err(invalid)?)),
            "message" => Ok(Frame::Message(serde_json::from_value(value).map_err(invalid)?)),
            "send" => {
                let body: SendBody = serde_json::from_value(value).map_err(invalid)?;
                Ok(Frame::Send {
                    conversation: body.conversation,
                    text: body.text,
                })
            }
            other => Err(XoError::Bus(format!("unknown frame type \"{other}\""))),
        }
    }
}

/// Work for the outbox writer thread.
#[derive(Debug)]
enum Outgoing {
    Line(String),
    Flush(mpsc::Sender<()>),
}

/// Chat client backed by the pipe bridge.
///
/// Lookups are answered from the last directory frames received; messages
/// are pushed onto the confirmation queue for the polling loop to drain.
/// Sends are handed to a writer thread, so a slow or unread outbound FIFO
/// never stalls the polling loop.
#[derive(Debug)]
pub struct PipeClient {
    directory: RwLock<Directory>,
    queue: ConfirmationQueue,
    outbound: PathBuf,
    outbox: Mutex<mpsc::Sender<Outgoing>>,
}

impl PipeClient {
    /// Create the client and start its outbox writer. The writer stops once
    /// the client is dropped.
    pub fn new(outbound: impl Into<PathBuf>, queue: ConfirmationQueue) -> XoResult<Self> {
        let outbound = outbound.into();
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("outbox-writer".into())
            .spawn({
                let path = outbound.clone();
                move || write_outbox(&path, rx)
            })?;

        Ok(Self {
            directory: RwLock::new(Directory::default()),
            queue,
            outbound,
            outbox: Mutex::new(tx),
        })
    }

    /// Wait up to `timeout` for every queued send to reach the outbound
    /// path. Returns `false` on timeout, e.g. while an outbound FIFO has
    /// no reader.
    pub fn flush(&self, timeout: Duration) -> bool {
        let (done, wait) = mpsc::channel();
        if self.enqueue(Outgoing::Flush(done)).is_err() {
            return false;
        }
        wait.recv_timeout(timeout).is_ok()
    }

    fn enqueue(&self, item: Outgoing) -> XoResult<()> {
        self.outbox
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .send(item)
            .map_err(|_| XoError::SendFailed("outbox writer has stopped".into()))
    }

    pub fn queue(&self) -> &ConfirmationQueue {
        &self.queue
    }

    pub fn outbound_path(&self) -> &Path {
        &self.outbound
    }

    /// Parse and apply one inbound line.
    pub fn apply_line(&self, line: &str) -> XoResult<()> {
        self.apply_frame(Frame::parse(line)?);
        Ok(())
    }

    pub fn apply_frame(&self, frame: Frame) {
        match frame {
            Frame::Directory(update) => {
                debug!(
                    "directory update: {} account(s), {} conversation(s)",
                    update.accounts.len(),
                    update.conversations.len()
                );
                self.write().merge(update);
            }
            Frame::Message(message) => {
                debug!("message from {} in conversation {}", message.sender, message.conversation);
                self.queue.push(message);
            }
            Frame::Send { conversation, .. } => {
                warn!("ignoring send frame for conversation {conversation} on the inbound pipe");
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Directory> {
        self.directory.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Directory> {
        self.directory.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChatClient for PipeClient {
    fn accounts(&self) -> Vec<AccountId> {
        self.read().accounts.iter().map(|a| a.id).collect()
    }

    fn account_username(&self, account: AccountId) -> Option<String> {
        self.read().account(account).map(|a| a.username.clone())
    }

    fn account_alias(&self, account: AccountId) -> Option<String> {
        self.read().account(account).map(|a| a.alias.clone())
    }

    fn account_protocol(&self, account: AccountId) -> Option<String> {
        self.read().account(account).map(|a| a.protocol.clone())
    }

    fn conversations(&self) -> Vec<ConversationId> {
        self.read().conversations.iter().map(|c| c.id).collect()
    }

    fn conversation_title(&self, conversation: ConversationId) -> Option<String> {
        self.read().conversation(conversation).map(|c| c.title.clone())
    }

    fn conversation_name(&self, conversation: ConversationId) -> Option<String> {
        self.read()
            .conversation(conversation)
            .map(|c| c.name.clone().unwrap_or_else(|| c.title.clone()))
    }

    fn conversation_account(&self, conversation: ConversationId) -> Option<AccountId> {
        self.read().conversation(conversation).map(|c| c.account)
    }

    fn conversation_kind(&self, conversation: ConversationId) -> Option<ConversationKind> {
        self.read().conversation(conversation).map(|c| c.kind)
    }

    fn buddy_alias(&self, account: AccountId, name: &str) -> Option<String> {
        self.read().buddy(account, name).and_then(|b| b.alias.clone())
    }

    fn chat_users(&self, conversation: ConversationId) -> Vec<String> {
        self.read().users(conversation)
    }

    /// Queue a `send` frame for the outbound path.
    fn send(&self, conversation: ConversationId, text: &str) -> XoResult<()> {
        if self.read().conversation(conversation).is_none() {
            return Err(XoError::ConversationNotFound(conversation.to_string()));
        }
        let mut line = serde_json::to_string(&Frame::Send {
            conversation,
            text: text.to_string(),
        })?;
        line.push('\n');
        self.enqueue(Outgoing::Line(line))
    }
}

/// Body of the outbox writer thread. Opening blocks while the outbound
/// path is a FIFO with no reader; frames queue up meanwhile.
fn write_outbox(path: &Path, rx: mpsc::Receiver<Outgoing>) {
    for item in rx {
        match item {
            Outgoing::Line(line) => {
                let written = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .and_then(|mut file| file.write_all(line.as_bytes()));
                if let Err(e) = written {
                    error!("failed to write to {}: {e}", path.display());
                }
            }
            Outgoing::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("outbox writer for {} stopped", path.display());
}

/// Background reader of the inbound FIFO.
///
/// Runs on its own thread because opening and reading a FIFO block. The
/// pipe is reopened every time the writing side closes it.
pub struct PipeListener {
    path: PathBuf,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PipeListener {
    /// Create the FIFO if missing and start reading it into `client`.
    pub fn spawn(client: Arc<PipeClient>, path: impl Into<PathBuf>) -> XoResult<Self> {
        let path = path.into();
        ensure_fifo(&path)?;

        let stop = Arc::new(AtomicBool::new(false));
        let handle = std::thread::Builder::new()
            .name("pipe-listener".into())
            .spawn({
                let path = path.clone();
                let stop = stop.clone();
                move || listen(&client, &path, &stop)
            })?;

        info!("pipe listener started on {}", path.display());
        Ok(Self {
            path,
            stop,
            handle: Some(handle),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop reading. The listener thread is detached if it cannot be woken.
    pub fn shutdown(mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return;
        };
        for _ in 0..50 {
            wake(&self.path);
            if handle.is_finished() {
                let _ = handle.join();
                info!("pipe listener stopped");
                return;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        warn!("pipe listener did not stop, detaching");
    }
}

fn listen(client: &PipeClient, path: &Path, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                error!("failed to open {}: {e}", path.display());
                std::thread::sleep(Duration::from_secs(1));
                continue;
            }
        };
        for line in BufReader::new(file).lines() {
            match line {
                Ok(line) if line.trim().is_empty() => {}
                Ok(line) => {
                    if let Err(e) = client.apply_line(&line) {
                        warn!("skipping inbound line: {e}");
                    }
                }
                Err(e) => {
                    warn!("read error on {}: {e}", path.display());
                    break;
                }
            }
        }
        debug!("writer closed {}, reopening", path.display());
    }
}

#[cfg(unix)]
fn ensure_fifo(path: &Path) -> XoResult<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;
    use std::os::unix::fs::FileTypeExt;

    match std::fs::metadata(path) {
        Ok(meta) if meta.file_type().is_fifo() => return Ok(()),
        Ok(_) => {
            return Err(XoError::Bus(format!(
                "{} exists and is not a named pipe",
                path.display()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| XoError::Bus(format!("invalid pipe path {}", path.display())))?;
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::AlreadyExists {
            return Err(err.into());
        }
    }
    info!("created named pipe {}", path.display());
    Ok(())
}

#[cfg(not(unix))]
fn ensure_fifo(path: &Path) -> XoResult<()> {
    Err(XoError::Bus(format!(
        "named pipes are not supported on this platform ({})",
        path.display()
    )))
}

/// Open the FIFO for writing without blocking so a reader stuck in `open`
/// returns.
#[cfg(unix)]
fn wake(path: &Path) {
    use std::os::unix::fs::OpenOptionsExt;
    let _ = OpenOptions::new()
        .write(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path);
}

#[cfg(not(unix))]
fn wake(_path: &Path) {}
