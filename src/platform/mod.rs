//! Platform clipboard capability: pluggable clipboard backends.
//!
//! An editing context reaches the system clipboard only through a
//! [`PlatformClipboardProvider`]. Every call hands out a fresh
//! [`PlatformClipboardHandle`]; the handle is released when dropped, so a
//! scope that acquires one releases it on every exit path.

pub mod memory;
pub mod x11;

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use memory::MemoryClipboard;
pub use x11::X11ClipboardProvider;

/// Errors returned by platform clipboard backends.
///
/// These are environment failures (a helper binary missing, a broken
/// pipe). An empty or unowned clipboard is never an error: it is an
/// empty [`ContentTypeSet`].
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("pipe to {program} failed: {source}")]
    Pipe {
        program: String,
        source: std::io::Error,
    },
    #[error("{program} exited with status {status}")]
    Exit { program: String, status: String },
    #[error("display: {0}")]
    Display(String),
}

/// Identity of a single handle acquisition.
///
/// Monotonically increasing. No two acquisitions in a process share an
/// id, so a released handle can never be mistaken for a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type identifiers (`text/plain`, `UTF8_STRING`, ...) currently
/// advertised by a clipboard.
///
/// Snapshot taken from a handle; never persisted. Iteration order is
/// sorted for stable output but callers must not rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypeSet(BTreeSet<String>);

impl ContentTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn contains(&self, ty: &str) -> bool {
        self.0.contains(ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ContentTypeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A live, exclusively owned handle onto one clipboard.
///
/// Dropping the handle releases it. `Send` so an evaluation can run on a
/// blocking worker thread.
pub trait PlatformClipboardHandle: Send {
    /// Identity of this acquisition.
    fn id(&self) -> HandleId;

    /// Read the currently advertised type identifiers.
    fn types(&self) -> Result<ContentTypeSet, PlatformError>;

    /// Read the payload for `ty`. `None` if the clipboard does not offer it.
    fn read(&self, ty: &str) -> Result<Option<Vec<u8>>, PlatformError>;

    /// Place `data` on the clipboard under `ty`.
    fn write(&self, ty: &str, data: &[u8]) -> Result<(), PlatformError>;

    /// Remove one type. `Ok(false)` if the backend cannot clear.
    fn clear(&self, ty: &str) -> Result<bool, PlatformError>;

    /// Remove everything. `Ok(false)` if the backend cannot clear.
    fn clear_all(&self) -> Result<bool, PlatformError>;
}

/// Hands out clipboard handles for an editing context.
///
/// Reachable from every live editing context. `Send + Sync` because a
/// context may be evaluated from a blocking worker.
pub trait PlatformClipboardProvider: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Acquire a fresh handle onto the persistent system clipboard.
    fn create_general_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError>;

    /// Acquire a fresh handle onto an ephemeral drag-and-drop clipboard.
    fn create_drag_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError>;
}

/// Which backend to open, assembled from CLI arguments.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    X11 { xclip: PathBuf },
    Memory,
}

/// Open the configured backend.
pub fn open(config: BackendConfig) -> Arc<dyn PlatformClipboardProvider> {
    let provider: Arc<dyn PlatformClipboardProvider> = match config {
        BackendConfig::X11 { xclip } => Arc::new(X11ClipboardProvider::connect(xclip)),
        BackendConfig::Memory => Arc::new(MemoryClipboard::new()),
    };
    tracing::debug!(backend = provider.name(), "platform clipboard opened");
    provider
}
