//! Editing contexts: the frame a clipboard operation runs against.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::platform::PlatformClipboardProvider;

/// Identifier of an editing context, kept by clipboard references as
/// their back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame-{}", self.0)
    }
}

/// The document/editing scope a clipboard operation is issued from.
///
/// Borrowed for the duration of a single call; clipboard components
/// never hold on to it.
pub trait EditingContext {
    fn frame_id(&self) -> FrameId;

    /// Whether the caret sits in editable content. Pure, no side effects.
    fn is_editable(&self) -> bool;

    /// The platform clipboard capability of this context.
    ///
    /// Every live context has one; `None` is a wiring bug.
    fn platform_client(&self) -> Option<&dyn PlatformClipboardProvider>;
}

/// Editing context driven by the command line.
#[derive(Clone)]
pub struct Frame {
    id: FrameId,
    editable: bool,
    client: Option<Arc<dyn PlatformClipboardProvider>>,
}

impl Frame {
    pub fn new(client: Arc<dyn PlatformClipboardProvider>) -> Self {
        Self {
            id: FrameId::new(),
            editable: true,
            client: Some(client),
        }
    }

    /// A frame with no platform client attached (detached or headless).
    #[allow(dead_code)]
    pub fn detached() -> Self {
        Self {
            id: FrameId::new(),
            editable: true,
            client: None,
        }
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("editable", &self.editable)
            .field("client", &self.client.as_ref().map(|c| c.name()))
            .finish()
    }
}

impl EditingContext for Frame {
    fn frame_id(&self) -> FrameId {
        self.id
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn platform_client(&self) -> Option<&dyn PlatformClipboardProvider> {
        self.client.as_deref()
    }
}
