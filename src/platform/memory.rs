//! In-process clipboard backend.
//!
//! General handles share one store owned by the provider; each drag
//! handle gets a store of its own that disappears with the handle. Used
//! for headless runs and as the drag clipboard of the x11 backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    ContentTypeSet, HandleId, PlatformClipboardHandle, PlatformClipboardProvider, PlatformError,
};

type Store = Arc<Mutex<BTreeMap<String, Vec<u8>>>>;

/// In-memory implementation of `PlatformClipboardProvider`.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    general: Store,
    live: Arc<AtomicUsize>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired from this provider and not yet dropped.
    // Observed by tests to check scoped release.
    #[allow(dead_code)]
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn handle(&self, store: Store) -> Box<dyn PlatformClipboardHandle> {
        self.live.fetch_add(1, Ordering::SeqCst);
        let id = HandleId::next();
        tracing::trace!(handle = %id, "memory clipboard: acquired");
        Box::new(MemoryHandle {
            id,
            store,
            live: Arc::clone(&self.live),
        })
    }
}

impl PlatformClipboardProvider for MemoryClipboard {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create_general_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError> {
        Ok(self.handle(Arc::clone(&self.general)))
    }

    fn create_drag_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError> {
        Ok(self.handle(Store::default()))
    }
}

struct MemoryHandle {
    id: HandleId,
    store: Store,
    live: Arc<AtomicUsize>,
}

impl MemoryHandle {
    // A poisoned store still holds consistent data: every write is a
    // single map operation.
    fn store(&self) -> MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PlatformClipboardHandle for MemoryHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn types(&self) -> Result<ContentTypeSet, PlatformError> {
        Ok(self.store().keys().cloned().collect())
    }

    fn read(&self, ty: &str) -> Result<Option<Vec<u8>>, PlatformError> {
        Ok(self.store().get(ty).cloned())
    }

    fn write(&self, ty: &str, data: &[u8]) -> Result<(), PlatformError> {
        self.store().insert(ty.to_string(), data.to_vec());
        Ok(())
    }

    fn clear(&self, ty: &str) -> Result<bool, PlatformError> {
        self.store().remove(ty);
        Ok(true)
    }

    fn clear_all(&self) -> Result<bool, PlatformError> {
        self.store().clear();
        Ok(true)
    }
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(handle = %self.id, "memory clipboard: released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_handles_share_contents() {
        let provider = MemoryClipboard::new();
        let a = provider.create_general_clipboard().unwrap();
        a.write("text/plain", b"hello").unwrap();

        let b = provider.create_general_clipboard().unwrap();
        assert_eq!(b.read("text/plain").unwrap(), Some(b"hello".to_vec()));
        assert!(b.types().unwrap().contains("text/plain"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn drag_clipboard_is_separate() {
        let provider = MemoryClipboard::new();
        let general = provider.create_general_clipboard().unwrap();
        general.write("text/plain", b"general").unwrap();

        let drag = provider.create_drag_clipboard().unwrap();
        assert!(drag.types().unwrap().is_empty());
        drag.write("text/uri-list", b"file:///tmp/x").unwrap();
        drop(drag);

        let types = general.types().unwrap();
        assert!(!types.contains("text/uri-list"));
        assert!(provider.create_drag_clipboard().unwrap().types().unwrap().is_empty());
    }

    #[test]
    fn live_handles_track_drop() {
        let provider = MemoryClipboard::new();
        assert_eq!(provider.live_handles(), 0);
        let a = provider.create_general_clipboard().unwrap();
        let b = provider.create_drag_clipboard().unwrap();
        assert_eq!(provider.live_handles(), 2);
        drop(a);
        assert_eq!(provider.live_handles(), 1);
        drop(b);
        assert_eq!(provider.live_handles(), 0);
    }

    #[test]
    fn clear_removes_types() {
        let provider = MemoryClipboard::new();
        let h = provider.create_general_clipboard().unwrap();
        h.write("text/plain", b"a").unwrap();
        h.write("text/html", b"<b>a</b>").unwrap();

        assert!(h.clear("text/html").unwrap());
        assert_eq!(h.types().unwrap().len(), 1);
        assert!(h.clear_all().unwrap());
        assert!(h.types().unwrap().is_empty());
        assert_eq!(h.read("text/plain").unwrap(), None);
    }
}
