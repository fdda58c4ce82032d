//! Paste readiness: whether a paste affordance should be enabled.

use super::{ClipboardError, EditingContext, platform_client};
use crate::platform::ContentTypeSet;

/// Whether a paste into `context` is currently valid.
///
/// `true` exactly when the context is editable and the system clipboard
/// advertises at least one type. Nothing is cached: both checks run on
/// every call, the clipboard check only when the context is editable.
///
/// # Errors
///
/// A missing platform client is reported as `NoPlatformClient`, never
/// folded into `false`.
pub fn can_paste(context: &dyn EditingContext) -> Result<bool, ClipboardError> {
    if !context.is_editable() {
        tracing::trace!(frame = %context.frame_id(), "can_paste: not editable");
        return Ok(false);
    }

    let types = general_clipboard_types(context)?;
    tracing::trace!(frame = %context.frame_id(), types = types.len(), "can_paste: clipboard checked");
    Ok(!types.is_empty())
}

/// Snapshot the type set of the general clipboard through a throwaway
/// handle. The handle is dropped before returning, on error too.
fn general_clipboard_types(context: &dyn EditingContext) -> Result<ContentTypeSet, ClipboardError> {
    let client = platform_client(context)?;
    let handle = client.create_general_clipboard()?;
    Ok(handle.types()?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::editing::{AccessPolicy, Frame, acquire_clipboard};
    use crate::platform::{
        HandleId, MemoryClipboard, PlatformClipboardHandle, PlatformClipboardProvider,
        PlatformError,
    };

    fn frame_with(types: &[&str]) -> (Arc<MemoryClipboard>, Frame) {
        let provider = Arc::new(MemoryClipboard::new());
        let frame = Frame::new(provider.clone());
        let writer = acquire_clipboard(&frame, AccessPolicy::ReadWrite, false).unwrap();
        for ty in types {
            writer.write(ty, b"data").unwrap();
        }
        (provider, frame)
    }

    /// Provider whose handles fail every read and count acquisitions
    /// and releases.
    #[derive(Default)]
    struct Broken {
        acquired: Arc<AtomicUsize>,
        released: Arc<AtomicUsize>,
    }

    struct BrokenHandle {
        id: HandleId,
        released: Arc<AtomicUsize>,
    }

    impl PlatformClipboardHandle for BrokenHandle {
        fn id(&self) -> HandleId {
            self.id
        }
        fn types(&self) -> Result<ContentTypeSet, PlatformError> {
            Err(PlatformError::Display("connection lost".into()))
        }
        fn read(&self, _ty: &str) -> Result<Option<Vec<u8>>, PlatformError> {
            Err(PlatformError::Display("connection lost".into()))
        }
        fn write(&self, _ty: &str, _data: &[u8]) -> Result<(), PlatformError> {
            Err(PlatformError::Display("connection lost".into()))
        }
        fn clear(&self, _ty: &str) -> Result<bool, PlatformError> {
            Ok(false)
        }
        fn clear_all(&self) -> Result<bool, PlatformError> {
            Ok(false)
        }
    }

    impl Drop for BrokenHandle {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl PlatformClipboardProvider for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn create_general_clipboard(
            &self,
        ) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(BrokenHandle {
                id: HandleId::next(),
                released: Arc::clone(&self.released),
            }))
        }
        fn create_drag_clipboard(&self) -> Result<Box<dyn PlatformClipboardHandle>, PlatformError> {
            self.create_general_clipboard()
        }
    }

    #[test]
    fn editable_with_text_can_paste() {
        let (_, frame) = frame_with(&["text/plain"]);
        assert!(can_paste(&frame).unwrap());
    }

    #[test]
    fn editable_with_empty_clipboard_cannot_paste() {
        let (_, frame) = frame_with(&[]);
        assert!(!can_paste(&frame).unwrap());
    }

    #[test]
    fn not_editable_cannot_paste() {
        let (_, mut frame) = frame_with(&["text/plain"]);
        frame.set_editable(false);
        assert!(!can_paste(&frame).unwrap());
    }

    #[test]
    fn true_exactly_when_editable_and_non_empty() {
        for editable in [false, true] {
            for types in [&[][..], &["text/plain"][..], &["text/plain", "text/html"][..]] {
                let (_, mut frame) = frame_with(types);
                frame.set_editable(editable);
                assert_eq!(can_paste(&frame).unwrap(), editable && !types.is_empty());
            }
        }
    }

    #[test]
    fn not_editable_skips_clipboard() {
        let provider = Arc::new(Broken::default());
        let mut frame = Frame::new(provider.clone());
        frame.set_editable(false);

        assert!(!can_paste(&frame).unwrap());
        assert_eq!(provider.acquired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn handle_released_after_check() {
        let (provider, frame) = frame_with(&["text/plain"]);
        assert!(can_paste(&frame).unwrap());
        assert_eq!(provider.live_handles(), 0);
    }

    #[test]
    fn handle_released_when_types_fail() {
        let provider = Arc::new(Broken::default());
        let frame = Frame::new(provider.clone());

        let err = can_paste(&frame).unwrap_err();
        assert!(matches!(err, ClipboardError::Platform(_)));
        assert_eq!(provider.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(provider.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_client_is_an_error_not_false() {
        let frame = Frame::detached();
        let err = can_paste(&frame).unwrap_err();
        assert!(matches!(err, ClipboardError::NoPlatformClient { .. }));
    }

    #[test]
    fn repeated_calls_agree() {
        let (_, frame) = frame_with(&["text/plain"]);
        assert_eq!(can_paste(&frame).unwrap(), can_paste(&frame).unwrap());

        let (_, frame) = frame_with(&[]);
        assert_eq!(can_paste(&frame).unwrap(), can_paste(&frame).unwrap());
    }

    #[test]
    fn follows_external_changes() {
        let (_, frame) = frame_with(&[]);
        assert!(!can_paste(&frame).unwrap());

        let writer = acquire_clipboard(&frame, AccessPolicy::ReadWrite, false).unwrap();
        writer.write("text/plain", b"now").unwrap();
        assert!(can_paste(&frame).unwrap());

        writer.clear_all().unwrap();
        assert!(!can_paste(&frame).unwrap());
    }
}
