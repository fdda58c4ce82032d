//! Policy-tagged clipboard references.

use std::fmt;

use clap::ValueEnum;

use super::ClipboardError;
use super::context::FrameId;
use crate::platform::{ContentTypeSet, HandleId, PlatformClipboardHandle};

/// What a [`ClipboardReference`] lets its holder do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AccessPolicy {
    /// Types and payloads can be read, nothing can be changed
    #[value(name = "read-only")]
    ReadOnly,
    /// Full access, including write and clear
    #[value(name = "read-write")]
    ReadWrite,
}

impl AccessPolicy {
    pub fn allows_write(self) -> bool {
        matches!(self, AccessPolicy::ReadWrite)
    }
}

impl fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessPolicy::ReadOnly => "read-only",
            AccessPolicy::ReadWrite => "read-write",
        })
    }
}

/// A platform clipboard handle bound to an access policy and the frame
/// it was acquired for.
///
/// The policy is fixed at construction. Holders that need to share one
/// reference wrap it in an `Arc`. Writes refused by the policy return
/// `Ok(false)` and never reach the platform.
pub struct ClipboardReference {
    handle: Box<dyn PlatformClipboardHandle>,
    policy: AccessPolicy,
    for_dragging: bool,
    frame: FrameId,
}

impl ClipboardReference {
    pub(crate) fn new(
        handle: Box<dyn PlatformClipboardHandle>,
        policy: AccessPolicy,
        for_dragging: bool,
        frame: FrameId,
    ) -> Self {
        Self {
            handle,
            policy,
            for_dragging,
            frame,
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// `true` for a drag-and-drop clipboard, `false` for the system one.
    pub fn is_for_dragging(&self) -> bool {
        self.for_dragging
    }

    pub fn frame(&self) -> FrameId {
        self.frame
    }

    pub fn handle_id(&self) -> HandleId {
        self.handle.id()
    }

    pub fn types(&self) -> Result<ContentTypeSet, ClipboardError> {
        Ok(self.handle.types()?)
    }

    pub fn read(&self, ty: &str) -> Result<Option<Vec<u8>>, ClipboardError> {
        Ok(self.handle.read(ty)?)
    }

    /// Place `data` under `ty`. `Ok(false)` under a read-only policy.
    pub fn write(&self, ty: &str, data: &[u8]) -> Result<bool, ClipboardError> {
        if !self.writable("write") {
            return Ok(false);
        }
        self.handle.write(ty, data)?;
        Ok(true)
    }

    pub fn clear(&self, ty: &str) -> Result<bool, ClipboardError> {
        if !self.writable("clear") {
            return Ok(false);
        }
        Ok(self.handle.clear(ty)?)
    }

    pub fn clear_all(&self) -> Result<bool, ClipboardError> {
        if !self.writable("clear_all") {
            return Ok(false);
        }
        Ok(self.handle.clear_all()?)
    }

    fn writable(&self, op: &'static str) -> bool {
        let allowed = self.policy.allows_write();
        if !allowed {
            tracing::debug!(
                op,
                handle = %self.handle.id(),
                frame = %self.frame,
                "clipboard: refused by read-only policy"
            );
        }
        allowed
    }
}

impl fmt::Debug for ClipboardReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardReference")
            .field("handle", &self.handle.id())
            .field("policy", &self.policy)
            .field("for_dragging", &self.for_dragging)
            .field("frame", &self.frame)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryClipboard, PlatformClipboardProvider};

    fn reference(provider: &MemoryClipboard, policy: AccessPolicy) -> ClipboardReference {
        let handle = provider.create_general_clipboard().unwrap();
        ClipboardReference::new(handle, policy, false, FrameId::new())
    }

    #[test]
    fn policy_parses() {
        assert_eq!(
            AccessPolicy::from_str("read-only", false),
            Ok(AccessPolicy::ReadOnly)
        );
        assert_eq!(
            AccessPolicy::from_str("read-write", false),
            Ok(AccessPolicy::ReadWrite)
        );
        assert!(AccessPolicy::from_str("write-only", false).is_err());
    }

    #[test]
    fn policy_display_matches_cli_names() {
        for policy in AccessPolicy::value_variants() {
            let name = policy.to_possible_value().unwrap();
            assert_eq!(name.get_name(), policy.to_string());
        }
    }

    #[test]
    fn read_only_refuses_writes() {
        let provider = MemoryClipboard::new();
        let r = reference(&provider, AccessPolicy::ReadOnly);

        assert!(!r.write("text/plain", b"x").unwrap());
        assert!(r.types().unwrap().is_empty());
        assert_eq!(r.policy(), AccessPolicy::ReadOnly);
    }

    #[test]
    fn read_only_refuses_clear() {
        let provider = MemoryClipboard::new();
        let writer = reference(&provider, AccessPolicy::ReadWrite);
        assert!(writer.write("text/plain", b"keep").unwrap());

        let r = reference(&provider, AccessPolicy::ReadOnly);
        assert!(!r.clear("text/plain").unwrap());
        assert!(!r.clear_all().unwrap());
        assert_eq!(r.read("text/plain").unwrap(), Some(b"keep".to_vec()));
    }

    #[test]
    fn read_write_writes_and_clears() {
        let provider = MemoryClipboard::new();
        let r = reference(&provider, AccessPolicy::ReadWrite);

        assert!(r.write("text/plain", b"x").unwrap());
        assert!(r.types().unwrap().contains("text/plain"));
        assert!(r.clear("text/plain").unwrap());
        assert!(r.types().unwrap().is_empty());
    }

    #[test]
    fn dropping_reference_releases_handle() {
        let provider = MemoryClipboard::new();
        let r = reference(&provider, AccessPolicy::ReadOnly);
        assert_eq!(provider.live_handles(), 1);
        drop(r);
        assert_eq!(provider.live_handles(), 0);
    }
}
