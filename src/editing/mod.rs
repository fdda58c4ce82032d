//! Clipboard access for the editing layer.
//!
//! Copy/cut/paste commands obtain a policy-tagged [`ClipboardReference`]
//! through [`acquire_clipboard`]; paste affordances ask [`can_paste`]
//! before enabling themselves. Neither keeps state between calls: each
//! call reaches the platform through the frame's
//! [`PlatformClipboardProvider`] and acquires a fresh handle.

mod accessor;
mod clipboard;
mod context;
mod readiness;

pub use accessor::acquire_clipboard;
pub use clipboard::{AccessPolicy, ClipboardReference};
pub use context::{EditingContext, Frame, FrameId};
pub use readiness::can_paste;

use crate::platform::{PlatformClipboardProvider, PlatformError};

/// Clipboard access errors.
///
/// Empty clipboards, non-editable frames and policy refusals are not
/// errors; they come back as `false`.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// The frame has no platform client. Every live frame carries one,
    /// so this is a wiring bug in the host and must not be retried.
    #[error("{frame} has no platform clipboard client")]
    NoPlatformClient { frame: FrameId },

    #[error("platform clipboard: {0}")]
    Platform(#[from] PlatformError),
}

/// Resolve the platform client of `context`.
fn platform_client(
    context: &dyn EditingContext,
) -> Result<&dyn PlatformClipboardProvider, ClipboardError> {
    context.platform_client().ok_or_else(|| {
        let frame = context.frame_id();
        tracing::error!(%frame, "editing context without a platform clipboard client");
        ClipboardError::NoPlatformClient { frame }
    })
}
